//! Payment domain models and DTOs.
//!
//! Payments are local bookkeeping: `process` flips the status without
//! talking to any payment gateway.

use chrono::{DateTime, Utc};
use edumarket_core::serde::deserialize_optional_i64;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "payment_type", rename_all = "snake_case")]
pub enum PaymentType {
    Course,
    Mission,
    Advance,
    Refund,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct Payment {
    pub id: i64,
    pub amount: f64,
    pub payment_date: DateTime<Utc>,
    pub status: PaymentStatus,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    pub description: String,
    pub user_id: i64,
    pub course_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Marks the payment completed at `now`, whatever its current status.
    pub fn process(&mut self, now: DateTime<Utc>) {
        self.status = PaymentStatus::Completed;
        self.payment_date = now;
    }

    pub fn fail(&mut self) {
        self.status = PaymentStatus::Failed;
    }

    pub fn refund(&mut self) {
        self.status = PaymentStatus::Refunded;
    }

    /// `INV-<issue date as YYYYMMDD>-<payment id>`
    pub fn invoice_number(&self, issued_at: DateTime<Utc>) -> String {
        format!("INV-{}-{}", issued_at.format("%Y%m%d"), self.id)
    }

    pub fn invoice(&self, issued_at: DateTime<Utc>) -> Invoice {
        Invoice {
            invoice_number: self.invoice_number(issued_at),
            amount: self.amount,
            date: self.payment_date,
            description: self.description.clone(),
            status: self.status,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Invoice {
    #[schema(example = "INV-20250101-42")]
    pub invoice_number: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub description: String,
    pub status: PaymentStatus,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreatePaymentDto {
    #[validate(range(exclusive_min = 0.0, message = "amount must be greater than 0"))]
    #[schema(example = 45.0)]
    pub amount: f64,
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub course_id: Option<i64>,
    /// Defaults to the caller; only administrators may name another user
    pub user_id: Option<i64>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct PaymentFilterParams {
    pub status: Option<PaymentStatus>,
    #[serde(rename = "type")]
    pub payment_type: Option<PaymentType>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub user_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
}

/// Totals over live payments.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct PaymentStats {
    pub total_count: i64,
    pub total_amount: f64,
    pub completed_count: i64,
    pub completed_amount: f64,
    pub pending_count: i64,
    pub pending_amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn payment() -> Payment {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        Payment {
            id: 42,
            amount: 60.0,
            payment_date: created,
            status: PaymentStatus::default(),
            payment_type: PaymentType::Course,
            description: "Maths".to_string(),
            user_id: 10,
            course_id: Some(3),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_process_completes_and_stamps_date() {
        let mut p = payment();
        let now = Utc::now();
        p.process(now);
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(p.payment_date, now);
    }

    #[test]
    fn test_process_is_unconditional() {
        let mut p = payment();
        p.refund();
        p.process(Utc::now());
        assert_eq!(p.status, PaymentStatus::Completed);
    }

    #[test]
    fn test_fail_and_refund() {
        let mut p = payment();
        p.fail();
        assert_eq!(p.status, PaymentStatus::Failed);
        p.refund();
        assert_eq!(p.status, PaymentStatus::Refunded);
    }

    #[test]
    fn test_invoice_number_format() {
        let issued = Utc.with_ymd_and_hms(2025, 11, 7, 15, 30, 0).unwrap();
        assert_eq!(payment().invoice_number(issued), "INV-20251107-42");
    }

    #[test]
    fn test_invoice_carries_payment_fields() {
        let p = payment();
        let invoice = p.invoice(Utc::now());
        assert_eq!(invoice.amount, 60.0);
        assert_eq!(invoice.date, p.payment_date);
        assert_eq!(invoice.description, "Maths");
        assert_eq!(invoice.status, PaymentStatus::Pending);
    }

    #[test]
    fn test_type_field_is_named_type_on_the_wire() {
        let value = serde_json::to_value(payment()).unwrap();
        assert_eq!(value["type"], "course");
        assert!(value.get("payment_type").is_none());
    }

    #[test]
    fn test_amount_must_be_positive() {
        let dto: CreatePaymentDto =
            serde_json::from_value(serde_json::json!({"amount": 0.0, "type": "advance"})).unwrap();
        assert!(dto.validate().is_err());
    }
}
