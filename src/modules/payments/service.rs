use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::payments::model::{
    CreatePaymentDto, Payment, PaymentFilterParams, PaymentStats,
};
use crate::utils::errors::AppError;

pub struct PaymentService;

impl PaymentService {
    #[instrument(skip(db))]
    pub async fn list_payments(
        db: &PgPool,
        filters: &PaymentFilterParams,
    ) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE deleted_at IS NULL
              AND ($1::payment_status IS NULL OR status = $1)
              AND ($2::payment_type IS NULL OR type = $2)
              AND ($3::BIGINT IS NULL OR user_id = $3)
              AND ($4::BIGINT IS NULL OR course_id = $4)
            ORDER BY id
            "#,
        )
        .bind(filters.status)
        .bind(filters.payment_type)
        .bind(filters.user_id)
        .bind(filters.course_id)
        .fetch_all(db)
        .await?;

        Ok(payments)
    }

    #[instrument(skip(db))]
    pub async fn list_for_user(db: &PgPool, user_id: i64) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(payments)
    }

    /// Payments attached to any of `course_ids`. An empty slice yields an
    /// empty list without touching the database.
    #[instrument(skip(db))]
    pub async fn list_for_courses(
        db: &PgPool,
        course_ids: &[i64],
    ) -> Result<Vec<Payment>, AppError> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE course_id = ANY($1) AND deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .bind(course_ids)
        .fetch_all(db)
        .await?;

        Ok(payments)
    }

    #[instrument(skip(db))]
    pub async fn get_payment(db: &PgPool, id: i64) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Payment not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_payment(
        db: &PgPool,
        user_id: i64,
        dto: CreatePaymentDto,
    ) -> Result<Payment, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (amount, type, description, user_id, course_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(dto.amount)
        .bind(dto.payment_type)
        .bind(dto.description.unwrap_or_default())
        .bind(user_id)
        .bind(dto.course_id)
        .fetch_one(db)
        .await?;

        Ok(payment)
    }

    /// Writes back the mutable state of a payment after a transition.
    #[instrument(skip(db, payment), fields(payment_id = payment.id, status = ?payment.status))]
    pub async fn save_state(db: &PgPool, payment: &Payment) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET status = $2, payment_date = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(payment.id)
        .bind(payment.status)
        .bind(payment.payment_date)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Payment not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_payment(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE payments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Payment not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn stats(db: &PgPool) -> Result<PaymentStats, AppError> {
        let stats = sqlx::query_as::<_, PaymentStats>(
            r#"
            SELECT
                COUNT(*) AS total_count,
                COALESCE(SUM(amount), 0)::DOUBLE PRECISION AS total_amount,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_count,
                COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0)::DOUBLE PRECISION
                    AS completed_amount,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending_count,
                COALESCE(SUM(amount) FILTER (WHERE status = 'pending'), 0)::DOUBLE PRECISION
                    AS pending_amount
            FROM payments
            WHERE deleted_at IS NULL
            "#,
        )
        .fetch_one(db)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::payments::model::{PaymentStatus, PaymentType};
    use axum::http::StatusCode;
    use chrono::Utc;

    async fn create_user(pool: &PgPool) -> i64 {
        let username = format!("payer{}", &uuid::Uuid::new_v4().simple().to_string()[..12]);
        sqlx::query_scalar(
            r#"INSERT INTO users (username, email, password, role)
               VALUES ($1, $1 || '@test.local', 'hashed', 'famille') RETURNING id"#,
        )
        .bind(&username)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn dto(amount: f64) -> CreatePaymentDto {
        CreatePaymentDto {
            amount,
            payment_type: PaymentType::Advance,
            description: None,
            course_id: None,
            user_id: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_payment_is_pending(pool: PgPool) {
        let user_id = create_user(&pool).await;

        let payment = PaymentService::create_payment(&pool, user_id, dto(20.0))
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.user_id, user_id);
        assert_eq!(payment.description, "");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_stats_split_by_status(pool: PgPool) {
        let user_id = create_user(&pool).await;
        let mut paid = PaymentService::create_payment(&pool, user_id, dto(30.0))
            .await
            .unwrap();
        PaymentService::create_payment(&pool, user_id, dto(12.5))
            .await
            .unwrap();

        paid.process(Utc::now());
        PaymentService::save_state(&pool, &paid).await.unwrap();

        let stats = PaymentService::stats(&pool).await.unwrap();
        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.total_amount, 42.5);
        assert_eq!(stats.completed_count, 1);
        assert_eq!(stats.completed_amount, 30.0);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.pending_amount, 12.5);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_stats_on_empty_table(pool: PgPool) {
        let stats = PaymentService::stats(&pool).await.unwrap();

        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.total_amount, 0.0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_deleted_payment_is_hidden(pool: PgPool) {
        let user_id = create_user(&pool).await;
        let payment = PaymentService::create_payment(&pool, user_id, dto(10.0))
            .await
            .unwrap();

        PaymentService::delete_payment(&pool, payment.id).await.unwrap();

        let err = PaymentService::get_payment(&pool, payment.id).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(PaymentService::list_for_user(&pool, user_id).await.unwrap().is_empty());
    }
}
