use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::addresses::model::{Address, CreateAddressDto, UpdateAddressDto};
use crate::utils::errors::AppError;

pub struct AddressService;

impl AddressService {
    #[instrument(skip(db))]
    pub async fn list_addresses(db: &PgPool) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE deleted_at IS NULL ORDER BY id",
        )
        .fetch_all(db)
        .await?;

        Ok(addresses)
    }

    #[instrument(skip(db))]
    pub async fn list_for_user(db: &PgPool, user_id: i64) -> Result<Vec<Address>, AppError> {
        let addresses = sqlx::query_as::<_, Address>(
            r#"
            SELECT * FROM addresses
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;

        Ok(addresses)
    }

    #[instrument(skip(db))]
    pub async fn get_address(db: &PgPool, id: i64) -> Result<Address, AppError> {
        sqlx::query_as::<_, Address>(
            "SELECT * FROM addresses WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Address not found")))
    }

    #[instrument(skip(db))]
    pub async fn ensure_exists(db: &PgPool, id: i64) -> Result<(), AppError> {
        Self::get_address(db, id).await.map(|_| ())
    }

    #[instrument(skip(db, dto))]
    pub async fn create_address(
        db: &PgPool,
        user_id: i64,
        dto: CreateAddressDto,
    ) -> Result<Address, AppError> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (street, city, postal_code, country, latitude, longitude, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&dto.street)
        .bind(&dto.city)
        .bind(&dto.postal_code)
        .bind(&dto.country)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok(address)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_address(
        db: &PgPool,
        id: i64,
        dto: UpdateAddressDto,
    ) -> Result<Address, AppError> {
        sqlx::query_as::<_, Address>(
            r#"
            UPDATE addresses
            SET street = COALESCE($2, street),
                city = COALESCE($3, city),
                postal_code = COALESCE($4, postal_code),
                country = COALESCE($5, country),
                latitude = COALESCE($6, latitude),
                longitude = COALESCE($7, longitude),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.street)
        .bind(dto.city)
        .bind(dto.postal_code)
        .bind(dto.country)
        .bind(dto.latitude)
        .bind(dto.longitude)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Address not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_address(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE addresses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Address not found")));
        }

        Ok(())
    }
}
