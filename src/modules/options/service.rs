use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::options::model::{
    EXPIRING_WINDOW_HOURS, OptionFilterParams, OptionStatus, TeachingOption, UpdateOptionDto,
};
use crate::utils::errors::AppError;

/// A validated option ready to insert.
#[derive(Debug, Clone)]
pub struct NewOption {
    pub creation_date: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
    pub description: String,
    pub enseignant_id: i64,
    pub famille_id: i64,
    pub offer_id: Option<i64>,
}

pub struct OptionService;

impl OptionService {
    #[instrument(skip(db))]
    pub async fn list_options(
        db: &PgPool,
        filters: &OptionFilterParams,
    ) -> Result<Vec<TeachingOption>, AppError> {
        let options = sqlx::query_as::<_, TeachingOption>(
            r#"
            SELECT * FROM options
            WHERE deleted_at IS NULL
              AND ($1::option_status IS NULL OR status = $1)
              AND ($2::BIGINT IS NULL OR famille_id = $2)
              AND ($3::BIGINT IS NULL OR enseignant_id = $3)
              AND ($4::BIGINT IS NULL OR offer_id = $4)
            ORDER BY id
            "#,
        )
        .bind(filters.status)
        .bind(filters.famille_id)
        .bind(filters.enseignant_id)
        .bind(filters.offer_id)
        .fetch_all(db)
        .await?;

        Ok(options)
    }

    pub async fn list_pending(db: &PgPool) -> Result<Vec<TeachingOption>, AppError> {
        let filters = OptionFilterParams {
            status: Some(OptionStatus::Active),
            ..Default::default()
        };
        Self::list_options(db, &filters).await
    }

    pub async fn list_for_offer(db: &PgPool, offer_id: i64) -> Result<Vec<TeachingOption>, AppError> {
        let filters = OptionFilterParams {
            offer_id: Some(offer_id),
            ..Default::default()
        };
        Self::list_options(db, &filters).await
    }

    pub async fn list_for_famille(
        db: &PgPool,
        famille_id: i64,
    ) -> Result<Vec<TeachingOption>, AppError> {
        let filters = OptionFilterParams {
            famille_id: Some(famille_id),
            ..Default::default()
        };
        Self::list_options(db, &filters).await
    }

    pub async fn list_for_enseignant(
        db: &PgPool,
        enseignant_id: i64,
    ) -> Result<Vec<TeachingOption>, AppError> {
        let filters = OptionFilterParams {
            enseignant_id: Some(enseignant_id),
            ..Default::default()
        };
        Self::list_options(db, &filters).await
    }

    /// Options whose expiration date falls within the next
    /// [`EXPIRING_WINDOW_HOURS`] of `now`. Nothing is transitioned.
    #[instrument(skip(db))]
    pub async fn list_expiring(
        db: &PgPool,
        now: DateTime<Utc>,
    ) -> Result<Vec<TeachingOption>, AppError> {
        let options = sqlx::query_as::<_, TeachingOption>(
            r#"
            SELECT * FROM options
            WHERE deleted_at IS NULL
              AND expiration_date BETWEEN $1 AND $2
            ORDER BY expiration_date, id
            "#,
        )
        .bind(now)
        .bind(now + Duration::hours(EXPIRING_WINDOW_HOURS))
        .fetch_all(db)
        .await?;

        Ok(options)
    }

    #[instrument(skip(db))]
    pub async fn get_option(db: &PgPool, id: i64) -> Result<TeachingOption, AppError> {
        sqlx::query_as::<_, TeachingOption>(
            "SELECT * FROM options WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Option not found")))
    }

    #[instrument(skip(db, option), fields(famille_id = option.famille_id, enseignant_id = option.enseignant_id))]
    pub async fn create_option(db: &PgPool, option: NewOption) -> Result<TeachingOption, AppError> {
        let option = sqlx::query_as::<_, TeachingOption>(
            r#"
            INSERT INTO options (creation_date, expiration_date, description, enseignant_id, famille_id, offer_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(option.creation_date)
        .bind(option.expiration_date)
        .bind(&option.description)
        .bind(option.enseignant_id)
        .bind(option.famille_id)
        .bind(option.offer_id)
        .fetch_one(db)
        .await?;

        Ok(option)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_option(
        db: &PgPool,
        id: i64,
        dto: UpdateOptionDto,
    ) -> Result<TeachingOption, AppError> {
        sqlx::query_as::<_, TeachingOption>(
            r#"
            UPDATE options
            SET status = COALESCE($2, status),
                description = COALESCE($3, description),
                expiration_date = COALESCE($4, expiration_date),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.status)
        .bind(dto.description)
        .bind(dto.expiration_date)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Option not found")))
    }

    #[instrument(skip(db, option), fields(option_id = option.id, status = ?option.status))]
    pub async fn save_status(
        db: &PgPool,
        option: &TeachingOption,
    ) -> Result<TeachingOption, AppError> {
        sqlx::query_as::<_, TeachingOption>(
            r#"
            UPDATE options
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(option.id)
        .bind(option.status)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Option not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_option(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE options SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Option not found")));
        }

        Ok(())
    }
}
