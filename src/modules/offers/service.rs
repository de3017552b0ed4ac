use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::offers::model::{
    CreateOfferDto, Offer, OfferDetails, OfferFilterParams, OfferStatus, UpdateOfferDto,
};
use crate::modules::options::service::OptionService;
use crate::modules::users::model::User;
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;

pub struct OfferService;

impl OfferService {
    /// `subject` and `level` match as case-insensitive substrings.
    #[instrument(skip(db))]
    pub async fn list_offers(
        db: &PgPool,
        filters: &OfferFilterParams,
    ) -> Result<Vec<Offer>, AppError> {
        let offers = sqlx::query_as::<_, Offer>(
            r#"
            SELECT * FROM offers
            WHERE deleted_at IS NULL
              AND ($1::offer_status IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR subject ILIKE '%' || $2 || '%')
              AND ($3::TEXT IS NULL OR level ILIKE '%' || $3 || '%')
            ORDER BY id
            "#,
        )
        .bind(filters.status)
        .bind(filters.subject.as_deref())
        .bind(filters.level.as_deref())
        .fetch_all(db)
        .await?;

        Ok(offers)
    }

    pub async fn list_open(db: &PgPool) -> Result<Vec<Offer>, AppError> {
        let filters = OfferFilterParams {
            status: Some(OfferStatus::Open),
            ..Default::default()
        };
        Self::list_offers(db, &filters).await
    }

    #[instrument(skip(db))]
    pub async fn get_offer(db: &PgPool, id: i64) -> Result<Offer, AppError> {
        sqlx::query_as::<_, Offer>("SELECT * FROM offers WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Offer not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_details(db: &PgPool, id: i64) -> Result<OfferDetails, AppError> {
        let offer = Self::get_offer(db, id).await?;
        let options = OptionService::list_for_offer(db, id).await?;
        Ok(OfferDetails { offer, options })
    }

    /// Inserts a `draft` offer authored by `created_by_id`.
    #[instrument(skip(db, dto))]
    pub async fn create_offer(
        db: &PgPool,
        created_by_id: i64,
        dto: CreateOfferDto,
    ) -> Result<Offer, AppError> {
        let offer = sqlx::query_as::<_, Offer>(
            r#"
            INSERT INTO offers (title, description, hourly_rate, requirements, subject, level, created_by_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.hourly_rate)
        .bind(dto.requirements.unwrap_or_default())
        .bind(&dto.subject)
        .bind(&dto.level)
        .bind(created_by_id)
        .fetch_one(db)
        .await?;

        Ok(offer)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_offer(
        db: &PgPool,
        id: i64,
        dto: UpdateOfferDto,
    ) -> Result<Offer, AppError> {
        sqlx::query_as::<_, Offer>(
            r#"
            UPDATE offers
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                hourly_rate = COALESCE($4, hourly_rate),
                status = COALESCE($5, status),
                requirements = COALESCE($6, requirements),
                subject = COALESCE($7, subject),
                level = COALESCE($8, level),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.title)
        .bind(dto.description)
        .bind(dto.hourly_rate)
        .bind(dto.status)
        .bind(dto.requirements)
        .bind(dto.subject)
        .bind(dto.level)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Offer not found")))
    }

    #[instrument(skip(db, offer), fields(offer_id = offer.id, status = ?offer.status))]
    pub async fn save_state(db: &PgPool, offer: &Offer) -> Result<Offer, AppError> {
        sqlx::query_as::<_, Offer>(
            r#"
            UPDATE offers
            SET status = $2, publication_date = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(offer.id)
        .bind(offer.status)
        .bind(offer.publication_date)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Offer not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_offer(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE offers SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Offer not found")));
        }

        Ok(())
    }

    /// Records an enseignant's interest. Applying twice is a no-op.
    #[instrument(skip(db))]
    pub async fn apply(db: &PgPool, offer_id: i64, enseignant_id: i64) -> Result<(), AppError> {
        Self::get_offer(db, offer_id).await?;

        sqlx::query(
            r#"
            INSERT INTO enseignant_offers (enseignant_id, offer_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(enseignant_id)
        .bind(offer_id)
        .execute(db)
        .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_applicants(db: &PgPool, offer_id: i64) -> Result<Vec<User>, AppError> {
        Self::get_offer(db, offer_id).await?;

        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT enseignant_id FROM enseignant_offers WHERE offer_id = $1",
        )
        .bind(offer_id)
        .fetch_all(db)
        .await?;

        UserService::list_by_ids(db, &ids).await
    }
}
