use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::resources::model::{
    CreateResourceDto, Resource, ResourceType, UpdateResourceDto,
};
use crate::utils::errors::AppError;

pub struct ResourceService;

impl ResourceService {
    /// Resources `viewer` may see: public ones plus those shared with them.
    /// `None` stands for an administrator and lifts the visibility filter.
    #[instrument(skip(db))]
    pub async fn list_visible(
        db: &PgPool,
        viewer: Option<i64>,
        resource_type: Option<ResourceType>,
    ) -> Result<Vec<Resource>, AppError> {
        let resources = sqlx::query_as::<_, Resource>(
            r#"
            SELECT r.* FROM resources r
            WHERE r.deleted_at IS NULL
              AND ($2::resource_type IS NULL OR r.type = $2)
              AND (
                $1::BIGINT IS NULL
                OR r.is_public
                OR EXISTS (
                    SELECT 1 FROM user_resources ur
                    WHERE ur.resource_id = r.id AND ur.user_id = $1
                )
              )
            ORDER BY r.id
            "#,
        )
        .bind(viewer)
        .bind(resource_type)
        .fetch_all(db)
        .await?;

        Ok(resources)
    }

    #[instrument(skip(db))]
    pub async fn get_visible(
        db: &PgPool,
        id: i64,
        viewer: Option<i64>,
    ) -> Result<Resource, AppError> {
        sqlx::query_as::<_, Resource>(
            r#"
            SELECT r.* FROM resources r
            WHERE r.id = $1
              AND r.deleted_at IS NULL
              AND (
                $2::BIGINT IS NULL
                OR r.is_public
                OR EXISTS (
                    SELECT 1 FROM user_resources ur
                    WHERE ur.resource_id = r.id AND ur.user_id = $2
                )
              )
            "#,
        )
        .bind(id)
        .bind(viewer)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Resource not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_resource(
        db: &PgPool,
        managed_by_id: i64,
        dto: CreateResourceDto,
    ) -> Result<Resource, AppError> {
        let resource = sqlx::query_as::<_, Resource>(
            r#"
            INSERT INTO resources (title, type, url, description, file_size, mime_type, is_public, managed_by_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&dto.title)
        .bind(dto.resource_type)
        .bind(&dto.url)
        .bind(dto.description.unwrap_or_default())
        .bind(dto.file_size)
        .bind(dto.mime_type)
        .bind(dto.is_public.unwrap_or(false))
        .bind(managed_by_id)
        .fetch_one(db)
        .await?;

        Ok(resource)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_resource(
        db: &PgPool,
        id: i64,
        dto: UpdateResourceDto,
    ) -> Result<Resource, AppError> {
        sqlx::query_as::<_, Resource>(
            r#"
            UPDATE resources
            SET title = COALESCE($2, title),
                type = COALESCE($3, type),
                url = COALESCE($4, url),
                description = COALESCE($5, description),
                file_size = COALESCE($6, file_size),
                mime_type = COALESCE($7, mime_type),
                is_public = COALESCE($8, is_public),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.title)
        .bind(dto.resource_type)
        .bind(dto.url)
        .bind(dto.description)
        .bind(dto.file_size)
        .bind(dto.mime_type)
        .bind(dto.is_public)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Resource not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_resource(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE resources SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Resource not found")));
        }

        Ok(())
    }

    /// Shares with every live user among `user_ids`; unknown ids and existing
    /// shares are skipped. Returns how many new shares were recorded.
    #[instrument(skip(db))]
    pub async fn share(db: &PgPool, resource_id: i64, user_ids: &[i64]) -> Result<u64, AppError> {
        Self::get_visible(db, resource_id, None).await?;

        let result = sqlx::query(
            r#"
            INSERT INTO user_resources (user_id, resource_id)
            SELECT u.id, $1 FROM users u
            WHERE u.id = ANY($2) AND u.deleted_at IS NULL
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(resource_id)
        .bind(user_ids)
        .execute(db)
        .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(db))]
    pub async fn unshare(db: &PgPool, resource_id: i64, user_id: i64) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM user_resources WHERE resource_id = $1 AND user_id = $2")
                .bind(resource_id)
                .bind(user_id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Resource is not shared with this user")));
        }

        Ok(())
    }
}
