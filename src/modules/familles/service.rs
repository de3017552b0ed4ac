use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::courses::service::CourseService;
use crate::modules::familles::model::{Famille, FamilleDetails, FamilleSummary, UpdateFamilleDto};
use crate::modules::missions::service::MissionService;
use crate::modules::options::service::OptionService;
use crate::modules::users::model::{UpdateUserDto, User, UserResponse, UserRole};
use crate::modules::users::service::UserService;
use crate::utils::errors::AppError;

pub struct FamilleService;

impl FamilleService {
    #[instrument(skip(db))]
    pub async fn list_familles(db: &PgPool) -> Result<Vec<FamilleSummary>, AppError> {
        let familles = sqlx::query_as::<_, FamilleSummary>(
            r#"
            SELECT u.id, u.username, u.email, u.phone_number, u.role, u.is_active,
                   u.created_at, u.updated_at, f.family_name
            FROM users u
            JOIN familles f ON f.user_id = u.id
            WHERE u.deleted_at IS NULL AND f.deleted_at IS NULL
            ORDER BY u.id
            "#,
        )
        .fetch_all(db)
        .await?;

        Ok(familles)
    }

    /// The famille's user row; 404 when `id` is not a live famille.
    pub async fn find_famille(db: &PgPool, id: i64) -> Result<User, AppError> {
        UserService::find_user_with_role(db, id, UserRole::Famille).await
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, user_id: i64) -> Result<Famille, AppError> {
        sqlx::query_as::<_, Famille>(
            r#"
            SELECT user_id, family_name, created_at, updated_at
            FROM familles
            WHERE user_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Famille not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_details(db: &PgPool, id: i64) -> Result<FamilleDetails, AppError> {
        let user = Self::find_famille(db, id).await?;
        let profile = Self::get_profile(db, id).await?;
        let missions = MissionService::list_for_famille(db, id).await?;
        let courses = CourseService::list_for_famille(db, id).await?;
        let options = OptionService::list_for_famille(db, id).await?;

        Ok(FamilleDetails {
            user,
            profile,
            missions,
            courses,
            options,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_famille(
        db: &PgPool,
        id: i64,
        dto: UpdateFamilleDto,
    ) -> Result<UserResponse, AppError> {
        Self::find_famille(db, id).await?;

        let update = UpdateUserDto {
            family_name: dto.family_name,
            ..Default::default()
        };
        UserService::update_user(db, id, update).await
    }

    #[instrument(skip(db))]
    pub async fn delete_famille(db: &PgPool, id: i64) -> Result<(), AppError> {
        let user = Self::find_famille(db, id).await?;
        UserService::soft_delete_account(db, &user).await
    }

    /// Every enseignant the famille works with through a mission or a course.
    #[instrument(skip(db))]
    pub async fn list_teachers(db: &PgPool, id: i64) -> Result<Vec<User>, AppError> {
        Self::find_famille(db, id).await?;

        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT enseignant_id FROM missions WHERE famille_id = $1 AND deleted_at IS NULL
            UNION
            SELECT enseignant_id FROM courses WHERE famille_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        UserService::list_by_ids(db, &ids).await
    }
}
