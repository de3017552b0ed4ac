use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::courses::service::CourseService;
use crate::modules::enseignants::model::{
    CreateEnseignantDto, Enseignant, EnseignantDetails, EnseignantFilterParams,
    EnseignantSummary, UpdateEnseignantDto,
};
use crate::modules::missions::service::MissionService;
use crate::modules::payments::model::Payment;
use crate::modules::payments::service::PaymentService;
use crate::modules::reports::service::ReportService;
use crate::modules::users::model::{UpdateUserDto, User, UserResponse, UserRole};
use crate::modules::users::service::{NewAccount, UserService};
use crate::utils::errors::AppError;

pub struct EnseignantService;

impl EnseignantService {
    /// `specialization` matches as a case-insensitive substring.
    #[instrument(skip(db))]
    pub async fn list_enseignants(
        db: &PgPool,
        filters: &EnseignantFilterParams,
    ) -> Result<Vec<EnseignantSummary>, AppError> {
        let enseignants = sqlx::query_as::<_, EnseignantSummary>(
            r#"
            SELECT u.id, u.username, u.email, u.phone_number, u.role, u.is_active,
                   u.created_at, u.updated_at, e.specialization, e.qualifications
            FROM users u
            JOIN enseignants e ON e.user_id = u.id
            WHERE u.deleted_at IS NULL
              AND e.deleted_at IS NULL
              AND ($1::TEXT IS NULL OR e.specialization ILIKE '%' || $1 || '%')
            ORDER BY u.id
            "#,
        )
        .bind(filters.specialization.as_deref())
        .fetch_all(db)
        .await?;

        Ok(enseignants)
    }

    pub async fn find_enseignant(db: &PgPool, id: i64) -> Result<User, AppError> {
        UserService::find_user_with_role(db, id, UserRole::Enseignant).await
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, user_id: i64) -> Result<Enseignant, AppError> {
        sqlx::query_as::<_, Enseignant>(
            r#"
            SELECT user_id, specialization, qualifications, created_at, updated_at
            FROM enseignants
            WHERE user_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Enseignant not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_details(db: &PgPool, id: i64) -> Result<EnseignantDetails, AppError> {
        let user = Self::find_enseignant(db, id).await?;
        let profile = Self::get_profile(db, id).await?;
        let missions = MissionService::list_for_enseignant(db, id).await?;
        let courses = CourseService::list_for_enseignant(db, id).await?;
        let reports = ReportService::list_for_enseignant(db, id).await?;

        Ok(EnseignantDetails {
            user,
            profile,
            missions,
            courses,
            reports,
        })
    }

    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn create_enseignant(
        db: &PgPool,
        dto: CreateEnseignantDto,
    ) -> Result<UserResponse, AppError> {
        UserService::create_account(
            db,
            NewAccount {
                username: dto.username,
                email: dto.email,
                password: dto.password,
                phone_number: dto.phone_number,
                role: UserRole::Enseignant,
                family_name: String::new(),
                specialization: dto.specialization,
                qualifications: dto.qualifications,
            },
        )
        .await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_enseignant(
        db: &PgPool,
        id: i64,
        dto: UpdateEnseignantDto,
    ) -> Result<UserResponse, AppError> {
        Self::find_enseignant(db, id).await?;

        let update = UpdateUserDto {
            specialization: dto.specialization,
            qualifications: dto.qualifications,
            ..Default::default()
        };
        UserService::update_user(db, id, update).await
    }

    #[instrument(skip(db))]
    pub async fn delete_enseignant(db: &PgPool, id: i64) -> Result<(), AppError> {
        let user = Self::find_enseignant(db, id).await?;
        UserService::soft_delete_account(db, &user).await
    }

    /// Every famille the enseignant works with through a mission or a course.
    #[instrument(skip(db))]
    pub async fn list_students(db: &PgPool, id: i64) -> Result<Vec<User>, AppError> {
        Self::find_enseignant(db, id).await?;

        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT famille_id FROM missions WHERE enseignant_id = $1 AND deleted_at IS NULL
            UNION
            SELECT famille_id FROM courses WHERE enseignant_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        UserService::list_by_ids(db, &ids).await
    }

    /// Payments made by the enseignant's own account.
    #[instrument(skip(db))]
    pub async fn list_payments(db: &PgPool, id: i64) -> Result<Vec<Payment>, AppError> {
        Self::find_enseignant(db, id).await?;
        PaymentService::list_for_user(db, id).await
    }
}
