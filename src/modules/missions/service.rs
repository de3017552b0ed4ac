use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::courses::service::CourseService;
use crate::modules::missions::model::{
    CreateMissionDto, Mission, MissionDetails, MissionFilterParams, UpdateMissionDto,
};
use crate::modules::payments::model::Payment;
use crate::modules::payments::service::PaymentService;
use crate::modules::reports::service::ReportService;
use crate::utils::errors::AppError;

pub struct MissionService;

impl MissionService {
    #[instrument(skip(db))]
    pub async fn list_missions(
        db: &PgPool,
        filters: &MissionFilterParams,
    ) -> Result<Vec<Mission>, AppError> {
        let missions = sqlx::query_as::<_, Mission>(
            r#"
            SELECT * FROM missions
            WHERE deleted_at IS NULL
              AND ($1::mission_status IS NULL OR status = $1)
              AND ($2::BIGINT IS NULL OR famille_id = $2)
              AND ($3::BIGINT IS NULL OR enseignant_id = $3)
            ORDER BY id
            "#,
        )
        .bind(filters.status)
        .bind(filters.famille_id)
        .bind(filters.enseignant_id)
        .fetch_all(db)
        .await?;

        Ok(missions)
    }

    pub async fn list_for_famille(db: &PgPool, famille_id: i64) -> Result<Vec<Mission>, AppError> {
        let filters = MissionFilterParams {
            famille_id: Some(famille_id),
            ..Default::default()
        };
        Self::list_missions(db, &filters).await
    }

    pub async fn list_for_enseignant(
        db: &PgPool,
        enseignant_id: i64,
    ) -> Result<Vec<Mission>, AppError> {
        let filters = MissionFilterParams {
            enseignant_id: Some(enseignant_id),
            ..Default::default()
        };
        Self::list_missions(db, &filters).await
    }

    #[instrument(skip(db))]
    pub async fn get_mission(db: &PgPool, id: i64) -> Result<Mission, AppError> {
        sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Mission not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_details(db: &PgPool, id: i64) -> Result<MissionDetails, AppError> {
        let mission = Self::get_mission(db, id).await?;
        let courses = CourseService::list_for_mission(db, id).await?;
        let reports = ReportService::list_for_mission(db, id).await?;

        Ok(MissionDetails {
            mission,
            courses,
            reports,
        })
    }

    /// Inserts an `active` mission between two already-resolved parties.
    #[instrument(skip(db, dto))]
    pub async fn create_mission(
        db: &PgPool,
        famille_id: i64,
        enseignant_id: i64,
        dto: CreateMissionDto,
    ) -> Result<Mission, AppError> {
        let mission = sqlx::query_as::<_, Mission>(
            r#"
            INSERT INTO missions (start_date, end_date, description, famille_id, enseignant_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.description.unwrap_or_default())
        .bind(famille_id)
        .bind(enseignant_id)
        .fetch_one(db)
        .await?;

        Ok(mission)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_mission(
        db: &PgPool,
        id: i64,
        dto: UpdateMissionDto,
    ) -> Result<Mission, AppError> {
        sqlx::query_as::<_, Mission>(
            r#"
            UPDATE missions
            SET end_date = COALESCE($2, end_date),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.end_date)
        .bind(dto.description)
        .bind(dto.status)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Mission not found")))
    }

    /// Persists the status and end date after `stop` or `extend`.
    #[instrument(skip(db, mission), fields(mission_id = mission.id, status = ?mission.status))]
    pub async fn save_state(db: &PgPool, mission: &Mission) -> Result<Mission, AppError> {
        sqlx::query_as::<_, Mission>(
            r#"
            UPDATE missions
            SET status = $2, end_date = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(mission.id)
        .bind(mission.status)
        .bind(mission.end_date)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Mission not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_mission(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE missions SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Mission not found")));
        }

        Ok(())
    }

    /// Payments attached to the mission's courses.
    #[instrument(skip(db))]
    pub async fn list_payments(db: &PgPool, id: i64) -> Result<Vec<Payment>, AppError> {
        Self::get_mission(db, id).await?;

        let course_ids: Vec<i64> = sqlx::query_scalar(
            "SELECT id FROM courses WHERE mission_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        PaymentService::list_for_courses(db, &course_ids).await
    }
}
