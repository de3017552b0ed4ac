use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::reports::model::{Report, ReportFilterParams, UpdateReportDto};
use crate::utils::errors::AppError;

pub struct ReportService;

impl ReportService {
    #[instrument(skip(db))]
    pub async fn list_reports(
        db: &PgPool,
        filters: &ReportFilterParams,
    ) -> Result<Vec<Report>, AppError> {
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT * FROM reports
            WHERE deleted_at IS NULL
              AND ($1::report_status IS NULL OR status = $1)
              AND ($2::BIGINT IS NULL OR mission_id = $2)
              AND ($3::BIGINT IS NULL OR enseignant_id = $3)
            ORDER BY id
            "#,
        )
        .bind(filters.status)
        .bind(filters.mission_id)
        .bind(filters.enseignant_id)
        .fetch_all(db)
        .await?;

        Ok(reports)
    }

    pub async fn list_for_mission(db: &PgPool, mission_id: i64) -> Result<Vec<Report>, AppError> {
        let filters = ReportFilterParams {
            mission_id: Some(mission_id),
            ..Default::default()
        };
        Self::list_reports(db, &filters).await
    }

    pub async fn list_for_enseignant(
        db: &PgPool,
        enseignant_id: i64,
    ) -> Result<Vec<Report>, AppError> {
        let filters = ReportFilterParams {
            enseignant_id: Some(enseignant_id),
            ..Default::default()
        };
        Self::list_reports(db, &filters).await
    }

    #[instrument(skip(db))]
    pub async fn get_report(db: &PgPool, id: i64) -> Result<Report, AppError> {
        sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Report not found")))
    }

    #[instrument(skip(db, content))]
    pub async fn create_report(
        db: &PgPool,
        mission_id: i64,
        enseignant_id: i64,
        content: &str,
    ) -> Result<Report, AppError> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (content, enseignant_id, mission_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(content)
        .bind(enseignant_id)
        .bind(mission_id)
        .fetch_one(db)
        .await?;

        Ok(report)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_report(
        db: &PgPool,
        id: i64,
        dto: UpdateReportDto,
    ) -> Result<Report, AppError> {
        sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET content = COALESCE($2, content),
                comments = COALESCE($3, comments),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.content)
        .bind(dto.comments)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Report not found")))
    }

    /// Persists the review state after `submit`, `validate_by` or `reject_by`.
    #[instrument(skip(db, report), fields(report_id = report.id, status = ?report.status))]
    pub async fn save_state(db: &PgPool, report: &Report) -> Result<Report, AppError> {
        sqlx::query_as::<_, Report>(
            r#"
            UPDATE reports
            SET status = $2,
                submission_date = $3,
                validation_date = $4,
                validated_by_id = $5,
                comments = $6,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(report.id)
        .bind(report.status)
        .bind(report.submission_date)
        .bind(report.validation_date)
        .bind(report.validated_by_id)
        .bind(&report.comments)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Report not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_report(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE reports SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Report not found")));
        }

        Ok(())
    }
}
