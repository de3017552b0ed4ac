use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use crate::modules::courses::model::{
    Course, CourseDetails, CourseFilterParams, NewCourse, UpdateCourseDto,
};
use crate::modules::payments::service::PaymentService;
use crate::utils::errors::AppError;

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn list_courses(
        db: &PgPool,
        filters: &CourseFilterParams,
    ) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT * FROM courses
            WHERE deleted_at IS NULL
              AND ($1::course_status IS NULL OR status = $1)
              AND ($2::BIGINT IS NULL OR famille_id = $2)
              AND ($3::BIGINT IS NULL OR enseignant_id = $3)
              AND ($4::BIGINT IS NULL OR mission_id = $4)
            ORDER BY id
            "#,
        )
        .bind(filters.status)
        .bind(filters.famille_id)
        .bind(filters.enseignant_id)
        .bind(filters.mission_id)
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    pub async fn list_for_mission(db: &PgPool, mission_id: i64) -> Result<Vec<Course>, AppError> {
        let filters = CourseFilterParams {
            mission_id: Some(mission_id),
            ..Default::default()
        };
        Self::list_courses(db, &filters).await
    }

    pub async fn list_for_famille(db: &PgPool, famille_id: i64) -> Result<Vec<Course>, AppError> {
        let filters = CourseFilterParams {
            famille_id: Some(famille_id),
            ..Default::default()
        };
        Self::list_courses(db, &filters).await
    }

    pub async fn list_for_enseignant(
        db: &PgPool,
        enseignant_id: i64,
    ) -> Result<Vec<Course>, AppError> {
        let filters = CourseFilterParams {
            enseignant_id: Some(enseignant_id),
            ..Default::default()
        };
        Self::list_courses(db, &filters).await
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: i64) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_details(db: &PgPool, id: i64) -> Result<CourseDetails, AppError> {
        let course = Self::get_course(db, id).await?;
        let payments = PaymentService::list_for_courses(db, &[course.id]).await?;
        Ok(CourseDetails { course, payments })
    }

    #[instrument(skip(db, course), fields(mission_id = course.mission_id))]
    pub async fn create_course(db: &PgPool, course: NewCourse) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (scheduled_time, duration, location, famille_id, enseignant_id, mission_id, address_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(course.scheduled_time)
        .bind(course.duration)
        .bind(&course.location)
        .bind(course.famille_id)
        .bind(course.enseignant_id)
        .bind(course.mission_id)
        .bind(course.address_id)
        .fetch_one(db)
        .await?;

        Ok(course)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: i64,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET scheduled_time = COALESCE($2, scheduled_time),
                duration = COALESCE($3, duration),
                location = COALESCE($4, location),
                status = COALESCE($5, status),
                address_id = COALESCE($6, address_id),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.scheduled_time)
        .bind(dto.duration)
        .bind(dto.location)
        .bind(dto.status)
        .bind(dto.address_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    /// Persists status and scheduled time after a transition.
    #[instrument(skip(db, course), fields(course_id = course.id, status = ?course.status))]
    pub async fn save_state(db: &PgPool, course: &Course) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET status = $2, scheduled_time = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(course.id)
        .bind(course.status)
        .bind(course.scheduled_time)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE courses SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Course not found")));
        }

        Ok(())
    }
}
