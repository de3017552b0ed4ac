use anyhow::anyhow;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use crate::modules::users::model::{
    Administrator, ChangePasswordDto, Enseignant, Famille, Profile, UpdateUserDto, User,
    UserFilterParams, UserResponse, UserRole, UserWithPassword,
};
use crate::utils::errors::AppError;
use crate::utils::password::{hash_password, verify_password};

/// Fields of an account about to be created, with its profile data.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub family_name: String,
    pub specialization: String,
    pub qualifications: String,
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn find_user(db: &PgPool, id: i64) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone_number, role, is_active, created_at, updated_at
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Loads a live user that must have `role`; any other user is a 404.
    #[instrument(skip(db))]
    pub async fn find_user_with_role(
        db: &PgPool,
        id: i64,
        role: UserRole,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone_number, role, is_active, created_at, updated_at
            FROM users
            WHERE id = $1 AND role = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(db)
        .await?;

        user.ok_or_else(|| AppError::not_found(anyhow!("{} not found", role_label(role))))
    }

    #[instrument(skip(db))]
    pub async fn find_by_email_with_password(
        db: &PgPool,
        email: &str,
    ) -> Result<Option<UserWithPassword>, AppError> {
        let user = sqlx::query_as::<_, UserWithPassword>(
            r#"
            SELECT id, username, email, phone_number, role, is_active, created_at, updated_at, password
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn load_profile(db: &PgPool, user: &User) -> Result<Option<Profile>, AppError> {
        let profile = match user.role {
            UserRole::Famille => sqlx::query_as::<_, Famille>(
                r#"
                SELECT user_id, family_name, created_at, updated_at
                FROM familles
                WHERE user_id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(user.id)
            .fetch_optional(db)
            .await?
            .map(Profile::Family),
            UserRole::Enseignant => sqlx::query_as::<_, Enseignant>(
                r#"
                SELECT user_id, specialization, qualifications, created_at, updated_at
                FROM enseignants
                WHERE user_id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(user.id)
            .fetch_optional(db)
            .await?
            .map(Profile::Teacher),
            UserRole::Administrator => sqlx::query_as::<_, Administrator>(
                r#"
                SELECT user_id, created_at, updated_at
                FROM administrators
                WHERE user_id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(user.id)
            .fetch_optional(db)
            .await?
            .map(Profile::Admin),
        };

        Ok(profile)
    }

    pub async fn with_profile(db: &PgPool, user: User) -> Result<UserResponse, AppError> {
        let profile = Self::load_profile(db, &user).await?;
        Ok(UserResponse { user, profile })
    }

    #[instrument(skip(db))]
    pub async fn get_user_response(db: &PgPool, id: i64) -> Result<UserResponse, AppError> {
        let user = Self::find_user(db, id).await?;
        Self::with_profile(db, user).await
    }

    #[instrument(skip(db))]
    pub async fn list_users(db: &PgPool, filters: &UserFilterParams) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone_number, role, is_active, created_at, updated_at
            FROM users
            WHERE deleted_at IS NULL
              AND ($1::user_role IS NULL OR role = $1)
              AND ($2::BOOLEAN IS NULL OR is_active = $2)
            ORDER BY id
            "#,
        )
        .bind(filters.role)
        .bind(filters.is_active)
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    /// Live users among `ids`, ordered by id. An empty slice short-circuits.
    #[instrument(skip(db))]
    pub async fn list_by_ids(db: &PgPool, ids: &[i64]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone_number, role, is_active, created_at, updated_at
            FROM users
            WHERE id = ANY($1) AND deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(db)
        .await?;

        Ok(users)
    }

    /// Rejects an email or username already used by another live account.
    /// Email is checked first.
    #[instrument(skip(db))]
    pub async fn ensure_available(
        db: &PgPool,
        email: Option<&str>,
        username: Option<&str>,
        exclude_id: Option<i64>,
    ) -> Result<(), AppError> {
        if let Some(email) = email {
            let taken: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM users
                    WHERE email = $1 AND deleted_at IS NULL AND ($2::BIGINT IS NULL OR id <> $2)
                )
                "#,
            )
            .bind(email)
            .bind(exclude_id)
            .fetch_one(db)
            .await?;

            if taken {
                return Err(AppError::conflict(anyhow!("Email already registered")));
            }
        }

        if let Some(username) = username {
            let taken: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM users
                    WHERE username = $1 AND deleted_at IS NULL AND ($2::BIGINT IS NULL OR id <> $2)
                )
                "#,
            )
            .bind(username)
            .bind(exclude_id)
            .fetch_one(db)
            .await?;

            if taken {
                return Err(AppError::conflict(anyhow!("Username already taken")));
            }
        }

        Ok(())
    }

    /// Creates a user and its role profile in one transaction.
    #[instrument(skip(db, account), fields(email = %account.email, role = %account.role))]
    pub async fn create_account(db: &PgPool, account: NewAccount) -> Result<UserResponse, AppError> {
        Self::ensure_available(db, Some(&account.email), Some(&account.username), None).await?;

        let password_hash = hash_password(&account.password)?;

        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, phone_number, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, phone_number, role, is_active, created_at, updated_at
            "#,
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&password_hash)
        .bind(&account.phone_number)
        .bind(account.role)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        let profile = insert_profile(&mut tx, &user, &account).await?;

        tx.commit().await?;

        Ok(UserResponse {
            user,
            profile: Some(profile),
        })
    }

    /// Applies the present fields of `dto` to the account and its profile.
    #[instrument(skip(db, dto))]
    pub async fn update_user(
        db: &PgPool,
        id: i64,
        dto: UpdateUserDto,
    ) -> Result<UserResponse, AppError> {
        Self::find_user(db, id).await?;
        Self::ensure_available(db, dto.email.as_deref(), dto.username.as_deref(), Some(id)).await?;

        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($1, username),
                email = COALESCE($2, email),
                phone_number = COALESCE($3, phone_number),
                is_active = COALESCE($4, is_active),
                updated_at = NOW()
            WHERE id = $5 AND deleted_at IS NULL
            RETURNING id, username, email, phone_number, role, is_active, created_at, updated_at
            "#,
        )
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&dto.phone_number)
        .bind(dto.is_active)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        match user.role {
            UserRole::Famille => {
                sqlx::query(
                    r#"
                    UPDATE familles
                    SET family_name = COALESCE($1, family_name), updated_at = NOW()
                    WHERE user_id = $2 AND deleted_at IS NULL
                    "#,
                )
                .bind(&dto.family_name)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
            UserRole::Enseignant => {
                sqlx::query(
                    r#"
                    UPDATE enseignants
                    SET specialization = COALESCE($1, specialization),
                        qualifications = COALESCE($2, qualifications),
                        updated_at = NOW()
                    WHERE user_id = $3 AND deleted_at IS NULL
                    "#,
                )
                .bind(&dto.specialization)
                .bind(&dto.qualifications)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
            UserRole::Administrator => {}
        }

        tx.commit().await?;

        Self::with_profile(db, user).await
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        id: i64,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let stored_hash: String = sqlx::query_scalar(
            "SELECT password FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        if !verify_password(&dto.current_password, &stored_hash)? {
            return Err(AppError::unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Soft-deletes the profile, then the user. The two writes are not
    /// wrapped in a transaction.
    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: i64) -> Result<(), AppError> {
        let user = Self::find_user(db, id).await?;
        Self::soft_delete_account(db, &user).await
    }

    pub async fn soft_delete_account(db: &PgPool, user: &User) -> Result<(), AppError> {
        let profile_query = match user.role {
            UserRole::Famille => {
                "UPDATE familles SET deleted_at = NOW() WHERE user_id = $1 AND deleted_at IS NULL"
            }
            UserRole::Enseignant => {
                "UPDATE enseignants SET deleted_at = NOW() WHERE user_id = $1 AND deleted_at IS NULL"
            }
            UserRole::Administrator => {
                "UPDATE administrators SET deleted_at = NOW() WHERE user_id = $1 AND deleted_at IS NULL"
            }
        };

        sqlx::query(profile_query).bind(user.id).execute(db).await?;

        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(user.id)
                .execute(db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        Ok(())
    }
}

async fn insert_profile(
    conn: &mut PgConnection,
    user: &User,
    account: &NewAccount,
) -> Result<Profile, AppError> {
    let profile = match user.role {
        UserRole::Famille => Profile::Family(
            sqlx::query_as::<_, Famille>(
                r#"
                INSERT INTO familles (user_id, family_name)
                VALUES ($1, $2)
                RETURNING user_id, family_name, created_at, updated_at
                "#,
            )
            .bind(user.id)
            .bind(&account.family_name)
            .fetch_one(&mut *conn)
            .await?,
        ),
        UserRole::Enseignant => Profile::Teacher(
            sqlx::query_as::<_, Enseignant>(
                r#"
                INSERT INTO enseignants (user_id, specialization, qualifications)
                VALUES ($1, $2, $3)
                RETURNING user_id, specialization, qualifications, created_at, updated_at
                "#,
            )
            .bind(user.id)
            .bind(&account.specialization)
            .bind(&account.qualifications)
            .fetch_one(&mut *conn)
            .await?,
        ),
        UserRole::Administrator => Profile::Admin(
            sqlx::query_as::<_, Administrator>(
                r#"
                INSERT INTO administrators (user_id)
                VALUES ($1)
                RETURNING user_id, created_at, updated_at
                "#,
            )
            .bind(user.id)
            .fetch_one(&mut *conn)
            .await?,
        ),
    };

    Ok(profile)
}

fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Famille => "Famille",
        UserRole::Enseignant => "Enseignant",
        UserRole::Administrator => "Administrator",
    }
}

/// Maps a unique-index violation on `users` to a 409 naming the column.
pub(crate) fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return match db_err.constraint() {
            Some("users_email_live_key") => AppError::conflict(anyhow!("Email already registered")),
            _ => AppError::conflict(anyhow!("Username already taken")),
        };
    }
    AppError::internal(e)
}
