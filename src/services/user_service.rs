//! User store operations.
//!
//! This module owns all persistence for the `users` table, including the
//! email-uniqueness rule: a pre-check that reports conflicts up front, with
//! the table's UNIQUE constraint as the backstop that closes the
//! check-then-insert race.

use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::user::{
    CreateUserRequest, UpdateUserRequest, User, UserResponse, normalize_email,
};

/// Create a new user.
///
/// # Process
///
/// 1. Validate field constraints (name 1-100, email syntax)
/// 2. Lowercase the email (uniqueness is case-insensitive)
/// 3. Check no existing user has that email
/// 4. Insert; a concurrent insert of the same email trips the UNIQUE
///    constraint and is reported as the same `DuplicateEmail` error
pub async fn create_user(
    pool: &DbPool,
    request: CreateUserRequest,
) -> Result<UserResponse, AppError> {
    request.validate()?;
    let email = normalize_email(&request.email);

    if email_taken(pool, &email, None).await? {
        return Err(AppError::DuplicateEmail);
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, email, birth_date)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, birth_date
        "#,
    )
    .bind(&request.name)
    .bind(&email)
    .bind(request.birth_date)
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)?;

    Ok(user.into())
}

/// Fetch a single user by id.
pub async fn get_user(pool: &DbPool, id: Uuid) -> Result<UserResponse, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, birth_date FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(user.into())
}

/// List all users.
pub async fn list_users(pool: &DbPool) -> Result<Vec<UserResponse>, AppError> {
    let users =
        sqlx::query_as::<_, User>("SELECT id, name, email, birth_date FROM users")
            .fetch_all(pool)
            .await?;

    Ok(users.into_iter().map(Into::into).collect())
}

/// Partially update a user.
///
/// Absent fields keep their stored value. Email uniqueness is re-checked
/// only when an email is part of the update, and the record's own id is
/// excluded from the check, so setting a user's email to its current value
/// is not a conflict.
pub async fn update_user(
    pool: &DbPool,
    id: Uuid,
    update: UpdateUserRequest,
) -> Result<UserResponse, AppError> {
    update.validate()?;

    if update.is_empty() {
        // No fields to apply; still report not-found for unknown ids
        return get_user(pool, id).await;
    }

    let email = update.email.as_deref().map(normalize_email);
    if let Some(email) = &email {
        if email_taken(pool, email, Some(id)).await? {
            return Err(AppError::DuplicateEmail);
        }
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            birth_date = COALESCE($4, birth_date)
        WHERE id = $1
        RETURNING id, name, email, birth_date
        "#,
    )
    .bind(id)
    .bind(&update.name)
    .bind(&email)
    .bind(update.birth_date)
    .fetch_optional(pool)
    .await
    .map_err(map_unique_violation)?
    .ok_or(AppError::UserNotFound)?;

    Ok(user.into())
}

/// Delete a user.
///
/// Zero rows affected means the id named no record, so a second delete of
/// the same id reports `UserNotFound` rather than success.
pub async fn delete_user(pool: &DbPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::UserNotFound);
    }

    Ok(())
}

/// Check whether an email is already registered, optionally excluding one
/// record (the record being updated).
async fn email_taken(
    pool: &DbPool,
    email: &str,
    exclude_id: Option<Uuid>,
) -> Result<bool, AppError> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM users WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

/// Translate a UNIQUE constraint violation on the email column into
/// `DuplicateEmail`, so a write that loses the pre-check race reports the
/// same error the pre-check would have.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return AppError::DuplicateEmail;
        }
    }
    AppError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::test_pool;
    use chrono::NaiveDate;

    fn unique_email() -> String {
        format!("{}@example.com", Uuid::new_v4())
    }

    fn new_user(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
        }
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a scratch PostgreSQL database"]
    async fn duplicate_email_create_fails_and_first_record_survives() {
        let pool = test_pool().await;
        let email = unique_email();

        let first = create_user(&pool, new_user("First", &email)).await.unwrap();

        let second = create_user(&pool, new_user("Second", &email)).await;
        assert!(matches!(second, Err(AppError::DuplicateEmail)));

        // The original record is untouched by the failed create
        let fetched = get_user(&pool, first.id).await.unwrap();
        assert_eq!(fetched.name, "First");
        assert_eq!(fetched.email, email);

        delete_user(&pool, first.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a scratch PostgreSQL database"]
    async fn update_email_conflicts_with_others_but_not_self() {
        let pool = test_pool().await;
        let email_a = unique_email();
        let email_b = unique_email();

        let a = create_user(&pool, new_user("A", &email_a)).await.unwrap();
        let b = create_user(&pool, new_user("B", &email_b)).await.unwrap();

        // Taking another user's email is a conflict
        let steal = update_user(
            &pool,
            b.id,
            UpdateUserRequest {
                email: Some(email_a.clone()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(steal, Err(AppError::DuplicateEmail)));

        // Re-submitting a user's own email is not a conflict with itself
        let keep = update_user(
            &pool,
            a.id,
            UpdateUserRequest {
                email: Some(email_a.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(keep.email, email_a);

        delete_user(&pool, a.id).await.unwrap();
        delete_user(&pool, b.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a scratch PostgreSQL database"]
    async fn second_delete_reports_not_found() {
        let pool = test_pool().await;

        let user = create_user(&pool, new_user("Ephemeral", &unique_email()))
            .await
            .unwrap();

        assert!(delete_user(&pool, user.id).await.is_ok());
        assert!(matches!(
            delete_user(&pool, user.id).await,
            Err(AppError::UserNotFound)
        ));
    }

    #[tokio::test]
    #[ignore = "requires DATABASE_URL pointing at a scratch PostgreSQL database"]
    async fn unique_constraint_violation_maps_to_duplicate_email() {
        let pool = test_pool().await;
        let email = unique_email();

        let user = create_user(&pool, new_user("Holder", &email)).await.unwrap();

        // Insert directly, bypassing the application pre-check, to hit the
        // UNIQUE constraint the way a lost check-then-insert race would
        let err = sqlx::query("INSERT INTO users (name, email, birth_date) VALUES ($1, $2, $3)")
            .bind("Racer")
            .bind(&email)
            .bind(NaiveDate::from_ymd_opt(1990, 1, 15).unwrap())
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(matches!(
            map_unique_violation(err),
            AppError::DuplicateEmail
        ));

        delete_user(&pool, user.id).await.unwrap();
    }
}
