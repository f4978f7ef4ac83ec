//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn exists(pool: &SqlitePool, id: &str) -> RepoResult<bool> {
    let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found != 0)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, full_name, role, phone, status, created_at, updated_at FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, full_name, role, phone, status, created_at, updated_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    let email = data.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(RepoError::Validation(format!("invalid email: '{}'", data.email)));
    }

    let id = Uuid::new_v4().to_string();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO users (id, email, full_name, role, phone, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'active', ?6, ?6)",
    )
    .bind(&id)
    .bind(&email)
    .bind(data.full_name.trim())
    .bind(data.role.unwrap_or_default())
    .bind(&data.phone)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Create the user unless the email is already registered
pub async fn ensure(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if let Some(existing) = find_by_email(pool, &data.email.trim().to_lowercase()).await? {
        return Ok(existing);
    }
    create(pool, data).await
}
