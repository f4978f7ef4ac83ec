//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::Category;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, name, description, created_at, updated_at FROM categories WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, description, created_at, updated_at FROM categories ORDER BY created_at, name",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

/// Insert the category unless one with the same name exists
pub async fn ensure(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> RepoResult<Category> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO categories (id, name, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) ON CONFLICT (name) DO NOTHING",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(description)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_name(pool, name)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Failed to create category {name}")))
}
