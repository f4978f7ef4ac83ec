//! Shared fixtures for integration tests: a throwaway SQLite database per test.

#![allow(dead_code)]

use dapur_server::db::{DbOptions, DbService, repository};
use rust_decimal::Decimal;
use shared::models::{MenuItem, MenuItemCreate, User, UserCreate, UserRole};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Database living in a temp dir; dropped with the test
pub struct TestDb {
    pub db: DbService,
    _dir: TempDir,
}

impl TestDb {
    pub async fn open() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("dapur-test.db");
        let db = DbService::new(path.to_str().expect("utf-8 path"), DbOptions::default())
            .await
            .expect("open test database");
        Self { db, _dir: dir }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }
}

pub async fn add_customer(pool: &SqlitePool, email: &str) -> User {
    repository::user::create(
        pool,
        UserCreate {
            email: email.to_string(),
            full_name: "Budi Santoso".to_string(),
            role: Some(UserRole::Customer),
            phone: None,
        },
    )
    .await
    .expect("create customer")
}

pub async fn add_menu_item(pool: &SqlitePool, name: &str, price: i64, stock: i64) -> MenuItem {
    repository::menu_item::create(
        pool,
        MenuItemCreate {
            name: name.to_string(),
            description: None,
            price: Decimal::from(price),
            stock,
            status: None,
            category_id: None,
            image_url: None,
        },
    )
    .await
    .expect("create menu item")
}

pub async fn stock_of(pool: &SqlitePool, id: &str) -> i64 {
    repository::menu_item::find_by_id(pool, id)
        .await
        .expect("read menu item")
        .expect("menu item exists")
        .stock
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows")
}
