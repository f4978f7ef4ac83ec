//! Demo data
//!
//! Default categories, an admin, a demo customer and a small menu. Safe to
//! run on every start: existing rows (matched by name or email) are kept.

use rust_decimal::Decimal;
use shared::models::{MenuItemCreate, UserCreate, UserRole};
use sqlx::SqlitePool;

use super::repository::{self, RepoResult};

const CATEGORIES: &[(&str, &str)] = &[
    ("Makanan Pembuka", "Appetizers and starters"),
    ("Makanan Utama", "Main courses"),
    ("Makanan Penutup", "Desserts and sweets"),
    ("Minuman", "Beverages and drinks"),
];

/// (name, description, price, stock, category)
const MENU: &[(&str, &str, i64, i64, &str)] = &[
    ("Lumpia Semarang", "Spring rolls with bamboo shoots", 15000, 20, "Makanan Pembuka"),
    ("Nasi Gudeg", "Young jackfruit stew with rice", 25000, 10, "Makanan Utama"),
    ("Soto Ayam", "Chicken turmeric soup", 20000, 15, "Makanan Utama"),
    ("Klepon", "Palm sugar rice cake balls", 8000, 30, "Makanan Penutup"),
    ("Es Teh Manis", "Sweet iced tea", 5000, 50, "Minuman"),
    ("Es Jeruk", "Iced orange juice", 7000, 40, "Minuman"),
];

/// What a seeding pass inserted
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub users: usize,
    pub menu_items: usize,
}

pub async fn seed_demo_data(pool: &SqlitePool) -> RepoResult<SeedReport> {
    let mut report = SeedReport::default();

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for (name, description) in CATEGORIES {
        let existed = repository::category::find_by_name(pool, name).await?.is_some();
        let category = repository::category::ensure(pool, name, Some(*description)).await?;
        if !existed {
            report.categories += 1;
        }
        category_ids.push((*name, category.id));
    }

    let users = [
        UserCreate {
            email: "admin@dapurbunda.com".into(),
            full_name: "Administrator".into(),
            role: Some(UserRole::Admin),
            phone: Some("081234567890".into()),
        },
        UserCreate {
            email: "customer@example.com".into(),
            full_name: "Customer Demo".into(),
            role: Some(UserRole::Customer),
            phone: Some("081234567891".into()),
        },
    ];
    for user in users {
        if repository::user::find_by_email(pool, &user.email).await?.is_none() {
            repository::user::create(pool, user).await?;
            report.users += 1;
        }
    }

    for (name, description, price, stock, category) in MENU {
        if repository::menu_item::find_by_name(pool, name).await?.is_some() {
            continue;
        }
        let category_id = category_ids
            .iter()
            .find(|(n, _)| n == category)
            .map(|(_, id)| id.clone());
        repository::menu_item::create(
            pool,
            MenuItemCreate {
                name: (*name).to_string(),
                description: Some((*description).to_string()),
                price: Decimal::from(*price),
                stock: *stock,
                status: None,
                category_id,
                image_url: None,
            },
        )
        .await?;
        report.menu_items += 1;
    }

    tracing::info!(
        categories = report.categories,
        users = report.users,
        menu_items = report.menu_items,
        "Demo data seeded"
    );
    Ok(report)
}
