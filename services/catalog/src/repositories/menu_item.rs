//! Menu item repository for database operations

use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;

use crate::models::{MenuItem, NewMenuItem};

/// Menu item repository
#[derive(Clone)]
pub struct MenuItemRepository {
    pool: SqlitePool,
}

impl MenuItemRepository {
    /// Create a new menu item repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new menu item under a restaurant
    ///
    /// The item's owner is copied from the owning restaurant's owner at
    /// creation time.
    pub async fn create(&self, new_item: &NewMenuItem) -> Result<MenuItem> {
        info!(
            "Creating menu item '{}' for restaurant {}",
            new_item.name, new_item.restaurant_id
        );

        let row = sqlx::query(
            r#"
            INSERT INTO menu_items (name, description, course, price, restaurant_id, user_id, created_at)
            SELECT ?, ?, ?, ?, id, user_id, ?
            FROM restaurants
            WHERE id = ?
            RETURNING id, name, description, course, price, restaurant_id, user_id, created_at
            "#,
        )
        .bind(&new_item.name)
        .bind(&new_item.description)
        .bind(&new_item.course)
        .bind(&new_item.price)
        .bind(Utc::now())
        .bind(new_item.restaurant_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_menu_item).ok_or_else(|| {
            anyhow::anyhow!("restaurant {} does not exist", new_item.restaurant_id)
        })
    }

    /// List all menu items belonging to a restaurant
    pub async fn list_for_restaurant(&self, restaurant_id: i64) -> Result<Vec<MenuItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, course, price, restaurant_id, user_id, created_at
            FROM menu_items
            WHERE restaurant_id = ?
            ORDER BY id
            "#,
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_menu_item).collect())
    }

    /// Find a menu item by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<MenuItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, course, price, restaurant_id, user_id, created_at
            FROM menu_items
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_menu_item))
    }

    /// Persist the mutable fields of a menu item
    pub async fn update(&self, item: &MenuItem) -> Result<()> {
        info!("Updating menu item {}", item.id);

        sqlx::query(
            r#"
            UPDATE menu_items
            SET name = ?, description = ?, course = ?, price = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.course)
        .bind(&item.price)
        .bind(item.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a single menu item
    pub async fn delete(&self, id: i64) -> Result<()> {
        info!("Deleting menu item {id}");

        sqlx::query("DELETE FROM menu_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn map_menu_item(row: &SqliteRow) -> MenuItem {
    MenuItem {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        course: row.get("course"),
        price: row.get("price"),
        restaurant_id: row.get("restaurant_id"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    }
}
