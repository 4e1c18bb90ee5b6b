//! Restaurant repository for database operations

use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use tracing::info;

use crate::models::{NewRestaurant, Restaurant};

/// Restaurant repository
#[derive(Clone)]
pub struct RestaurantRepository {
    pool: SqlitePool,
}

impl RestaurantRepository {
    /// Create a new restaurant repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new restaurant owned by the given user
    pub async fn create(&self, new_restaurant: &NewRestaurant) -> Result<Restaurant> {
        info!("Creating new restaurant: {}", new_restaurant.name);

        let row = sqlx::query(
            r#"
            INSERT INTO restaurants (name, user_id, created_at)
            VALUES (?, ?, ?)
            RETURNING id, name, user_id, created_at
            "#,
        )
        .bind(&new_restaurant.name)
        .bind(new_restaurant.user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(map_restaurant(&row))
    }

    /// List all restaurants
    pub async fn list_all(&self) -> Result<Vec<Restaurant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, user_id, created_at
            FROM restaurants
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_restaurant).collect())
    }

    /// Find a restaurant by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, user_id, created_at
            FROM restaurants
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_restaurant))
    }

    /// Rename a restaurant
    ///
    /// Only the name is mutable; the owner is fixed at creation.
    pub async fn rename(&self, id: i64, name: &str) -> Result<()> {
        info!("Renaming restaurant {id}");

        sqlx::query("UPDATE restaurants SET name = ? WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a restaurant and all of its menu items
    ///
    /// The child rows are removed first so the whole cascade commits or
    /// rolls back as a unit.
    pub async fn delete(&self, id: i64) -> Result<()> {
        info!("Deleting restaurant {id} and its menu");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM menu_items WHERE restaurant_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM restaurants WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

fn map_restaurant(row: &SqliteRow) -> Restaurant {
    Restaurant {
        id: row.get("id"),
        name: row.get("name"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    }
}
