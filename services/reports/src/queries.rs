//! The four fixed report queries against the shelters/puppies database

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::models::{Puppy, Shelter, ShelterCount};

/// All puppies, ordered by name ascending
pub async fn puppies_by_name(pool: &SqlitePool) -> Result<Vec<Puppy>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, date_of_birth, weight, shelter_id
        FROM puppies
        ORDER BY name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_puppy).collect())
}

/// Puppies born after the cutoff date, youngest first
pub async fn puppies_born_since(pool: &SqlitePool, cutoff: NaiveDate) -> Result<Vec<Puppy>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, date_of_birth, weight, shelter_id
        FROM puppies
        WHERE date_of_birth > ?
        ORDER BY date_of_birth DESC
        "#,
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_puppy).collect())
}

/// All puppies, ordered by weight ascending
pub async fn puppies_by_weight(pool: &SqlitePool) -> Result<Vec<Puppy>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, date_of_birth, weight, shelter_id
        FROM puppies
        ORDER BY weight ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_puppy).collect())
}

/// Per-shelter puppy counts via join + group-by
///
/// Inner join: shelters without any puppies are omitted.
pub async fn puppy_counts_by_shelter(pool: &SqlitePool) -> Result<Vec<ShelterCount>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.name, COUNT(p.id) AS puppies
        FROM shelters s
        JOIN puppies p ON p.shelter_id = s.id
        GROUP BY s.id
        ORDER BY s.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| ShelterCount {
            shelter: Shelter {
                id: row.get("id"),
                name: row.get("name"),
            },
            puppies: row.get("puppies"),
        })
        .collect())
}

fn map_puppy(row: &SqliteRow) -> Puppy {
    Puppy {
        id: row.get("id"),
        name: row.get("name"),
        date_of_birth: row.get("date_of_birth"),
        weight: row.get("weight"),
        shelter_id: row.get("shelter_id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn fixture_pool() -> SqlitePool {
        // A single connection keeps every query on the same in-memory db
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        sqlx::query(
            r#"
            CREATE TABLE shelters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to create shelters table");

        sqlx::query(
            r#"
            CREATE TABLE puppies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                date_of_birth TEXT NOT NULL,
                weight REAL NOT NULL,
                shelter_id INTEGER NOT NULL REFERENCES shelters(id)
            )
            "#,
        )
        .execute(&pool)
        .await
        .expect("Failed to create puppies table");

        for name in ["Oakland SPCA", "San Francisco SPCA", "Marin Humane Society"] {
            sqlx::query("INSERT INTO shelters (name) VALUES (?)")
                .bind(name)
                .execute(&pool)
                .await
                .expect("Failed to insert shelter");
        }

        let today = Utc::now().date_naive();
        let puppies = [
            ("Rex", today - Duration::weeks(30), 12.5, 1),
            ("Bailey", today - Duration::weeks(4), 3.2, 1),
            ("Ziggy", today - Duration::weeks(10), 5.0, 2),
            ("Abby", today - Duration::weeks(52), 20.1, 2),
        ];
        for (name, dob, weight, shelter_id) in puppies {
            sqlx::query(
                "INSERT INTO puppies (name, date_of_birth, weight, shelter_id) VALUES (?, ?, ?, ?)",
            )
            .bind(name)
            .bind(dob)
            .bind(weight)
            .bind(shelter_id)
            .execute(&pool)
            .await
            .expect("Failed to insert puppy");
        }

        pool
    }

    #[tokio::test]
    async fn puppies_are_ordered_by_name() {
        let pool = fixture_pool().await;
        let puppies = puppies_by_name(&pool).await.expect("query failed");

        let names: Vec<&str> = puppies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Abby", "Bailey", "Rex", "Ziggy"]);
    }

    #[tokio::test]
    async fn recent_puppies_are_filtered_and_newest_first() {
        let pool = fixture_pool().await;
        let cutoff = Utc::now().date_naive() - Duration::weeks(24);
        let puppies = puppies_born_since(&pool, cutoff).await.expect("query failed");

        let names: Vec<&str> = puppies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bailey", "Ziggy"]);
        assert!(puppies.iter().all(|p| p.date_of_birth > cutoff));
    }

    #[tokio::test]
    async fn puppies_are_ordered_by_weight() {
        let pool = fixture_pool().await;
        let puppies = puppies_by_weight(&pool).await.expect("query failed");

        let weights: Vec<f64> = puppies.iter().map(|p| p.weight).collect();
        assert_eq!(weights, vec![3.2, 5.0, 12.5, 20.1]);
    }

    #[tokio::test]
    async fn counts_match_puppies_per_shelter() {
        let pool = fixture_pool().await;
        let counts = puppy_counts_by_shelter(&pool).await.expect("query failed");

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].shelter.name, "Oakland SPCA");
        assert_eq!(counts[0].puppies, 2);
        assert_eq!(counts[1].shelter.name, "San Francisco SPCA");
        assert_eq!(counts[1].puppies, 2);
        // The shelter with no puppies does not appear
        assert!(counts.iter().all(|c| c.shelter.name != "Marin Humane Society"));
    }
}
