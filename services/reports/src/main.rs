use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod models;
mod queries;

use common::database::{DatabaseConfig, init_pool};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting shelter reports");

    let db_config = DatabaseConfig {
        database_url: std::env::var("PUPPIES_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://puppies.db".to_string()),
        max_connections: 1,
    };
    let pool = init_pool(&db_config).await?;

    println!("== All puppies by name ==");
    for puppy in queries::puppies_by_name(&pool).await? {
        println!("{}", puppy.name);
    }

    println!("\n== Puppies born in the last 24 weeks, newest first ==");
    let cutoff = Utc::now().date_naive() - Duration::weeks(24);
    for puppy in queries::puppies_born_since(&pool, cutoff).await? {
        println!("{} {} {}", puppy.id, puppy.name, puppy.date_of_birth);
    }

    println!("\n== All puppies by weight ==");
    for puppy in queries::puppies_by_weight(&pool).await? {
        println!("{} {} {}", puppy.id, puppy.name, puppy.weight);
    }

    println!("\n== Puppy count per shelter ==");
    for count in queries::puppy_counts_by_shelter(&pool).await? {
        println!("{} {} {}", count.shelter.id, count.shelter.name, count.puppies);
    }

    Ok(())
}
