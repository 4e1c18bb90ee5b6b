//! Shelter and puppy models for the report queries

use chrono::NaiveDate;

/// Shelter entity
#[derive(Debug, Clone)]
pub struct Shelter {
    pub id: i64,
    pub name: String,
}

/// Puppy entity
#[derive(Debug, Clone)]
pub struct Puppy {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub weight: f64,
    pub shelter_id: i64,
}

/// Per-shelter puppy count row for the aggregate report
#[derive(Debug, Clone)]
pub struct ShelterCount {
    pub shelter: Shelter,
    pub puppies: i64,
}
