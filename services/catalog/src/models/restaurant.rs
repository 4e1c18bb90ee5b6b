//! Restaurant model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Restaurant entity
///
/// The owner (`user_id`) is the user who created the restaurant and is
/// immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// New restaurant creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRestaurant {
    pub name: String,
    pub user_id: i64,
}

/// Form payload for restaurant create/edit pages
///
/// Edit applies a partial merge: an absent or empty name keeps the
/// existing value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantForm {
    pub name: Option<String>,
}

impl RestaurantForm {
    /// Returns the submitted name, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Response for the restaurant listing JSON endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantsResponse {
    #[serde(rename = "Restaurants")]
    pub restaurants: Vec<Restaurant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_name_is_none() {
        let form = RestaurantForm {
            name: Some("   ".to_string()),
        };
        assert_eq!(form.name(), None);

        let form = RestaurantForm { name: None };
        assert_eq!(form.name(), None);
    }

    #[test]
    fn form_name_is_trimmed() {
        let form = RestaurantForm {
            name: Some("  Urban Burger  ".to_string()),
        };
        assert_eq!(form.name(), Some("Urban Burger"));
    }
}
