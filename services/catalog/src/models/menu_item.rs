//! Menu item model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Menu item entity
///
/// `user_id` is copied from the owning restaurant's owner at creation
/// time and gates all later mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub course: String,
    pub price: String,
    pub restaurant_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// New menu item creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub course: String,
    pub price: String,
    pub restaurant_id: i64,
}

/// Form payload for menu item create/edit pages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub course: Option<String>,
    pub price: Option<String>,
}

impl MenuItemForm {
    /// Partial-merge update: only non-empty submitted fields overwrite
    /// the existing values.
    pub fn apply(&self, item: &mut MenuItem) {
        if let Some(name) = non_empty(&self.name) {
            item.name = name.to_string();
        }
        if let Some(description) = non_empty(&self.description) {
            item.description = description.to_string();
        }
        if let Some(course) = non_empty(&self.course) {
            item.course = course.to_string();
        }
        if let Some(price) = non_empty(&self.price) {
            item.price = price.to_string();
        }
    }

    /// Convert into a creation payload; the name is required.
    pub fn into_new(self, restaurant_id: i64) -> Option<NewMenuItem> {
        let name = non_empty(&self.name)?.to_string();
        Some(NewMenuItem {
            name,
            description: non_empty(&self.description).unwrap_or_default().to_string(),
            course: non_empty(&self.course).unwrap_or_default().to_string(),
            price: non_empty(&self.price).unwrap_or_default().to_string(),
            restaurant_id,
        })
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Response for the menu listing JSON endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemsResponse {
    #[serde(rename = "MenuItems")]
    pub menu_items: Vec<MenuItem>,
}

/// Response for the single menu item JSON endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MenuItemResponse {
    #[serde(rename = "MenuItem")]
    pub menu_item: MenuItem,
}
