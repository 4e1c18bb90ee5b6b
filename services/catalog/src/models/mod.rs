//! Catalog service models

pub mod menu_item;
pub mod restaurant;
pub mod session;
pub mod user;

// Re-export for convenience
pub use menu_item::{MenuItem, MenuItemForm, NewMenuItem};
pub use restaurant::{NewRestaurant, Restaurant, RestaurantForm};
pub use session::{CurrentUser, session_keys};
pub use user::{NewUser, User};
