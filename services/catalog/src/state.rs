//! Application state shared across handlers

use sqlx::SqlitePool;

use crate::oauth::{FacebookOAuth, GoogleOAuth};
use crate::repositories::{MenuItemRepository, RestaurantRepository, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub user_repository: UserRepository,
    pub restaurant_repository: RestaurantRepository,
    pub menu_item_repository: MenuItemRepository,
    pub google_oauth: GoogleOAuth,
    pub facebook_oauth: FacebookOAuth,
}
