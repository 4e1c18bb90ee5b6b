//! Catalog service repositories

pub mod menu_item;
pub mod restaurant;
pub mod user;

pub use menu_item::MenuItemRepository;
pub use restaurant::RestaurantRepository;
pub use user::UserRepository;
