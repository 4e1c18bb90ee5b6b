//! Integration tests for the catalog repositories
//!
//! Each test runs against its own in-memory SQLite database with the
//! real schema applied.

use catalog::database::run_migrations;
use catalog::models::{MenuItemForm, NewMenuItem, NewRestaurant, NewUser, User};
use catalog::repositories::{MenuItemRepository, RestaurantRepository, UserRepository};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn test_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory db
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    run_migrations(&pool).await.expect("Failed to run migrations");

    pool
}

async fn seed_user(pool: &SqlitePool, email: &str) -> User {
    UserRepository::new(pool.clone())
        .create(&NewUser {
            name: "Leslie Knope".to_string(),
            email: email.to_string(),
            picture: "https://example.com/leslie.jpg".to_string(),
        })
        .await
        .expect("Failed to create user")
}

#[tokio::test]
async fn find_or_create_resolves_the_same_user_by_email() {
    let pool = test_pool().await;
    let users = UserRepository::new(pool.clone());

    let new_user = NewUser {
        name: "Ann Perkins".to_string(),
        email: "ann@pawnee.gov".to_string(),
        picture: "https://example.com/ann.jpg".to_string(),
    };

    let first = users.find_or_create(&new_user).await.expect("first login");
    let second = users.find_or_create(&new_user).await.expect("second login");

    assert_eq!(first.id, second.id);

    let other = users
        .find_or_create(&NewUser {
            email: "tom@pawnee.gov".to_string(),
            ..new_user
        })
        .await
        .expect("different email");
    assert_ne!(first.id, other.id);
}

#[tokio::test]
async fn menu_item_owner_is_copied_from_the_restaurant() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@pawnee.gov").await;

    let restaurants = RestaurantRepository::new(pool.clone());
    let restaurant = restaurants
        .create(&NewRestaurant {
            name: "JJ's Diner".to_string(),
            user_id: owner.id,
        })
        .await
        .expect("Failed to create restaurant");

    let items = MenuItemRepository::new(pool.clone());
    let item = items
        .create(&NewMenuItem {
            name: "Waffles".to_string(),
            description: "With whipped cream".to_string(),
            course: "Breakfast".to_string(),
            price: "$8.00".to_string(),
            restaurant_id: restaurant.id,
        })
        .await
        .expect("Failed to create menu item");

    assert_eq!(item.user_id, owner.id);
    assert_eq!(item.restaurant_id, restaurant.id);
}

#[tokio::test]
async fn creating_an_item_under_a_missing_restaurant_fails() {
    let pool = test_pool().await;

    let items = MenuItemRepository::new(pool.clone());
    let result = items
        .create(&NewMenuItem {
            name: "Orphan".to_string(),
            description: String::new(),
            course: String::new(),
            price: String::new(),
            restaurant_id: 999,
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn deleting_a_restaurant_cascades_to_its_menu_items() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@pawnee.gov").await;

    let restaurants = RestaurantRepository::new(pool.clone());
    let items = MenuItemRepository::new(pool.clone());

    let restaurant = restaurants
        .create(&NewRestaurant {
            name: "JJ's Diner".to_string(),
            user_id: owner.id,
        })
        .await
        .expect("Failed to create restaurant");

    for name in ["Waffles", "Bacon", "Eggs"] {
        items
            .create(&NewMenuItem {
                name: name.to_string(),
                description: String::new(),
                course: "Breakfast".to_string(),
                price: "$5.00".to_string(),
                restaurant_id: restaurant.id,
            })
            .await
            .expect("Failed to create menu item");
    }

    restaurants
        .delete(restaurant.id)
        .await
        .expect("Failed to delete restaurant");

    assert!(restaurants
        .find_by_id(restaurant.id)
        .await
        .expect("lookup failed")
        .is_none());
    assert!(items
        .list_for_restaurant(restaurant.id)
        .await
        .expect("listing failed")
        .is_empty());
}

#[tokio::test]
async fn partial_update_preserves_unsubmitted_fields() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@pawnee.gov").await;

    let restaurants = RestaurantRepository::new(pool.clone());
    let items = MenuItemRepository::new(pool.clone());

    let restaurant = restaurants
        .create(&NewRestaurant {
            name: "JJ's Diner".to_string(),
            user_id: owner.id,
        })
        .await
        .expect("Failed to create restaurant");

    let mut item = items
        .create(&NewMenuItem {
            name: "Waffles".to_string(),
            description: "With whipped cream".to_string(),
            course: "Breakfast".to_string(),
            price: "$8.00".to_string(),
            restaurant_id: restaurant.id,
        })
        .await
        .expect("Failed to create menu item");

    // Only the price is submitted; everything else arrives empty
    let form = MenuItemForm {
        name: Some(String::new()),
        description: None,
        course: Some(String::new()),
        price: Some("$9.50".to_string()),
    };
    form.apply(&mut item);
    items.update(&item).await.expect("Failed to update item");

    let reloaded = items
        .find_by_id(item.id)
        .await
        .expect("lookup failed")
        .expect("item exists");
    assert_eq!(reloaded.name, "Waffles");
    assert_eq!(reloaded.description, "With whipped cream");
    assert_eq!(reloaded.course, "Breakfast");
    assert_eq!(reloaded.price, "$9.50");
}

#[tokio::test]
async fn rename_changes_only_the_name() {
    let pool = test_pool().await;
    let owner = seed_user(&pool, "owner@pawnee.gov").await;

    let restaurants = RestaurantRepository::new(pool.clone());
    let restaurant = restaurants
        .create(&NewRestaurant {
            name: "JJ's Diner".to_string(),
            user_id: owner.id,
        })
        .await
        .expect("Failed to create restaurant");

    restaurants
        .rename(restaurant.id, "JJ's Pancake House")
        .await
        .expect("Failed to rename");

    let reloaded = restaurants
        .find_by_id(restaurant.id)
        .await
        .expect("lookup failed")
        .expect("restaurant exists");
    assert_eq!(reloaded.name, "JJ's Pancake House");
    assert_eq!(reloaded.user_id, owner.id);
}
