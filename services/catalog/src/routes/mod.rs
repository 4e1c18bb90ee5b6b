//! Catalog service routes

pub mod auth;
pub mod menu_items;
pub mod restaurants;

use askama::Template;
use axum::{
    Json, Router,
    response::{Html, IntoResponse},
    routing::get,
};
use serde_json::json;

use crate::error::CatalogError;
use crate::state::AppState;

/// Create the router for the catalog service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(restaurants::show_restaurants))
        .route("/restaurants", get(restaurants::show_restaurants))
        .route(
            "/restaurant/new",
            get(restaurants::new_restaurant_form).post(restaurants::create_restaurant),
        )
        .route(
            "/restaurant/:restaurant_id/edit",
            get(restaurants::edit_restaurant_form).post(restaurants::update_restaurant),
        )
        .route(
            "/restaurant/:restaurant_id/delete",
            get(restaurants::delete_restaurant_form).post(restaurants::delete_restaurant),
        )
        .route("/restaurant/:restaurant_id", get(menu_items::show_menu))
        .route("/restaurant/:restaurant_id/menu", get(menu_items::show_menu))
        .route(
            "/restaurant/:restaurant_id/menu/new",
            get(menu_items::new_menu_item_form).post(menu_items::create_menu_item),
        )
        .route(
            "/restaurant/:restaurant_id/menu/:item_id/edit",
            get(menu_items::edit_menu_item_form).post(menu_items::update_menu_item),
        )
        .route(
            "/restaurant/:restaurant_id/menu/:item_id/delete",
            get(menu_items::delete_menu_item_form).post(menu_items::delete_menu_item),
        )
        .route("/restaurants/JSON", get(restaurants::restaurants_json))
        .route(
            "/restaurant/:restaurant_id/menu/JSON",
            get(menu_items::menu_json),
        )
        .route(
            "/restaurant/:restaurant_id/menu/:item_id/JSON",
            get(menu_items::menu_item_json),
        )
        .route("/login", get(auth::show_login))
        .route("/gconnect", axum::routing::post(auth::gconnect))
        .route("/fbconnect", axum::routing::post(auth::fbconnect))
        .route("/disconnect", get(auth::disconnect))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "catalog-service"
    }))
}

/// Render an askama template into an HTML response.
pub(crate) fn render<T: Template>(template: &T) -> Result<Html<String>, CatalogError> {
    template.render().map(Html).map_err(|e| {
        tracing::error!("Failed to render template: {e}");
        CatalogError::InternalServerError
    })
}
