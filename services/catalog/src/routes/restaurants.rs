//! Restaurant CRUD route handlers

use askama::Template;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect},
};
use tower_sessions::Session;

use crate::error::CatalogError;
use crate::middleware::{OptionalAuth, RequireAuth, ensure_owner, push_flash, take_flashes};
use crate::models::{
    CurrentUser, NewRestaurant, Restaurant, RestaurantForm, restaurant::RestaurantsResponse,
};
use crate::routes::render;
use crate::state::AppState;

/// Public restaurant listing, shown to anonymous visitors.
#[derive(Template)]
#[template(path = "public_restaurants.html")]
struct PublicRestaurantsTemplate {
    restaurants: Vec<Restaurant>,
    flashes: Vec<String>,
}

/// Owner-aware restaurant listing, shown to logged-in users.
#[derive(Template)]
#[template(path = "restaurants.html")]
struct RestaurantsTemplate {
    restaurants: Vec<Restaurant>,
    user: CurrentUser,
    flashes: Vec<String>,
}

#[derive(Template)]
#[template(path = "new_restaurant.html")]
struct NewRestaurantTemplate;

#[derive(Template)]
#[template(path = "edit_restaurant.html")]
struct EditRestaurantTemplate {
    restaurant: Restaurant,
}

#[derive(Template)]
#[template(path = "delete_restaurant.html")]
struct DeleteRestaurantTemplate {
    restaurant: Restaurant,
}

/// Root listing route: public when anonymous, owner-augmented when
/// logged in.
pub async fn show_restaurants(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<Html<String>, CatalogError> {
    let restaurants = state.restaurant_repository.list_all().await.map_err(|e| {
        tracing::error!("Failed to list restaurants: {e}");
        CatalogError::InternalServerError
    })?;

    let flashes = take_flashes(&session).await;

    match user {
        Some(user) => render(&RestaurantsTemplate {
            restaurants,
            user,
            flashes,
        }),
        None => render(&PublicRestaurantsTemplate {
            restaurants,
            flashes,
        }),
    }
}

/// Create form
pub async fn new_restaurant_form(
    RequireAuth(_user): RequireAuth,
) -> Result<Html<String>, CatalogError> {
    render(&NewRestaurantTemplate)
}

/// Create a restaurant owned by the current user
pub async fn create_restaurant(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<RestaurantForm>,
) -> Result<Redirect, CatalogError> {
    let name = form
        .name()
        .ok_or_else(|| CatalogError::BadRequest("name is required".to_string()))?;

    state
        .restaurant_repository
        .create(&NewRestaurant {
            name: name.to_string(),
            user_id: user.id,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create restaurant: {e}");
            CatalogError::InternalServerError
        })?;

    push_flash(&session, "new restaurant created!").await;
    Ok(Redirect::to("/restaurants"))
}

/// Edit form; only the owner gets this far
pub async fn edit_restaurant_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(restaurant_id): Path<i64>,
) -> Result<Html<String>, CatalogError> {
    let restaurant = find_restaurant(&state, restaurant_id).await?;
    ensure_owner(&user, restaurant.user_id)?;

    render(&EditRestaurantTemplate { restaurant })
}

/// Partial-merge update: an empty submitted name keeps the old one
pub async fn update_restaurant(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(restaurant_id): Path<i64>,
    Form(form): Form<RestaurantForm>,
) -> Result<Redirect, CatalogError> {
    let restaurant = find_restaurant(&state, restaurant_id).await?;
    ensure_owner(&user, restaurant.user_id)?;

    if let Some(name) = form.name() {
        state
            .restaurant_repository
            .rename(restaurant.id, name)
            .await
            .map_err(|e| {
                tracing::error!("Failed to rename restaurant: {e}");
                CatalogError::InternalServerError
            })?;
    }

    push_flash(&session, "restaurant edited!").await;
    Ok(Redirect::to("/restaurants"))
}

/// Delete confirmation form
pub async fn delete_restaurant_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(restaurant_id): Path<i64>,
) -> Result<Html<String>, CatalogError> {
    let restaurant = find_restaurant(&state, restaurant_id).await?;
    ensure_owner(&user, restaurant.user_id)?;

    render(&DeleteRestaurantTemplate { restaurant })
}

/// Cascading delete: the restaurant and all of its menu items
pub async fn delete_restaurant(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(restaurant_id): Path<i64>,
) -> Result<Redirect, CatalogError> {
    let restaurant = find_restaurant(&state, restaurant_id).await?;
    ensure_owner(&user, restaurant.user_id)?;

    state
        .restaurant_repository
        .delete(restaurant.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete restaurant: {e}");
            CatalogError::InternalServerError
        })?;

    push_flash(&session, "restaurant and menu deleted!").await;
    Ok(Redirect::to("/restaurants"))
}

/// JSON endpoint for the restaurant listing
pub async fn restaurants_json(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, CatalogError> {
    let restaurants = state.restaurant_repository.list_all().await.map_err(|e| {
        tracing::error!("Failed to list restaurants: {e}");
        CatalogError::InternalServerError
    })?;

    Ok(Json(RestaurantsResponse { restaurants }))
}

pub(crate) async fn find_restaurant(
    state: &AppState,
    restaurant_id: i64,
) -> Result<Restaurant, CatalogError> {
    state
        .restaurant_repository
        .find_by_id(restaurant_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load restaurant: {e}");
            CatalogError::InternalServerError
        })?
        .ok_or(CatalogError::NotFound("restaurant"))
}
