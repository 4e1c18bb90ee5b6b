//! Menu item CRUD route handlers

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
    MenuItem, MenuItemForm, Restaurant, User,
    menu_item::{MenuItemResponse, MenuItemsResponse},
};
use crate::routes::{render, restaurants::find_restaurant};
use crate::state::AppState;

/// Public menu, with a portrait of the restaurant's creator.
#[derive(Template)]
#[template(path = "public_menu.html")]
struct PublicMenuTemplate {
    restaurant: Restaurant,
    items: Vec<MenuItem>,
    creator: User,
    flashes: Vec<String>,
}

/// Owner-aware menu with edit/delete links.
#[derive(Template)]
#[template(path = "menu.html")]
struct MenuTemplate {
    restaurant: Restaurant,
    items: Vec<MenuItem>,
    flashes: Vec<String>,
}

#[derive(Template)]
#[template(path = "new_menu_item.html")]
struct NewMenuItemTemplate {
    restaurant: Restaurant,
}

#[derive(Template)]
#[template(path = "edit_menu_item.html")]
struct EditMenuItemTemplate {
    item: MenuItem,
}

#[derive(Template)]
#[template(path = "delete_menu_item.html")]
struct DeleteMenuItemTemplate {
    item: MenuItem,
}

/// Menu listing: the owner sees the editable view, everyone else the
/// public one.
pub async fn show_menu(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Path(restaurant_id): Path<i64>,
) -> Result<Html<String>, CatalogError> {
    let restaurant = find_restaurant(&state, restaurant_id).await?;
    let items = state
        .menu_item_repository
        .list_for_restaurant(restaurant.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list menu items: {e}");
            CatalogError::InternalServerError
        })?;

    let flashes = take_flashes(&session).await;

    let is_owner = user.map(|u| u.id == restaurant.user_id).unwrap_or(false);
    if is_owner {
        render(&MenuTemplate {
            restaurant,
            items,
            flashes,
        })
    } else {
        let creator = state
            .user_repository
            .find_by_id(restaurant.user_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load restaurant creator: {e}");
                CatalogError::InternalServerError
            })?
            .ok_or(CatalogError::NotFound("user"))?;

        render(&PublicMenuTemplate {
            restaurant,
            items,
            creator,
            flashes,
        })
    }
}

/// Create form
pub async fn new_menu_item_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(restaurant_id): Path<i64>,
) -> Result<Html<String>, CatalogError> {
    let restaurant = find_restaurant(&state, restaurant_id).await?;
    ensure_owner(&user, restaurant.user_id)?;

    render(&NewMenuItemTemplate { restaurant })
}

/// Create a menu item; its owner is copied from the restaurant's owner
pub async fn create_menu_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(restaurant_id): Path<i64>,
    Form(form): Form<MenuItemForm>,
) -> Result<Redirect, CatalogError> {
    let restaurant = find_restaurant(&state, restaurant_id).await?;
    ensure_owner(&user, restaurant.user_id)?;

    let new_item = form
        .into_new(restaurant.id)
        .ok_or_else(|| CatalogError::BadRequest("name is required".to_string()))?;

    state
        .menu_item_repository
        .create(&new_item)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create menu item: {e}");
            CatalogError::InternalServerError
        })?;

    push_flash(&session, "new menu item created!").await;
    Ok(Redirect::to(&format!("/restaurant/{restaurant_id}/menu")))
}

/// Edit form
pub async fn edit_menu_item_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((restaurant_id, item_id)): Path<(i64, i64)>,
) -> Result<Html<String>, CatalogError> {
    let item = find_menu_item(&state, restaurant_id, item_id).await?;
    ensure_owner(&user, item.user_id)?;

    render(&EditMenuItemTemplate { item })
}

/// Partial-merge update: only non-empty submitted fields overwrite
pub async fn update_menu_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path((restaurant_id, item_id)): Path<(i64, i64)>,
    Form(form): Form<MenuItemForm>,
) -> Result<Redirect, CatalogError> {
    let mut item = find_menu_item(&state, restaurant_id, item_id).await?;
    ensure_owner(&user, item.user_id)?;

    form.apply(&mut item);

    state.menu_item_repository.update(&item).await.map_err(|e| {
        tracing::error!("Failed to update menu item: {e}");
        CatalogError::InternalServerError
    })?;

    push_flash(&session, "menu item edited!").await;
    Ok(Redirect::to(&format!("/restaurant/{restaurant_id}/menu")))
}

/// Delete confirmation form
pub async fn delete_menu_item_form(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((restaurant_id, item_id)): Path<(i64, i64)>,
) -> Result<Html<String>, CatalogError> {
    let item = find_menu_item(&state, restaurant_id, item_id).await?;
    ensure_owner(&user, item.user_id)?;

    render(&DeleteMenuItemTemplate { item })
}

/// Delete a single menu item
pub async fn delete_menu_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path((restaurant_id, item_id)): Path<(i64, i64)>,
) -> Result<Redirect, CatalogError> {
    let item = find_menu_item(&state, restaurant_id, item_id).await?;
    ensure_owner(&user, item.user_id)?;

    state
        .menu_item_repository
        .delete(item.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete menu item: {e}");
            CatalogError::InternalServerError
        })?;

    push_flash(&session, "menu item deleted!").await;
    Ok(Redirect::to(&format!("/restaurant/{restaurant_id}/menu")))
}

/// JSON endpoint for all items under a restaurant
pub async fn menu_json(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i64>,
) -> Result<impl IntoResponse, CatalogError> {
    let restaurant = find_restaurant(&state, restaurant_id).await?;
    let menu_items = state
        .menu_item_repository
        .list_for_restaurant(restaurant.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list menu items: {e}");
            CatalogError::InternalServerError
        })?;

    Ok(Json(MenuItemsResponse { menu_items }))
}

/// JSON endpoint for a single menu item
pub async fn menu_item_json(
    State(state): State<AppState>,
    Path((restaurant_id, item_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, CatalogError> {
    let menu_item = find_menu_item(&state, restaurant_id, item_id).await?;

    Ok(Json(MenuItemResponse { menu_item }))
}

/// Load a menu item and check it belongs to the restaurant in the path.
async fn find_menu_item(
    state: &AppState,
    restaurant_id: i64,
    item_id: i64,
) -> Result<MenuItem, CatalogError> {
    let item = state
        .menu_item_repository
        .find_by_id(item_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load menu item: {e}");
            CatalogError::InternalServerError
        })?
        .ok_or(CatalogError::NotFound("menu item"))?;

    if item.restaurant_id != restaurant_id {
        return Err(CatalogError::NotFound("menu item"));
    }

    Ok(item)
}
