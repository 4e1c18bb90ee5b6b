//! Catalog web service
//!
//! CRUD pages and JSON endpoints for a restaurants-and-menu-items
//! catalog, with Google/Facebook OAuth2 login and ownership-based
//! authorization.

pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod oauth;
pub mod repositories;
pub mod routes;
pub mod state;
