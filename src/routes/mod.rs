use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod doc;
pub mod gift_cards;
pub mod health;
pub mod loyalty;
pub mod orders;
pub mod params;
pub mod products;
pub mod tables;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/orders", orders::router())
        .nest("/loyalty", loyalty::router())
        .nest("/gift-cards", gift_cards::router())
        .nest("/tables", tables::router())
}
