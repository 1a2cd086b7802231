//! API REST de inventario de vehículos
//!
//! CRUD de vehículos identificados por VIN sobre PostgreSQL, más el listado
//! de vehículos vendidos cruzado contra el inventario.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use middleware::cors::cors_layer;
use state::AppState;

/// Construir el router completo de la API
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(routes::vehicle_routes::create_vehicle_router())
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
