use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::dto::vehicle_dto::{CreateSoldVehicleRequest, SoldVehicleResponse, VehicleResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/vehicle", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicle/:vin",
            get(get_vehicle)
                .put(replace_vehicle)
                .patch(merge_vehicle)
                .delete(delete_vehicle),
        )
        .route("/vehicle_sold", get(list_sold_vehicles).post(create_sold_vehicle))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let response = state.vehicles.list().await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<VehicleResponse>), AppError> {
    let Json(payload) = payload?;
    let response = state.vehicles.create(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<Json<VehicleResponse>, AppError> {
    let response = state.vehicles.get_by_vin(&vin).await?;
    Ok(Json(response))
}

async fn replace_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<VehicleResponse>, AppError> {
    let Json(payload) = payload?;
    let response = state.vehicles.replace(&vin, payload).await?;
    Ok(Json(response))
}

async fn merge_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<VehicleResponse>, AppError> {
    let Json(payload) = payload?;
    let response = state.vehicles.merge(&vin, payload).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> Result<StatusCode, AppError> {
    state.vehicles.delete(&vin).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_sold_vehicles(
    State(state): State<AppState>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let response = state.vehicles.list_sold().await?;
    Ok(Json(response))
}

async fn create_sold_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<CreateSoldVehicleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SoldVehicleResponse>), AppError> {
    let Json(request) = payload?;
    let response = state.vehicles.create_sold(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
