use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::dto::vehicle_dto::{CreateSoldVehicleRequest, SoldVehicleResponse, VehicleResponse};
use crate::models::vehicle::{round_amount, NewSoldVehicle, Vehicle};
use crate::repositories::VehicleRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{
    check_vehicle_payload, merge_vehicle_patch, normalize_vin, validate_vehicle_request,
    ValidationMode,
};

/// Servicio de inventario: sólo datos aprobados por el validador llegan al repositorio
#[derive(Clone)]
pub struct VehicleController {
    repository: Arc<dyn VehicleRepository>,
}

impl VehicleController {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.repository.find_all().await?;
        debug!(count = vehicles.len(), "Listando vehículos");
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn create(&self, payload: Value) -> AppResult<VehicleResponse> {
        let repository = &self.repository;
        let input = validate_vehicle_request(&payload, ValidationMode::Create, |vin| async move {
            repository.vin_exists(&vin).await
        })
        .await?;

        let vehicle = repository.create(input.into_vehicle()).await?;
        info!(vin = %vehicle.vin, "🚗 Vehículo creado");

        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn get_by_vin(&self, vin: &str) -> AppResult<VehicleResponse> {
        let vin = normalize_vin(vin);
        let vehicle = self
            .repository
            .find_by_vin(&vin)
            .await?
            .ok_or_else(|| vehicle_not_found(&vin))?;

        Ok(VehicleResponse::from(vehicle))
    }

    /// Reemplazo completo. El VIN del payload puede renombrar el registro.
    pub async fn replace(&self, vin: &str, payload: Value) -> AppResult<VehicleResponse> {
        let vin = normalize_vin(vin);
        let input = validate_vehicle_request(&payload, ValidationMode::Update, |_| async {
            Ok(false)
        })
        .await?;
        let replacement = input.into_vehicle();

        let vehicle = self
            .repository
            .update_with(&vin, Box::new(move |_current: Vehicle| -> AppResult<Vehicle> {
                Ok(replacement)
            }))
            .await?
            .ok_or_else(|| vehicle_not_found(&vin))?;

        info!(vin = %vin, new_vin = %vehicle.vin, "✏️ Vehículo reemplazado");
        Ok(VehicleResponse::from(vehicle))
    }

    /// Merge parcial sobre el estado serializado actual
    pub async fn merge(&self, vin: &str, patch: Value) -> AppResult<VehicleResponse> {
        let vin = normalize_vin(vin);

        let vehicle = self
            .repository
            .update_with(
                &vin,
                Box::new(move |current: Vehicle| -> AppResult<Vehicle> {
                    let current = serde_json::to_value(VehicleResponse::from(current))
                        .map_err(|e| AppError::Internal(e.to_string()))?;
                    let merged = merge_vehicle_patch(&current, &patch)?;
                    Ok(check_vehicle_payload(&merged)?.into_vehicle())
                }),
            )
            .await?
            .ok_or_else(|| vehicle_not_found(&vin))?;

        info!(vin = %vin, new_vin = %vehicle.vin, "✏️ Vehículo actualizado parcialmente");
        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn delete(&self, vin: &str) -> AppResult<()> {
        let vin = normalize_vin(vin);
        if !self.repository.delete(&vin).await? {
            return Err(vehicle_not_found(&vin));
        }

        info!(vin = %vin, "🗑️ Vehículo eliminado");
        Ok(())
    }

    /// Vehículos de inventario correspondientes a cada venta, en orden de venta
    pub async fn list_sold(&self) -> AppResult<Vec<VehicleResponse>> {
        let sold = self.repository.find_all_sold().await?;

        let mut vins: Vec<String> = sold.iter().map(|s| s.vin.clone()).collect();
        vins.sort_unstable();
        vins.dedup();

        let inventory: HashMap<String, Vehicle> = self
            .repository
            .find_by_vins(&vins)
            .await?
            .into_iter()
            .map(|v| (v.vin.clone(), v))
            .collect();

        sold.into_iter()
            .map(|s| {
                inventory
                    .get(&s.vin)
                    .cloned()
                    .map(VehicleResponse::from)
                    .ok_or(AppError::UnresolvedReference(s.vin))
            })
            .collect()
    }

    pub async fn create_sold(
        &self,
        request: CreateSoldVehicleRequest,
    ) -> AppResult<SoldVehicleResponse> {
        request.validate()?;

        let vin = normalize_vin(&request.vin);
        let new_sale = NewSoldVehicle {
            vin: vin.clone(),
            purchase_price: round_amount("purchasePrice", request.purchase_price)?,
            insurance_policy: request.insurance_policy,
            car_damage: round_amount("carDamage", request.car_damage)?,
        };

        let sold = match self.repository.create_sold(new_sale).await? {
            Some(sold) => sold,
            None => {
                warn!(vin = %vin, "Venta para un vehículo inexistente");
                return Err(vehicle_not_found(&vin));
            }
        };

        info!(vin = %sold.vin, id = sold.id, "💰 Venta registrada");
        Ok(SoldVehicleResponse::from(sold))
    }
}

fn vehicle_not_found(vin: &str) -> AppError {
    not_found_error("vehicle", "vin", vin)
}
