//! Repositorio en memoria
//!
//! Misma semántica que el repositorio PostgreSQL. Cada chequeo seguido de
//! escritura se hace bajo el mismo write lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{VehicleRepository, VehicleUpdate};
use crate::models::vehicle::{NewSoldVehicle, SoldVehicle, Vehicle};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Default)]
struct Tables {
    vehicles: HashMap<String, Vehicle>,
    sold: Vec<SoldVehicle>,
    next_sold_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryVehicleRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        let mut vehicles: Vec<Vehicle> = tables.vehicles.values().cloned().collect();
        vehicles.sort_by(|a, b| a.vin.cmp(&b.vin));
        Ok(vehicles)
    }

    async fn find_by_vin(&self, vin: &str) -> AppResult<Option<Vehicle>> {
        Ok(self.tables.read().await.vehicles.get(vin).cloned())
    }

    async fn vin_exists(&self, vin: &str) -> AppResult<bool> {
        Ok(self.tables.read().await.vehicles.contains_key(vin))
    }

    async fn create(&self, vehicle: Vehicle) -> AppResult<Vehicle> {
        let mut tables = self.tables.write().await;
        if tables.vehicles.contains_key(&vehicle.vin) {
            return Err(AppError::DuplicateVin);
        }
        tables.vehicles.insert(vehicle.vin.clone(), vehicle.clone());
        Ok(vehicle)
    }

    async fn update_with(&self, vin: &str, update: VehicleUpdate) -> AppResult<Option<Vehicle>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.vehicles.get(vin).cloned() else {
            return Ok(None);
        };

        let next = update(current)?;

        if next.vin != vin {
            if tables.vehicles.contains_key(&next.vin) {
                return Err(AppError::DuplicateVin);
            }
            tables.vehicles.remove(vin);
            for sold in tables.sold.iter_mut().filter(|s| s.vin == vin) {
                sold.vin = next.vin.clone();
            }
        }

        tables.vehicles.insert(next.vin.clone(), next.clone());
        Ok(Some(next))
    }

    async fn delete(&self, vin: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.vehicles.remove(vin).is_none() {
            return Ok(false);
        }
        tables.sold.retain(|s| s.vin != vin);
        Ok(true)
    }

    async fn find_all_sold(&self) -> AppResult<Vec<SoldVehicle>> {
        Ok(self.tables.read().await.sold.clone())
    }

    async fn find_by_vins(&self, vins: &[String]) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(vins
            .iter()
            .filter_map(|vin| tables.vehicles.get(vin).cloned())
            .collect())
    }

    async fn create_sold(&self, sold: NewSoldVehicle) -> AppResult<Option<SoldVehicle>> {
        let mut tables = self.tables.write().await;
        if !tables.vehicles.contains_key(&sold.vin) {
            return Ok(None);
        }

        tables.next_sold_id += 1;
        let created = SoldVehicle {
            id: tables.next_sold_id,
            vin: sold.vin,
            purchase_price: sold.purchase_price,
            insurance_policy: sold.insurance_policy,
            car_damage: sold.car_damage,
        };
        tables.sold.push(created.clone());
        Ok(Some(created))
    }
}
