//! Repositorios de persistencia
//!
//! El trait `VehicleRepository` separa la mecánica de persistencia de la
//! lógica de validación. Cada mutación es atómica respecto a otros escritores.

pub mod memory_repository;
pub mod vehicle_repository;

use async_trait::async_trait;

use crate::models::vehicle::{NewSoldVehicle, SoldVehicle, Vehicle};
use crate::utils::errors::AppResult;

pub use memory_repository::InMemoryVehicleRepository;
pub use vehicle_repository::PgVehicleRepository;

/// Transformación pura aplicada sobre la fila bloqueada durante un update
pub type VehicleUpdate = Box<dyn FnOnce(Vehicle) -> AppResult<Vehicle> + Send>;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn find_all(&self) -> AppResult<Vec<Vehicle>>;

    async fn find_by_vin(&self, vin: &str) -> AppResult<Option<Vehicle>>;

    async fn vin_exists(&self, vin: &str) -> AppResult<bool>;

    /// Inserta el vehículo; `DuplicateVin` si la clave ya existe
    async fn create(&self, vehicle: Vehicle) -> AppResult<Vehicle>;

    /// Lee la fila `vin`, le aplica `update` y guarda el resultado en la
    /// misma transacción. `Ok(None)` si la fila no existe.
    ///
    /// Si el resultado cambia el VIN, las ventas que apuntaban al VIN viejo
    /// pasan al nuevo; chocar con otro vehículo existente es `DuplicateVin`.
    async fn update_with(&self, vin: &str, update: VehicleUpdate) -> AppResult<Option<Vehicle>>;

    /// Borra el vehículo y sus ventas. `false` si no existía.
    async fn delete(&self, vin: &str) -> AppResult<bool>;

    async fn find_all_sold(&self) -> AppResult<Vec<SoldVehicle>>;

    async fn find_by_vins(&self, vins: &[String]) -> AppResult<Vec<Vehicle>>;

    /// Registra una venta; `Ok(None)` si el VIN no existe en inventario
    async fn create_sold(&self, sold: NewSoldVehicle) -> AppResult<Option<SoldVehicle>>;
}
