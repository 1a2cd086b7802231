//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El servicio se construye una sola vez.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::controllers::vehicle_controller::VehicleController;
use crate::repositories::VehicleRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub vehicles: Arc<VehicleController>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, repository: Arc<dyn VehicleRepository>) -> Self {
        Self {
            config,
            vehicles: Arc::new(VehicleController::new(repository)),
        }
    }
}
