use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::vehicle::{SoldVehicle, Vehicle};

// Response de vehículo
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub vin: String,
    pub manufacturer_name: String,
    pub horse_power: i32,
    pub model_name: String,
    pub model_year: i32,
    pub purchase_price: f64,
    pub fuel_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

// Request para registrar una venta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSoldVehicleRequest {
    #[validate(length(min = 1))]
    pub vin: String,

    #[serde(rename = "purchasePrice")]
    #[validate(range(min = 0.0))]
    pub purchase_price: f64,

    #[serde(rename = "insurancePolicy")]
    #[validate(length(min = 1))]
    pub insurance_policy: String,

    #[serde(rename = "carDamage")]
    #[validate(range(min = 0.0))]
    pub car_damage: f64,
}

// Response de venta
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldVehicleResponse {
    pub id: i32,
    pub vin: String,
    pub purchase_price: f64,
    pub insurance_policy: String,
    pub car_damage: f64,
}

// Vía texto para que 2200.20 salga exactamente como el literal 2200.2
fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or(0.0)
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            vin: vehicle.vin,
            manufacturer_name: vehicle.manufacturer_name,
            horse_power: vehicle.horse_power,
            model_name: vehicle.model_name,
            model_year: vehicle.model_year,
            purchase_price: decimal_to_f64(vehicle.purchase_price),
            fuel_type: vehicle.fuel_type,
            color: vehicle.color,
            category: vehicle.category,
        }
    }
}

impl From<SoldVehicle> for SoldVehicleResponse {
    fn from(sold: SoldVehicle) -> Self {
        Self {
            id: sold.id,
            vin: sold.vin,
            purchase_price: decimal_to_f64(sold.purchase_price),
            insurance_policy: sold.insurance_policy,
            car_damage: decimal_to_f64(sold.car_damage),
        }
    }
}
