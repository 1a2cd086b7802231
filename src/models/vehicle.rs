//! Modelo de Vehicle
//!
//! Este módulo contiene los structs que mapean exactamente a las tablas
//! `vehicles` y `sold_vehicles` del schema PostgreSQL.

use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::utils::errors::{out_of_range_error, AppResult};

/// Vehicle principal - mapea a la tabla vehicles (primary key 'vin')
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Vehicle {
    pub vin: String,
    pub manufacturer_name: String,
    pub horse_power: i32,
    pub model_name: String,
    pub model_year: i32,
    pub purchase_price: Decimal,
    pub fuel_type: String,
    pub color: Option<String>,
    pub category: Option<String>,
}

/// Registro de venta - mapea a la tabla sold_vehicles
///
/// `vin` es una referencia lógica a `vehicles.vin`, no una foreign key.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SoldVehicle {
    pub id: i32,
    pub vin: String,
    pub purchase_price: Decimal,
    pub insurance_policy: String,
    pub car_damage: Decimal,
}

/// Datos de una venta antes de ser persistida
#[derive(Debug, Clone, PartialEq)]
pub struct NewSoldVehicle {
    pub vin: String,
    pub purchase_price: Decimal,
    pub insurance_policy: String,
    pub car_damage: Decimal,
}

/// Mayor monto que entra en una columna NUMERIC(12, 2)
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

/// Redondea un monto a dos decimales, como se guarda en la base.
///
/// Los montos que no entran en NUMERIC(12, 2) se rechazan acá, igual para
/// cualquier backend.
pub fn round_amount(field: &'static str, value: f64) -> AppResult<Decimal> {
    let max = max_amount();
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(2))
        .filter(|d| d.abs() <= max)
        .ok_or_else(|| out_of_range_error(field, -max, max))
}
