//! Utilidades de validación
//!
//! Este módulo decide si un payload de vehículo es aceptable antes de que
//! llegue a la base. Los chequeos siguen un orden fijo y se reporta sólo el
//! primer fallo encontrado.

use std::future::Future;

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::models::vehicle::{round_amount, Vehicle};
use crate::utils::errors::{
    bad_request_error, out_of_range_error, AppError, AppResult, ExpectedKind,
};

/// Campos obligatorios, en el orden en que se reportan
pub const REQUIRED_FIELDS: [&str; 7] = [
    "vin",
    "manufacturerName",
    "horsePower",
    "modelName",
    "modelYear",
    "purchasePrice",
    "fuelType",
];

/// Campos que un PATCH puede sobrescribir; el resto se ignora
pub const MERGEABLE_FIELDS: [&str; 9] = [
    "vin",
    "manufacturerName",
    "horsePower",
    "modelName",
    "modelYear",
    "purchasePrice",
    "fuelType",
    "color",
    "category",
];

/// Modo de validación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Alta: el VIN no puede existir todavía
    Create,
    /// Reemplazo o merge: el registro existente se sobrescribe en su lugar
    Update,
}

/// Payload ya tipado, con el VIN normalizado y el precio a dos decimales
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleInput {
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

impl VehicleInput {
    /// Convierte el input en la fila a persistir
    pub fn into_vehicle(self) -> Vehicle {
        Vehicle {
            vin: self.vin,
            manufacturer_name: self.manufacturer_name,
            horse_power: self.horse_power,
            model_name: self.model_name,
            model_year: self.model_year,
            purchase_price: self.purchase_price,
            fuel_type: self.fuel_type,
            color: self.color,
            category: self.category,
        }
    }
}

/// Normaliza un VIN a mayúsculas
pub fn normalize_vin(vin: &str) -> String {
    vin.to_uppercase()
}

/// Valida un payload completo de vehículo.
///
/// En modo `Create` consulta `exists_by_vin` con el VIN ya normalizado y
/// falla con `DuplicateVin` si existe. En modo `Update` la consulta no se
/// hace. La función no escribe nada; puede llamarse repetidas veces.
pub async fn validate_vehicle_request<F, Fut>(
    payload: &Value,
    mode: ValidationMode,
    exists_by_vin: F,
) -> AppResult<VehicleInput>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    let input = check_vehicle_payload(payload)?;

    if mode == ValidationMode::Create && exists_by_vin(input.vin.clone()).await? {
        return Err(AppError::DuplicateVin);
    }

    Ok(input)
}

/// Chequeos de presencia, tipo y rango, sin tocar la base
pub fn check_vehicle_payload(payload: &Value) -> AppResult<VehicleInput> {
    let fields = payload
        .as_object()
        .ok_or_else(|| bad_request_error("request body must be a JSON object"))?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !fields.contains_key(**f)) {
        return Err(AppError::MissingField(*missing));
    }

    let manufacturer_name = require_string(fields, "manufacturerName")?;
    let horse_power = require_int(fields, "horsePower")?;
    let model_name = require_string(fields, "modelName")?;
    let model_year = require_int(fields, "modelYear")?;
    let purchase_price = fields
        .get("purchasePrice")
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite())
        .ok_or(AppError::InvalidType {
            field: "purchasePrice",
            kind: ExpectedKind::Number,
        })?;
    let purchase_price = round_amount("purchasePrice", purchase_price)?;
    let fuel_type = require_string(fields, "fuelType")?;
    let color = optional_string(fields, "color")?;
    let category = optional_string(fields, "category")?;
    let vin = require_string(fields, "vin")?;

    Ok(VehicleInput {
        vin: normalize_vin(&vin),
        manufacturer_name,
        horse_power,
        model_name,
        model_year,
        purchase_price,
        fuel_type,
        color,
        category,
    })
}

/// Superpone los campos reconocidos de `patch` sobre el estado serializado actual
pub fn merge_vehicle_patch(current: &Value, patch: &Value) -> AppResult<Value> {
    let patch = patch
        .as_object()
        .ok_or_else(|| bad_request_error("request body must be a JSON object"))?;

    let mut merged = current.as_object().cloned().unwrap_or_default();
    for field in MERGEABLE_FIELDS {
        if let Some(value) = patch.get(field) {
            merged.insert(field.to_string(), value.clone());
        }
    }

    Ok(Value::Object(merged))
}

fn require_string(fields: &Map<String, Value>, field: &'static str) -> AppResult<String> {
    fields
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(AppError::InvalidType {
            field,
            kind: ExpectedKind::String,
        })
}

// Las columnas son INTEGER: un entero que no entra en i32 es un error de rango
fn require_int(fields: &Map<String, Value>, field: &'static str) -> AppResult<i32> {
    match fields.get(field) {
        Some(value) if value.is_i64() || value.is_u64() => value
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| out_of_range_error(field, i32::MIN, i32::MAX)),
        _ => Err(AppError::InvalidType {
            field,
            kind: ExpectedKind::Int,
        }),
    }
}

// null equivale a ausente
fn optional_string(fields: &Map<String, Value>, field: &'static str) -> AppResult<Option<String>> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::InvalidType {
            field,
            kind: ExpectedKind::String,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "vin": "3vwfa81h9pm123456",
            "manufacturerName": "Volkswagen",
            "modelName": "Jetta",
            "modelYear": 1993,
            "fuelType": "Gasoline",
            "horsePower": 115,
            "purchasePrice": 2200.20
        })
    }

    fn error_message(result: AppResult<VehicleInput>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_valid_payload_normalizes_vin() {
        let input = check_vehicle_payload(&payload()).unwrap();
        assert_eq!(input.vin, "3VWFA81H9PM123456");
        assert_eq!(input.horse_power, 115);
        assert_eq!(input.color, None);
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let mut body = payload();
        let fields = body.as_object_mut().unwrap();
        fields.remove("fuelType");
        fields.remove("modelName");

        assert_eq!(error_message(check_vehicle_payload(&body)), "modelName not in request");
    }

    #[test]
    fn test_missing_check_runs_before_type_checks() {
        let mut body = payload();
        body["manufacturerName"] = json!(0);
        body.as_object_mut().unwrap().remove("fuelType");

        assert_eq!(error_message(check_vehicle_payload(&body)), "fuelType not in request");
    }

    #[test]
    fn test_type_checks_follow_fixed_order() {
        let mut body = payload();
        body["fuelType"] = json!(1);
        body["modelYear"] = json!("1993");
        body["vin"] = json!(42);

        assert_eq!(error_message(check_vehicle_payload(&body)), "'modelYear' must be a int");
    }

    #[test]
    fn test_each_wrong_type() {
        let cases = [
            ("vin", json!(0), "'vin' must be a string"),
            ("manufacturerName", json!(0), "'manufacturerName' must be a string"),
            ("horsePower", json!("bad_val"), "'horsePower' must be a int"),
            ("horsePower", json!(115.5), "'horsePower' must be a int"),
            ("modelName", json!(null), "'modelName' must be a string"),
            ("modelYear", json!(true), "'modelYear' must be a int"),
            ("purchasePrice", json!("bad_val"), "'purchasePrice' must be a int or float"),
            ("fuelType", json!(["Gasoline"]), "'fuelType' must be a string"),
            ("color", json!(3), "'color' must be a string"),
        ];

        for (field, value, expected) in cases {
            let mut body = payload();
            body[field] = value;
            assert_eq!(error_message(check_vehicle_payload(&body)), expected, "field {}", field);
        }
    }

    #[test]
    fn test_integer_price_is_accepted() {
        let mut body = payload();
        body["purchasePrice"] = json!(2200);
        assert_eq!(check_vehicle_payload(&body).unwrap().purchase_price, Decimal::from(2200));
    }

    #[test]
    fn test_price_is_rounded_and_bounded() {
        let mut body = payload();
        body["purchasePrice"] = json!(2200.256);
        assert_eq!(
            check_vehicle_payload(&body).unwrap().purchase_price,
            Decimal::new(220026, 2)
        );

        for price in [json!(12_345_678_901.5), json!(1e30)] {
            body["purchasePrice"] = price;
            assert_eq!(
                error_message(check_vehicle_payload(&body)),
                "'purchasePrice' must be between -9999999999.99 and 9999999999.99"
            );
        }
    }

    #[test]
    fn test_integers_outside_i32_are_range_errors() {
        let cases = [
            ("horsePower", json!(3_000_000_000_i64)),
            ("modelYear", json!(-3_000_000_000_i64)),
            ("horsePower", json!(u64::MAX)),
        ];

        for (field, value) in cases {
            let mut body = payload();
            body[field] = value;
            assert_eq!(
                error_message(check_vehicle_payload(&body)),
                format!("'{}' must be between -2147483648 and 2147483647", field)
            );
        }
    }

    #[test]
    fn test_non_object_payload() {
        let result = check_vehicle_payload(&json!([1, 2, 3]));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_mode_rejects_existing_vin() {
        let result = validate_vehicle_request(&payload(), ValidationMode::Create, |vin| async move {
            Ok(vin == "3VWFA81H9PM123456")
        })
        .await;

        assert!(matches!(result, Err(AppError::DuplicateVin)));
    }

    #[tokio::test]
    async fn test_update_mode_skips_lookup() {
        let result = validate_vehicle_request(&payload(), ValidationMode::Update, |_| async {
            Err(AppError::Internal("lookup must not run".to_string()))
        })
        .await;

        assert_eq!(result.unwrap().vin, "3VWFA81H9PM123456");
    }

    #[test]
    fn test_merge_overlays_known_fields_only() {
        let current = json!({ "vin": "ABC", "modelYear": 1993, "color": "red" });
        let patch = json!({ "modelYear": 2018, "color": null, "owner": "nobody" });

        let merged = merge_vehicle_patch(&current, &patch).unwrap();
        assert_eq!(merged, json!({ "vin": "ABC", "modelYear": 2018, "color": null }));
    }
}
