use async_trait::async_trait;
use sqlx::PgPool;

use super::{VehicleRepository, VehicleUpdate};
use crate::models::vehicle::{NewSoldVehicle, SoldVehicle, Vehicle};
use crate::utils::errors::{AppError, AppResult};

const VEHICLE_COLUMNS: &str = "vin, manufacturer_name, horse_power, model_name, model_year, \
     purchase_price, fuel_type, color, category";

const SOLD_COLUMNS: &str = "id, vin, purchase_price, insurance_policy, car_damage";

/// Repositorio de vehículos sobre PostgreSQL
#[derive(Clone)]
pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// La primary key de vehicles decide entre altas concurrentes con el mismo VIN
fn map_write_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateVin,
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles ORDER BY vin",
            VEHICLE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn find_by_vin(&self, vin: &str) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles WHERE vin = $1",
            VEHICLE_COLUMNS
        ))
        .bind(vin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn vin_exists(&self, vin: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE vin = $1)")
            .bind(vin)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    async fn create(&self, vehicle: Vehicle) -> AppResult<Vehicle> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles ({cols})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {cols}
            "#,
            cols = VEHICLE_COLUMNS
        ))
        .bind(&vehicle.vin)
        .bind(&vehicle.manufacturer_name)
        .bind(vehicle.horse_power)
        .bind(&vehicle.model_name)
        .bind(vehicle.model_year)
        .bind(vehicle.purchase_price)
        .bind(&vehicle.fuel_type)
        .bind(&vehicle.color)
        .bind(&vehicle.category)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_with(&self, vin: &str, update: VehicleUpdate) -> AppResult<Option<Vehicle>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles WHERE vin = $1 FOR UPDATE",
            VEHICLE_COLUMNS
        ))
        .bind(vin)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        // Si la transformación falla, el drop de `tx` hace rollback
        let next = update(current)?;

        let updated = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles
            SET vin = $2, manufacturer_name = $3, horse_power = $4, model_name = $5,
                model_year = $6, purchase_price = $7, fuel_type = $8, color = $9, category = $10
            WHERE vin = $1
            RETURNING {}
            "#,
            VEHICLE_COLUMNS
        ))
        .bind(vin)
        .bind(&next.vin)
        .bind(&next.manufacturer_name)
        .bind(next.horse_power)
        .bind(&next.model_name)
        .bind(next.model_year)
        .bind(next.purchase_price)
        .bind(&next.fuel_type)
        .bind(&next.color)
        .bind(&next.category)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if updated.vin != vin {
            sqlx::query("UPDATE sold_vehicles SET vin = $2 WHERE vin = $1")
                .bind(vin)
                .bind(&updated.vin)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, vin: &str) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM vehicles WHERE vin = $1")
            .bind(vin)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM sold_vehicles WHERE vin = $1")
            .bind(vin)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn find_all_sold(&self) -> AppResult<Vec<SoldVehicle>> {
        let sold = sqlx::query_as::<_, SoldVehicle>(&format!(
            "SELECT {} FROM sold_vehicles ORDER BY id",
            SOLD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(sold)
    }

    async fn find_by_vins(&self, vins: &[String]) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles WHERE vin = ANY($1)",
            VEHICLE_COLUMNS
        ))
        .bind(vins)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn create_sold(&self, sold: NewSoldVehicle) -> AppResult<Option<SoldVehicle>> {
        let mut tx = self.pool.begin().await?;

        // FOR SHARE impide que el vehículo se borre antes del commit
        let vehicle: Option<(String,)> =
            sqlx::query_as("SELECT vin FROM vehicles WHERE vin = $1 FOR SHARE")
                .bind(&sold.vin)
                .fetch_optional(&mut *tx)
                .await?;

        if vehicle.is_none() {
            return Ok(None);
        }

        let created = sqlx::query_as::<_, SoldVehicle>(&format!(
            r#"
            INSERT INTO sold_vehicles (vin, purchase_price, insurance_policy, car_damage)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            SOLD_COLUMNS
        ))
        .bind(&sold.vin)
        .bind(sold.purchase_price)
        .bind(&sold.insurance_policy)
        .bind(sold.car_damage)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(created))
    }
}
