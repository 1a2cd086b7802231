//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool de conexiones y asegura que las tablas existan.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS vehicles (
        vin               TEXT PRIMARY KEY,
        manufacturer_name TEXT NOT NULL,
        horse_power       INTEGER NOT NULL,
        model_name        TEXT NOT NULL,
        model_year        INTEGER NOT NULL,
        purchase_price    NUMERIC(12, 2) NOT NULL,
        fuel_type         TEXT NOT NULL,
        color             TEXT,
        category          TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sold_vehicles (
        id               SERIAL PRIMARY KEY,
        vin              TEXT NOT NULL,
        purchase_price   NUMERIC(12, 2) NOT NULL,
        insurance_policy TEXT NOT NULL,
        car_damage       NUMERIC(12, 2) NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS sold_vehicles_vin_idx ON sold_vehicles (vin)",
];

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!("🔌 Conectando a {}", mask_database_url(&config.url));

    let pool = config
        .create_pool()
        .await
        .context("Error conectando a la base de datos")?;

    Ok(pool)
}

/// Crear las tablas si todavía no existen
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("✅ Schema verificado");
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if url[..at_pos].rfind(':').is_some() {
            let protocol = &url[..url.find("://").map(|p| p + 3).unwrap_or(0)];
            let host = &url[at_pos + 1..];
            format!("{}***:***@{}", protocol, host)
        } else {
            url.to_string()
        }
    } else {
        url.to_string()
    }
}
