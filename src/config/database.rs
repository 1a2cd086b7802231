//! Configuración de base de datos
//!
//! Este módulo maneja la conexión y configuración de PostgreSQL con SQLx.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `DATABASE_URL`, o la URL armada con `POSTGRES_USER`, `POSTGRES_PW`,
    /// `POSTGRES_HOST` y `POSTGRES_DB`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let part = |key: &str| {
                    lookup(key).ok_or_else(|| anyhow!("DATABASE_URL or {} must be set", key))
                };
                format!(
                    "postgres://{}:{}@{}/{}",
                    part("POSTGRES_USER")?,
                    part("POSTGRES_PW")?,
                    part("POSTGRES_HOST")?,
                    part("POSTGRES_DB")?
                )
            }
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(value) => value.parse().context("DB_MAX_CONNECTIONS must be a valid number")?,
            None => 10,
        };
        let min_connections = match lookup("DB_MIN_CONNECTIONS") {
            Some(value) => value.parse().context("DB_MIN_CONNECTIONS must be a valid number")?,
            None => 1,
        };

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
        })
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}
