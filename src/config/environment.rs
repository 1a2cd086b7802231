//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

/// Backend de persistencia de vehículos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("VEHICLE_STORE must be 'postgres' or 'memory', got '{}'", other)),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: tracing::Level,
    pub cors_origins: Vec<String>,
    pub request_timeout: Duration,
    pub storage: StorageBackend,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            log_level: tracing::Level::DEBUG,
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
            storage: StorageBackend::Postgres,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env`, con una fuente de variables arbitraria
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let environment = lookup("ENVIRONMENT").unwrap_or(defaults.environment);

        let port = match lookup("PORT") {
            Some(port) => port.parse().context("PORT must be a valid number")?,
            None => defaults.port,
        };

        let default_level = if environment == "development" {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => level
                .parse()
                .map_err(|_| anyhow!("LOG_LEVEL must be one of trace, debug, info, warn, error"))?,
            None => default_level,
        };

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse().context("REQUEST_TIMEOUT_SECS must be a valid number")?,
            ),
            None => defaults.request_timeout,
        };

        let storage = match lookup("VEHICLE_STORE") {
            Some(store) => store.parse()?,
            None => defaults.storage,
        };

        Ok(Self {
            environment,
            port,
            host: lookup("HOST").unwrap_or(defaults.host),
            log_level,
            cors_origins,
            request_timeout,
            storage,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
