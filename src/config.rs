// Archivo: config.rs
// Propósito: configuración del servidor leída del entorno (y de `.env`)
// una sola vez al arrancar.
use once_cell::sync::Lazy;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use wms_graphql::Locale;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_GRAPHQL_TIMEOUT_SECS: u64 = 30;

static DOTENV: Lazy<Option<PathBuf>> = Lazy::new(|| dotenvy::dotenv().ok());

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
  #[error("falta la variable de entorno {0}")]
  Missing(&'static str),
  #[error("valor inválido para {key}: '{value}' ({reason})")]
  Invalid { key: &'static str, value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub graphql_url: String,
  pub graphql_timeout: Duration,
  pub listen_addr: SocketAddr,
  /// Base SQLite del almacén de procesos; sin ella se usa memoria.
  pub store_url: Option<String>,
  /// Si está presente los procesos se guardan sellados.
  pub store_secret: Option<String>,
  pub locale: Locale,
}

impl AppConfig {
  /// Lee la configuración de las variables de entorno, cargando `.env` la
  /// primera vez.
  pub fn from_env() -> Result<Self, ConfigError> {
    Lazy::force(&DOTENV);
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where F: Fn(&str) -> Option<String>
  {
    let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let graphql_url = var("WMS_GRAPHQL_URL").ok_or(ConfigError::Missing("WMS_GRAPHQL_URL"))?;
    let graphql_timeout = match var("WMS_GRAPHQL_TIMEOUT_SECS") {
      Some(raw) => {
        let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid { key: "WMS_GRAPHQL_TIMEOUT_SECS",
                                                                          value: raw.clone(),
                                                                          reason: e.to_string() })?;
        Duration::from_secs(secs)
      }
      None => Duration::from_secs(DEFAULT_GRAPHQL_TIMEOUT_SECS),
    };
    let listen_raw = var("WMS_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
    let listen_addr = listen_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid { key: "WMS_LISTEN_ADDR",
                                                                                          value: listen_raw.clone(),
                                                                                          reason: e.to_string() })?;
    let locale = match var("WMS_LOCALE") {
      Some(raw) => raw.parse::<Locale>()
                      .map_err(|reason| ConfigError::Invalid { key: "WMS_LOCALE", value: raw.clone(), reason })?,
      None => Locale::default(),
    };
    Ok(Self { graphql_url,
              graphql_timeout,
              listen_addr,
              store_url: wms_persistence::store_url_from(&get),
              store_secret: var("WMS_STORE_SECRET"),
              locale })
  }
}
