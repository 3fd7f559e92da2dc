use flow::FlowError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
  #[error("Error de configuración: {0}")]
  Config(String),
  #[error("Error del pool de conexiones: {0}")]
  Pool(#[from] r2d2::Error),
  #[error("Error de base de datos: {0}")]
  Database(#[from] diesel::result::Error),
  #[error("Error de migración: {0}")]
  Migration(String),
}

impl From<PersistenceError> for FlowError {
  fn from(e: PersistenceError) -> Self {
    FlowError::Storage(e.to_string())
  }
}
