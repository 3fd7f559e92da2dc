use crate::errors::WorkflowError;
use flow::{Process, StepNumber};
use serde::de::DeserializeOwned;
use wms_graphql::WmsApi;

/// Contexto pasado a los pasos: la instantánea del proceso (para leer de
/// forma tipada los datos de pasos previos) y el acceso al backend.
pub struct StepContext<'a> {
  pub process: &'a Process,
  pub api: &'a WmsApi,
}

impl<'a> StepContext<'a> {
  pub fn new(process: &'a Process, api: &'a WmsApi) -> Self {
    Self { process, api }
  }

  /// Lee `key` de los datos del paso `step` y lo deserializa en `T`.
  /// Retorna Ok(None) si el paso no tiene ese dato.
  pub fn typed<T: DeserializeOwned>(&self, step: StepNumber, key: &str) -> Result<Option<T>, WorkflowError> {
    match self.process.field(step, key) {
      Some(value) if !value.is_null() => Ok(Some(serde_json::from_value(value.clone())?)),
      _ => Ok(None),
    }
  }

  /// Como `typed`, pero la ausencia es un error de validación.
  pub fn require<T: DeserializeOwned>(&self, step: StepNumber, key: &str) -> Result<T, WorkflowError> {
    self.typed(step, key)?
        .ok_or_else(|| WorkflowError::Validation(format!("falta '{}' del paso {}", key, step)))
  }
}

/// Versión para reglas de salto: `None` si el dato falta o no tiene la
/// forma esperada.
pub fn field_as<T: DeserializeOwned>(process: &Process, step: StepNumber, key: &str) -> Option<T> {
  process.field(step, key)
         .filter(|v| !v.is_null())
         .and_then(|v| serde_json::from_value(v.clone()).ok())
}
