use crate::errors::WorkflowError;
use crate::step::StepContext;
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// Trait que representa un paso de un workflow guiado.
///
/// `handle` valida la entrada del operario (y consulta el backend si hace
/// falta) y devuelve los `data` que se guardarán en el proceso. Un error
/// deja el proceso intacto.
#[async_trait]
pub trait StepHandler: Send + Sync {
  fn number(&self) -> StepNumber;

  /// Nombre o identificador del paso
  fn name(&self) -> &str;

  async fn handle(&self, ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError>;

  /// Línea de cabecera derivada de los datos del paso ya completado.
  fn header(&self, _data: &StepData) -> Option<String> {
    None
  }
}

/// Deserializa la entrada del operario; los fallos son errores de
/// validación.
pub fn parse_input<T: DeserializeOwned>(input: &JsonValue) -> Result<T, WorkflowError> {
  serde_json::from_value(input.clone()).map_err(|e| WorkflowError::Validation(format!("entrada inválida: {}", e)))
}

/// Construye el `StepData` de un paso a partir de pares clave/valor.
pub(crate) fn step_data<I>(entries: I) -> StepData
  where I: IntoIterator<Item = (&'static str, JsonValue)>
{
  entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
