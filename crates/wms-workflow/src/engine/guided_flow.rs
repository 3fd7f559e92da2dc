use crate::errors::WorkflowError;
use crate::step::StepHandler;
use crate::workflow_type::WorkflowType;
use async_trait::async_trait;
use flow::{Process, StepNumber, TransitionTable};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use wms_graphql::WmsApi;

/// Trait genérico para workflows guiados.
///
/// Un workflow expone su tabla de transiciones, el manejador de cada paso y
/// la finalización que se ejecuta cuando todos los pasos del camino están
/// completos (normalmente una saga transaccional).
#[async_trait]
pub trait Workflow: Send + Sync {
  fn workflow_type(&self) -> WorkflowType;

  fn table(&self) -> Arc<TransitionTable>;

  fn handler(&self, step: StepNumber) -> Option<&dyn StepHandler>;

  /// Ejecuta la operación final con los datos acumulados y devuelve el
  /// resultado del backend.
  async fn finalize(&self, process: &Process, api: &WmsApi) -> Result<JsonValue, WorkflowError>;
}

/// Manejadores indexados por número de paso, validados contra la tabla.
pub struct StepRegistry {
  handlers: BTreeMap<StepNumber, Box<dyn StepHandler>>,
}

impl StepRegistry {
  pub fn new(table: &TransitionTable, handlers: Vec<Box<dyn StepHandler>>) -> Result<Self, WorkflowError> {
    let mut map = BTreeMap::new();
    for handler in handlers {
      let number = handler.number();
      if !table.contains(number) {
        return Err(WorkflowError::Validation(format!("el paso {} ({}) no está en la tabla", number, handler.name())));
      }
      map.insert(number, handler);
    }
    if let Some(missing) = table.steps().find(|d| !map.contains_key(&d.number)) {
      return Err(WorkflowError::Validation(format!("el paso {} no tiene manejador", missing.number)));
    }
    Ok(Self { handlers: map })
  }

  pub fn get(&self, step: StepNumber) -> Option<&dyn StepHandler> {
    self.handlers.get(&step).map(|h| h.as_ref())
  }
}
