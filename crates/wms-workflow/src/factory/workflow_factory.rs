use crate::engine::Workflow;
use crate::flows::{MovementToProcessFlow, PackFlow};
use crate::workflow_type::WorkflowType;
use crate::WorkflowError;
use std::collections::HashMap;
use std::sync::Arc;

/// Fábrica de workflows.
///
/// Las tablas de transiciones y los manejadores no tienen estado, así que
/// cada workflow se construye una vez y se comparte entre peticiones.
#[derive(Clone)]
pub struct WorkflowFactory {
  workflows: HashMap<WorkflowType, Arc<dyn Workflow>>,
}

impl WorkflowFactory {
  /// Construye todos los workflows soportados.
  pub fn new() -> Result<Self, WorkflowError> {
    let mut workflows = HashMap::new();
    for workflow_type in WorkflowType::ALL {
      workflows.insert(workflow_type, Self::create(workflow_type)?);
    }
    Ok(Self { workflows })
  }

  /// Crea el workflow de un tipo concreto.
  pub fn create(workflow_type: WorkflowType) -> Result<Arc<dyn Workflow>, WorkflowError> {
    match workflow_type {
      WorkflowType::Pack => Ok(Arc::new(PackFlow::new()?)),
      WorkflowType::MovementToProcess => Ok(Arc::new(MovementToProcessFlow::new()?)),
      WorkflowType::Unknown => Err(WorkflowError::UnknownWorkflow(workflow_type.to_string())),
    }
  }

  pub fn get(&self, workflow_type: WorkflowType) -> Result<Arc<dyn Workflow>, WorkflowError> {
    self.workflows
        .get(&workflow_type)
        .cloned()
        .ok_or_else(|| WorkflowError::UnknownWorkflow(workflow_type.to_string()))
  }

  /// Tipos disponibles.
  pub fn all(&self) -> Vec<WorkflowType> {
    WorkflowType::ALL.into_iter().filter(|t| self.workflows.contains_key(t)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builds_every_known_workflow() {
    let factory = WorkflowFactory::new().unwrap();
    assert_eq!(factory.all(), WorkflowType::ALL.to_vec());
    assert_eq!(factory.get(WorkflowType::Pack).unwrap().workflow_type(), WorkflowType::Pack);
    assert!(matches!(WorkflowFactory::create(WorkflowType::Unknown), Err(WorkflowError::UnknownWorkflow(_))));
  }
}
