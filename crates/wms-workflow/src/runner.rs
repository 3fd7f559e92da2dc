// Archivo: runner.rs
// Propósito: `WorkflowRunner`, punto de entrada de las operaciones sobre
// procesos guiados: ver el estado, enviar un paso, retroceder y reiniciar.
// Combina `flow::ProcessService` con los manejadores de cada workflow y
// lanza la finalización cuando el camino queda completo.
use crate::engine::Workflow;
use crate::errors::WorkflowError;
use crate::factory::WorkflowFactory;
use crate::step::StepContext;
use crate::workflow_type::WorkflowType;
use flow::{Decision, FlowError, ProcessService, ProcessStore, ProcessView, StepNumber};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use wms_graphql::WmsApi;

/// Estado de un proceso tal como se devuelve a la interfaz.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
  pub workflow: WorkflowType,
  pub name: String,
  pub process: JsonValue,
  pub active_step: Option<StepNumber>,
  pub active_step_name: Option<String>,
  /// `active`, `blocked` o `completed`.
  pub status: String,
  /// Resumen de los pasos completados en el camino actual.
  pub header: Vec<String>,
}

/// Resultado de enviar un paso.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum SubmitOutcome {
  /// El paso se guardó; el proceso sigue en curso.
  Advanced { view: WorkflowView },
  /// Era el último paso: la finalización terminó y el proceso se borró.
  Finalized { result: JsonValue },
}

pub struct WorkflowRunner<S>
  where S: ProcessStore + ?Sized
{
  store: Arc<S>,
  workflows: WorkflowFactory,
}

impl<S> Clone for WorkflowRunner<S> where S: ProcessStore + ?Sized
{
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), workflows: self.workflows.clone() }
  }
}

/// Clave de almacenamiento: el mismo nombre puede usarse en varios
/// workflows sin colisionar.
pub fn process_key(workflow: WorkflowType, name: &str) -> String {
  format!("{}:{}", workflow, name)
}

impl<S> WorkflowRunner<S> where S: ProcessStore + ?Sized
{
  pub fn new(store: Arc<S>, workflows: WorkflowFactory) -> Self {
    Self { store, workflows }
  }

  pub fn store(&self) -> &Arc<S> {
    &self.store
  }

  fn open(&self, workflow: WorkflowType) -> Result<(Arc<dyn Workflow>, ProcessService<S>), WorkflowError> {
    let wf = self.workflows.get(workflow)?;
    let service = ProcessService::new(self.store.clone(), wf.table());
    Ok((wf, service))
  }

  fn build_view(workflow: &dyn Workflow, name: &str, view: &ProcessView) -> WorkflowView {
    let active_step = view.decision().active_step();
    let status = match view.decision() {
      Decision::Active(_) => "active",
      Decision::Blocked { .. } => "blocked",
      Decision::Completed => "completed",
    };
    let header = view.resolution
                     .completed_steps()
                     .filter_map(|step| {
                       let handler = workflow.handler(step)?;
                       handler.header(view.process.data(step)?)
                     })
                     .collect();
    WorkflowView { workflow: workflow.workflow_type(),
                   name: name.to_string(),
                   process: view.process.to_json(),
                   active_step,
                   active_step_name: active_step.and_then(|s| workflow.handler(s)).map(|h| h.name().to_string()),
                   status: status.to_string(),
                   header }
  }

  /// Estado actual del proceso `name`.
  pub fn view(&self, workflow: WorkflowType, name: &str) -> Result<WorkflowView, WorkflowError> {
    let (wf, service) = self.open(workflow)?;
    let view = service.view(&process_key(workflow, name));
    Ok(Self::build_view(wf.as_ref(), name, &view))
  }

  /// Valida y guarda la entrada del paso activo. Si con ello el camino
  /// queda completo se ejecuta la finalización: con éxito el proceso se
  /// borra; si falla, el paso vuelve a quedar activo y se devuelve el error.
  pub async fn submit(&self,
                      workflow: WorkflowType,
                      name: &str,
                      step: StepNumber,
                      input: &JsonValue,
                      api: &WmsApi)
                      -> Result<SubmitOutcome, WorkflowError> {
    let (wf, service) = self.open(workflow)?;
    let key = process_key(workflow, name);
    let handler = wf.handler(step)
                    .ok_or_else(|| WorkflowError::Flow(FlowError::NotFound(format!("paso {}", step))))?;
    let current = service.view(&key);
    if current.decision().active_step() != Some(step) {
      return Err(WorkflowError::Flow(FlowError::InvalidStep(format!("el paso {} no está activo en '{}' ({:?})",
                                                                    step,
                                                                    name,
                                                                    current.decision()))));
    }
    let data = handler.handle(&StepContext::new(&current.process, api), input).await?;
    let after = service.submit(&key, step, data)?;
    if !after.is_completed() {
      return Ok(SubmitOutcome::Advanced { view: Self::build_view(wf.as_ref(), name, &after) });
    }
    match wf.finalize(&after.process, api).await {
      Ok(result) => {
        service.reset(&key)?;
        info!("{} '{}' finalizado", workflow, name);
        Ok(SubmitOutcome::Finalized { result })
      }
      Err(err) => {
        warn!("{} '{}': la finalización falló: {}", workflow, name, err);
        service.reopen(&key, step)?;
        Err(err)
      }
    }
  }

  /// Retrocede desde `step`.
  pub fn back(&self, workflow: WorkflowType, name: &str, step: StepNumber) -> Result<WorkflowView, WorkflowError> {
    let (wf, service) = self.open(workflow)?;
    let view = service.back(&process_key(workflow, name), step)?;
    Ok(Self::build_view(wf.as_ref(), name, &view))
  }

  pub fn reset(&self, workflow: WorkflowType, name: &str) -> Result<(), WorkflowError> {
    let (_, service) = self.open(workflow)?;
    service.reset(&process_key(workflow, name))?;
    Ok(())
  }
}
