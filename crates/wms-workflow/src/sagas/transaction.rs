use crate::errors::WorkflowError;
use async_trait::async_trait;
use log::{info, warn};
use saga::{Compensation, Saga, SagaStep, StepEffect};
use serde_json::{Map, Value as JsonValue};
use wms_graphql::WmsApi;

/// Estado de transacción de una ejecución de saga (nunca se persiste).
pub struct TransactionContext {
  pub api: WmsApi,
  pub transaction_id: Option<String>,
}

impl TransactionContext {
  pub fn new(api: WmsApi) -> Self {
    Self { api, transaction_id: None }
  }

  pub fn id(&self) -> Result<&str, WorkflowError> {
    self.transaction_id
        .as_deref()
        .ok_or_else(|| WorkflowError::Validation("no hay transacción en curso".to_string()))
  }

  /// Copia de `input` con `lastTransactionId`.
  pub fn tag(&self, input: JsonValue) -> Result<JsonValue, WorkflowError> {
    let id = self.id()?.to_string();
    let mut map = match input {
      JsonValue::Object(map) => map,
      _ => Map::new(),
    };
    map.insert("lastTransactionId".to_string(), JsonValue::String(id));
    Ok(JsonValue::Object(map))
  }
}

/// Contextos de saga que llevan una transacción del backend.
pub trait Transactional: Send + Sync {
  fn transaction(&self) -> &TransactionContext;
  fn transaction_mut(&mut self) -> &mut TransactionContext;
}

/// Primer paso de toda saga: pide el identificador de transacción.
pub struct GenerateTransactionId;

#[async_trait]
impl<C> SagaStep<C, WorkflowError> for GenerateTransactionId where C: Transactional
{
  fn name(&self) -> &str {
    "generateTransactionId"
  }

  async fn execute(&self, ctx: &mut C) -> Result<StepEffect, WorkflowError> {
    let id = ctx.transaction().api.generate_transaction_id().await?;
    ctx.transaction_mut().transaction_id = Some(id);
    Ok(StepEffect::ReadOnly)
  }
}

/// Compensación global: el backend deshace todo lo marcado con el
/// identificador de transacción.
pub struct RollbackTransaction;

#[async_trait]
impl<C> Compensation<C, WorkflowError> for RollbackTransaction where C: Transactional
{
  async fn compensate(&self, ctx: &C) -> Result<(), WorkflowError> {
    let tx = ctx.transaction();
    match &tx.transaction_id {
      Some(id) => {
        tx.api.rollback_transaction(id).await?;
        info!("rollbackTransaction {} ejecutado", id);
      }
      None => warn!("rollback solicitado sin identificador de transacción"),
    }
    Ok(())
  }
}

/// Saga con el paso inicial y la compensación estándar ya registrados.
pub fn transactional_saga<C>(name: &str) -> Saga<C, WorkflowError>
  where C: Transactional + 'static
{
  Saga::new(name).step(GenerateTransactionId).with_compensation(RollbackTransaction)
}

/// Ejecuta la saga y convierte el fallo en `WorkflowError`.
pub async fn run<C>(saga: &Saga<C, WorkflowError>, ctx: &mut C) -> Result<(), WorkflowError>
  where C: Transactional
{
  saga.run(ctx).await?;
  Ok(())
}
