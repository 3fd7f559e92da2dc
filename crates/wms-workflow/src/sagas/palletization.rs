// Paletizado: colocar una caja sobre un palé, creándolo si no existe.
use crate::errors::WorkflowError;
use crate::sagas::transaction::{run, transactional_saga, TransactionContext, Transactional};
use async_trait::async_trait;
use log::info;
use saga::{SagaStep, StepEffect};
use serde_json::{json, Value as JsonValue};
use wms_domain::{HandlingUnit, PalletizationRequest};
use wms_graphql::WmsApi;

pub const PACKING_LOCATION_SCOPE: &str = "outbound";
pub const PACKING_LOCATION_CODE: &str = "PACKING_LOCATION";

pub struct PalletizationContext {
  tx: TransactionContext,
  request: PalletizationRequest,
  pallet: Option<HandlingUnit>,
  location_id: Option<String>,
  result: Option<HandlingUnit>,
}

impl Transactional for PalletizationContext {
  fn transaction(&self) -> &TransactionContext {
    &self.tx
  }
  fn transaction_mut(&mut self) -> &mut TransactionContext {
    &mut self.tx
  }
}

impl PalletizationContext {
  fn pallet(&self) -> Result<&HandlingUnit, WorkflowError> {
    self.pallet.as_ref().ok_or_else(|| WorkflowError::Validation("palé no resuelto".to_string()))
  }
}

struct FindPallet;

#[async_trait]
impl SagaStep<PalletizationContext, WorkflowError> for FindPallet {
  fn name(&self) -> &str {
    "findPallet"
  }

  async fn execute(&self, ctx: &mut PalletizationContext) -> Result<StepEffect, WorkflowError> {
    ctx.pallet = ctx.tx.api.find_handling_unit_by_name(&ctx.request.handling_unit).await?;
    Ok(StepEffect::ReadOnly)
  }
}

/// Ubicación del palé nuevo: parámetro de embalaje o, si falta, la de la
/// caja.
struct ResolvePackingLocation;

#[async_trait]
impl SagaStep<PalletizationContext, WorkflowError> for ResolvePackingLocation {
  fn name(&self) -> &str {
    "resolvePackingLocation"
  }

  async fn execute(&self, ctx: &mut PalletizationContext) -> Result<StepEffect, WorkflowError> {
    if let Some(pallet) = &ctx.pallet {
      ctx.location_id = pallet.location_id.clone();
      return Ok(StepEffect::ReadOnly);
    }
    let api = &ctx.tx.api;
    let mut location_id = None;
    if let Some(name) = api.get_parameter(PACKING_LOCATION_SCOPE, PACKING_LOCATION_CODE).await? {
      location_id = api.find_location_by_name(&name).await?.map(|l| l.id);
    }
    ctx.location_id = location_id.or_else(|| ctx.request.box_unit.location_id.clone());
    if ctx.location_id.is_none() {
      return Err(WorkflowError::Validation("no hay ubicación de embalaje para el palé".to_string()));
    }
    Ok(StepEffect::ReadOnly)
  }
}

struct CreatePallet;

#[async_trait]
impl SagaStep<PalletizationContext, WorkflowError> for CreatePallet {
  fn name(&self) -> &str {
    "createPallet"
  }

  async fn execute(&self, ctx: &mut PalletizationContext) -> Result<StepEffect, WorkflowError> {
    if ctx.pallet.is_some() {
      return Ok(StepEffect::ReadOnly);
    }
    let model = ctx.request
                   .hu_model
                   .as_ref()
                   .ok_or_else(|| WorkflowError::Validation("hace falta un modelo para crear el palé".to_string()))?;
    let input = ctx.tx.tag(json!({
                         "name": ctx.request.handling_unit,
                         "barcode": ctx.request.handling_unit,
                         "type": model.hu_type,
                         "handlingUnitModelId": model.id,
                         "locationId": ctx.location_id,
                         "stockOwnerId": ctx.request.box_unit.stock_owner_id,
                       }))?;
    let created = ctx.tx.api.create_handling_unit(input).await?;
    info!("palé {} creado ({})", created.name, created.id);
    ctx.pallet = Some(created);
    Ok(StepEffect::Wrote)
  }
}

struct AttachBox;

#[async_trait]
impl SagaStep<PalletizationContext, WorkflowError> for AttachBox {
  fn name(&self) -> &str {
    "attachBox"
  }

  async fn execute(&self, ctx: &mut PalletizationContext) -> Result<StepEffect, WorkflowError> {
    let pallet = ctx.pallet()?;
    let input = ctx.tx.tag(json!({
                         "parentHandlingUnitId": pallet.id,
                         "locationId": pallet.location_id.clone().or_else(|| ctx.location_id.clone()),
                       }))?;
    ctx.tx.api.update_handling_unit(&ctx.request.box_unit.id, input).await?;
    Ok(StepEffect::Wrote)
  }
}

struct ReadPallet;

#[async_trait]
impl SagaStep<PalletizationContext, WorkflowError> for ReadPallet {
  fn name(&self) -> &str {
    "readPallet"
  }

  async fn execute(&self, ctx: &mut PalletizationContext) -> Result<StepEffect, WorkflowError> {
    let id = ctx.pallet()?.id.clone();
    ctx.result = Some(ctx.tx.api.get_handling_unit(&id).await?);
    Ok(StepEffect::ReadOnly)
  }
}

/// Ejecuta la saga de paletizado y devuelve el palé completo con el
/// identificador de transacción.
pub async fn validate_palletization(api: &WmsApi, request: PalletizationRequest) -> Result<JsonValue, WorkflowError> {
  request.validate()?;
  let saga = transactional_saga("validatePalletization").step(FindPallet)
                                                        .step(ResolvePackingLocation)
                                                        .step(CreatePallet)
                                                        .step(AttachBox)
                                                        .step(ReadPallet);
  let mut ctx = PalletizationContext { tx: TransactionContext::new(api.clone()),
                                       request,
                                       pallet: None,
                                       location_id: None,
                                       result: None };
  run(&saga, &mut ctx).await?;
  Ok(json!({ "handlingUnit": ctx.result, "transactionId": ctx.tx.transaction_id }))
}
