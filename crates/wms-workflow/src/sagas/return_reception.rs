// Recepción de devoluciones.
use crate::errors::WorkflowError;
use crate::sagas::transaction::{run, transactional_saga, TransactionContext, Transactional};
use async_trait::async_trait;
use log::debug;
use saga::{SagaStep, StepEffect};
use serde_json::{json, Value as JsonValue};
use wms_domain::{movement_status, HandlingUnit, HandlingUnitContent, Location, Movement, ReturnReceptionRequest};
use wms_graphql::{ApiError, WmsApi};

pub const RETURN_LOCATION_SCOPE: &str = "inbound";
pub const RETURN_LOCATION_CODE: &str = "DEFAULT_RETURN_LOCATION";
pub const RETURN_MOVEMENT: &str = "return";

pub struct ReturnReceptionContext {
  tx: TransactionContext,
  request: ReturnReceptionRequest,
  location: Option<Location>,
  handling_unit: Option<HandlingUnit>,
  content: Option<HandlingUnitContent>,
  movement: Option<Movement>,
  result: Option<HandlingUnit>,
}

impl Transactional for ReturnReceptionContext {
  fn transaction(&self) -> &TransactionContext {
    &self.tx
  }
  fn transaction_mut(&mut self) -> &mut TransactionContext {
    &mut self.tx
  }
}

fn missing(what: &str) -> WorkflowError {
  WorkflowError::Validation(format!("{} no resuelto", what))
}

/// Ubicación escaneada o, si no se encuentra, la de devoluciones por
/// defecto.
struct ResolveReturnLocation;

#[async_trait]
impl SagaStep<ReturnReceptionContext, WorkflowError> for ResolveReturnLocation {
  fn name(&self) -> &str {
    "resolveReturnLocation"
  }

  async fn execute(&self, ctx: &mut ReturnReceptionContext) -> Result<StepEffect, WorkflowError> {
    let api = &ctx.tx.api;
    let mut location = None;
    if let Some(barcode) = ctx.request.return_location_barcode.as_deref().filter(|b| !b.trim().is_empty()) {
      location = api.find_location_by_barcode(barcode.trim()).await?;
      if location.is_none() {
        debug!("ubicación {} no encontrada, se usa la de devoluciones por defecto", barcode);
      }
    }
    if location.is_none() {
      let name = api.get_parameter(RETURN_LOCATION_SCOPE, RETURN_LOCATION_CODE)
                    .await?
                    .ok_or_else(|| ApiError::NotFound(format!("{}/{}", RETURN_LOCATION_SCOPE, RETURN_LOCATION_CODE)))?;
      location = Some(api.find_location_by_name(&name)
                         .await?
                         .ok_or_else(|| ApiError::NotFound(format!("ubicación {}", name)))?);
    }
    ctx.location = location;
    Ok(StepEffect::ReadOnly)
  }
}

struct FindOrCreateHandlingUnit;

#[async_trait]
impl SagaStep<ReturnReceptionContext, WorkflowError> for FindOrCreateHandlingUnit {
  fn name(&self) -> &str {
    "findOrCreateHandlingUnit"
  }

  async fn execute(&self, ctx: &mut ReturnReceptionContext) -> Result<StepEffect, WorkflowError> {
    if let Some(existing) = ctx.tx.api.find_handling_unit_by_name(&ctx.request.handling_unit).await? {
      ctx.handling_unit = Some(existing);
      return Ok(StepEffect::ReadOnly);
    }
    let location = ctx.location.as_ref().ok_or_else(|| missing("ubicación"))?;
    let input = ctx.tx.tag(json!({
                         "name": ctx.request.handling_unit,
                         "barcode": ctx.request.handling_unit,
                         "locationId": location.id,
                         "stockOwnerId": ctx.request.stock_owner_id,
                       }))?;
    ctx.handling_unit = Some(ctx.tx.api.create_handling_unit(input).await?);
    Ok(StepEffect::Wrote)
  }
}

struct CreateContent;

#[async_trait]
impl SagaStep<ReturnReceptionContext, WorkflowError> for CreateContent {
  fn name(&self) -> &str {
    "createHandlingUnitContent"
  }

  async fn execute(&self, ctx: &mut ReturnReceptionContext) -> Result<StepEffect, WorkflowError> {
    let hu = ctx.handling_unit.as_ref().ok_or_else(|| missing("unidad de manipulación"))?;
    let input = ctx.tx.tag(json!({
                         "handlingUnitId": hu.id,
                         "articleId": ctx.request.article.id,
                         "quantity": ctx.request.quantity,
                         "stockStatus": ctx.request.stock_status,
                         "stockOwnerId": ctx.request.stock_owner_id,
                       }))?;
    ctx.content = Some(ctx.tx.api.create_handling_unit_content(input).await?);
    Ok(StepEffect::Wrote)
  }
}

struct CreateFeatures;

#[async_trait]
impl SagaStep<ReturnReceptionContext, WorkflowError> for CreateFeatures {
  fn name(&self) -> &str {
    "createContentFeatures"
  }

  async fn execute(&self, ctx: &mut ReturnReceptionContext) -> Result<StepEffect, WorkflowError> {
    if ctx.request.features.is_empty() {
      return Ok(StepEffect::ReadOnly);
    }
    let content_id = ctx.content.as_ref().ok_or_else(|| missing("contenido"))?.id.clone();
    for feature in &ctx.request.features {
      let input = ctx.tx.tag(json!({
                           "handlingUnitContentId": content_id,
                           "featureCodeId": feature.feature_code_id,
                           "value": feature.value.trim(),
                         }))?;
      ctx.tx.api.create_content_feature(input).await?;
    }
    Ok(StepEffect::Wrote)
  }
}

struct RecordReturnMovement;

#[async_trait]
impl SagaStep<ReturnReceptionContext, WorkflowError> for RecordReturnMovement {
  fn name(&self) -> &str {
    "recordReturnMovement"
  }

  async fn execute(&self, ctx: &mut ReturnReceptionContext) -> Result<StepEffect, WorkflowError> {
    let hu = ctx.handling_unit.as_ref().ok_or_else(|| missing("unidad de manipulación"))?;
    let content = ctx.content.as_ref().ok_or_else(|| missing("contenido"))?;
    let input = ctx.tx.tag(json!({
                         "type": RETURN_MOVEMENT,
                         "status": movement_status::DONE,
                         "articleId": ctx.request.article.id,
                         "quantity": ctx.request.quantity,
                         "stockStatus": ctx.request.stock_status,
                         "finalLocationId": hu.location_id.clone().or_else(|| ctx.location.as_ref().map(|l| l.id.clone())),
                         "finalHandlingUnitId": hu.id,
                         "finalContentId": content.id,
                       }))?;
    ctx.movement = Some(ctx.tx.api.create_movement(input).await?);
    Ok(StepEffect::Wrote)
  }
}

struct ReadHandlingUnit;

#[async_trait]
impl SagaStep<ReturnReceptionContext, WorkflowError> for ReadHandlingUnit {
  fn name(&self) -> &str {
    "readHandlingUnit"
  }

  async fn execute(&self, ctx: &mut ReturnReceptionContext) -> Result<StepEffect, WorkflowError> {
    let id = ctx.handling_unit.as_ref().ok_or_else(|| missing("unidad de manipulación"))?.id.clone();
    ctx.result = Some(ctx.tx.api.get_handling_unit(&id).await?);
    Ok(StepEffect::ReadOnly)
  }
}

pub async fn validate_return_reception(api: &WmsApi,
                                       request: ReturnReceptionRequest)
                                       -> Result<JsonValue, WorkflowError> {
  request.validate()?;
  let saga = transactional_saga("validateReturnReception").step(ResolveReturnLocation)
                                                          .step(FindOrCreateHandlingUnit)
                                                          .step(CreateContent)
                                                          .step(CreateFeatures)
                                                          .step(RecordReturnMovement)
                                                          .step(ReadHandlingUnit);
  let mut ctx = ReturnReceptionContext { tx: TransactionContext::new(api.clone()),
                                         request,
                                         location: None,
                                         handling_unit: None,
                                         content: None,
                                         movement: None,
                                         result: None };
  run(&saga, &mut ctx).await?;
  Ok(json!({
    "handlingUnit": ctx.result,
    "movement": ctx.movement,
    "transactionId": ctx.tx.transaction_id,
  }))
}
