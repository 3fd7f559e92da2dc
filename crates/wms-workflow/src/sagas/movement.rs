// Cierre de un movimiento guiado (`validateMovement`).
//
// Unidad completa: la unidad cambia de ubicación. Parcial: se descuenta el
// contenido de origen y se crea el contenido en la unidad destino (que se
// busca o se crea en la ubicación final).
use crate::errors::WorkflowError;
use crate::sagas::transaction::{run, transactional_saga, TransactionContext, Transactional};
use async_trait::async_trait;
use saga::{SagaStep, StepEffect};
use serde_json::{json, Value as JsonValue};
use wms_domain::{movement_status, HandlingUnit, HandlingUnitContent, Movement, MovementValidationRequest};
use wms_graphql::WmsApi;

pub struct MovementContext {
  tx: TransactionContext,
  request: MovementValidationRequest,
  movement: Option<Movement>,
  destination: Option<HandlingUnit>,
  destination_content: Option<HandlingUnitContent>,
  result: Option<HandlingUnit>,
}

impl Transactional for MovementContext {
  fn transaction(&self) -> &TransactionContext {
    &self.tx
  }
  fn transaction_mut(&mut self) -> &mut TransactionContext {
    &mut self.tx
  }
}

impl MovementContext {
  fn movement(&self) -> Result<&Movement, WorkflowError> {
    self.movement
        .as_ref()
        .ok_or_else(|| WorkflowError::Validation("movimiento no leído".to_string()))
  }

  fn is_full(&self) -> bool {
    self.movement.as_ref().map(Movement::is_full_handling_unit).unwrap_or(false)
  }

  fn quantity(&self) -> Result<f64, WorkflowError> {
    self.request
        .quantity
        .ok_or_else(|| WorkflowError::Validation("falta la cantidad".to_string()))
  }

  fn origin_content(&self) -> Result<&HandlingUnitContent, WorkflowError> {
    self.request
        .content
        .as_ref()
        .ok_or_else(|| WorkflowError::Validation("falta el contenido de origen".to_string()))
  }
}

/// Relee el movimiento: otro operario pudo cerrarlo mientras tanto.
struct ReadMovement;

#[async_trait]
impl SagaStep<MovementContext, WorkflowError> for ReadMovement {
  fn name(&self) -> &str {
    "readMovement"
  }

  async fn execute(&self, ctx: &mut MovementContext) -> Result<StepEffect, WorkflowError> {
    let movement = ctx.tx.api.get_movement(&ctx.request.movement.id).await?;
    if !movement.is_open() {
      return Err(WorkflowError::Validation(format!("el movimiento {} ya está cerrado", movement.id)));
    }
    ctx.movement = Some(movement);
    Ok(StepEffect::ReadOnly)
  }
}

struct MoveHandlingUnit;

#[async_trait]
impl SagaStep<MovementContext, WorkflowError> for MoveHandlingUnit {
  fn name(&self) -> &str {
    "moveHandlingUnit"
  }

  async fn execute(&self, ctx: &mut MovementContext) -> Result<StepEffect, WorkflowError> {
    if !ctx.is_full() {
      return Ok(StepEffect::ReadOnly);
    }
    let hu_id = ctx.movement()?
                   .original_handling_unit_id
                   .clone()
                   .ok_or_else(|| WorkflowError::Validation("movimiento sin unidad de origen".to_string()))?;
    let input = ctx.tx.tag(json!({ "locationId": ctx.request.final_location.id }))?;
    let moved = ctx.tx.api.update_handling_unit(&hu_id, input).await?;
    ctx.destination = Some(moved);
    Ok(StepEffect::Wrote)
  }
}

struct DecrementOrigin;

#[async_trait]
impl SagaStep<MovementContext, WorkflowError> for DecrementOrigin {
  fn name(&self) -> &str {
    "decrementOriginContent"
  }

  async fn execute(&self, ctx: &mut MovementContext) -> Result<StepEffect, WorkflowError> {
    if ctx.is_full() {
      return Ok(StepEffect::ReadOnly);
    }
    let quantity = ctx.quantity()?;
    let origin = ctx.origin_content()?;
    let input = ctx.tx.tag(json!({ "quantity": origin.quantity - quantity }))?;
    ctx.tx.api.update_handling_unit_content(&origin.id, input).await?;
    Ok(StepEffect::Wrote)
  }
}

struct FindOrCreateDestination;

#[async_trait]
impl SagaStep<MovementContext, WorkflowError> for FindOrCreateDestination {
  fn name(&self) -> &str {
    "findOrCreateDestination"
  }

  async fn execute(&self, ctx: &mut MovementContext) -> Result<StepEffect, WorkflowError> {
    if ctx.is_full() {
      return Ok(StepEffect::ReadOnly);
    }
    let name = ctx.request
                  .final_handling_unit
                  .as_deref()
                  .map(str::trim)
                  .filter(|n| !n.is_empty())
                  .unwrap_or(&ctx.request.final_location.name)
                  .to_string();
    if let Some(existing) = ctx.tx.api.find_handling_unit_by_name(&name).await? {
      ctx.destination = Some(existing);
      return Ok(StepEffect::ReadOnly);
    }
    let input = ctx.tx.tag(json!({
                         "name": name,
                         "barcode": name,
                         "locationId": ctx.request.final_location.id,
                         "stockOwnerId": ctx.origin_content()?.stock_owner_id,
                       }))?;
    ctx.destination = Some(ctx.tx.api.create_handling_unit(input).await?);
    Ok(StepEffect::Wrote)
  }
}

/// Crea el contenido destino y copia las características del origen.
struct CreateDestinationContent;

#[async_trait]
impl SagaStep<MovementContext, WorkflowError> for CreateDestinationContent {
  fn name(&self) -> &str {
    "createDestinationContent"
  }

  async fn execute(&self, ctx: &mut MovementContext) -> Result<StepEffect, WorkflowError> {
    if ctx.is_full() {
      return Ok(StepEffect::ReadOnly);
    }
    let quantity = ctx.quantity()?;
    let origin = ctx.origin_content()?;
    let destination_id = ctx.destination
                            .as_ref()
                            .map(|hu| hu.id.clone())
                            .ok_or_else(|| WorkflowError::Validation("unidad destino no resuelta".to_string()))?;
    let input = ctx.tx.tag(json!({
                         "handlingUnitId": destination_id,
                         "articleId": origin.article_id,
                         "quantity": quantity,
                         "stockStatus": origin.stock_status,
                         "stockOwnerId": origin.stock_owner_id,
                       }))?;
    let created = ctx.tx.api.create_handling_unit_content(input).await?;
    for feature in &origin.handling_unit_content_features {
      let input = ctx.tx.tag(json!({
                           "handlingUnitContentId": created.id,
                           "featureCodeId": feature.feature_code_id,
                           "value": feature.value,
                         }))?;
      ctx.tx.api.create_content_feature(input).await?;
    }
    ctx.destination_content = Some(created);
    Ok(StepEffect::Wrote)
  }
}

struct CloseMovement;

#[async_trait]
impl SagaStep<MovementContext, WorkflowError> for CloseMovement {
  fn name(&self) -> &str {
    "closeMovement"
  }

  async fn execute(&self, ctx: &mut MovementContext) -> Result<StepEffect, WorkflowError> {
    let movement = ctx.movement()?;
    let input = ctx.tx.tag(json!({
                         "status": movement_status::DONE,
                         "quantity": ctx.request.quantity.or(movement.quantity),
                         "finalLocationId": ctx.request.final_location.id,
                         "finalHandlingUnitId": ctx.destination.as_ref().map(|hu| hu.id.clone()),
                         "finalContentId": ctx.destination_content.as_ref().map(|c| c.id.clone()),
                       }))?;
    let closed = ctx.tx.api.update_movement(&movement.id, input).await?;
    ctx.movement = Some(closed);
    Ok(StepEffect::Wrote)
  }
}

struct ReadDestination;

#[async_trait]
impl SagaStep<MovementContext, WorkflowError> for ReadDestination {
  fn name(&self) -> &str {
    "readHandlingUnit"
  }

  async fn execute(&self, ctx: &mut MovementContext) -> Result<StepEffect, WorkflowError> {
    let id = ctx.destination
                .as_ref()
                .map(|hu| hu.id.clone())
                .ok_or_else(|| WorkflowError::Validation("unidad destino no resuelta".to_string()))?;
    ctx.result = Some(ctx.tx.api.get_handling_unit(&id).await?);
    Ok(StepEffect::ReadOnly)
  }
}

pub async fn validate_movement(api: &WmsApi, request: MovementValidationRequest) -> Result<JsonValue, WorkflowError> {
  request.validate()?;
  let saga = transactional_saga("validateMovement").step(ReadMovement)
                                                   .step(MoveHandlingUnit)
                                                   .step(DecrementOrigin)
                                                   .step(FindOrCreateDestination)
                                                   .step(CreateDestinationContent)
                                                   .step(CloseMovement)
                                                   .step(ReadDestination);
  let mut ctx = MovementContext { tx: TransactionContext::new(api.clone()),
                                  request,
                                  movement: None,
                                  destination: None,
                                  destination_content: None,
                                  result: None };
  run(&saga, &mut ctx).await?;
  Ok(json!({
    "movement": ctx.movement,
    "handlingUnit": ctx.result,
    "transactionId": ctx.tx.transaction_id,
  }))
}
