// Sustitución del valor de una característica de un contenido.
use crate::errors::WorkflowError;
use crate::sagas::transaction::{run, transactional_saga, TransactionContext, Transactional};
use async_trait::async_trait;
use saga::{SagaStep, StepEffect};
use serde_json::{json, Value as JsonValue};
use wms_domain::{movement_status, HandlingUnitContent, Movement, SubstitutionRequest};
use wms_graphql::WmsApi;

pub const FEATURE_SUBSTITUTION_MOVEMENT: &str = "featureSubstitution";

pub struct SubstitutionContext {
  tx: TransactionContext,
  request: SubstitutionRequest,
  previous_value: Option<String>,
  movement: Option<Movement>,
  result: Option<HandlingUnitContent>,
}

impl Transactional for SubstitutionContext {
  fn transaction(&self) -> &TransactionContext {
    &self.tx
  }
  fn transaction_mut(&mut self) -> &mut TransactionContext {
    &mut self.tx
  }
}

/// Relee la característica: el valor nuevo debe ser distinto del actual.
struct ReadFeature;

#[async_trait]
impl SagaStep<SubstitutionContext, WorkflowError> for ReadFeature {
  fn name(&self) -> &str {
    "readFeature"
  }

  async fn execute(&self, ctx: &mut SubstitutionContext) -> Result<StepEffect, WorkflowError> {
    let feature = ctx.tx.api.get_content_feature(&ctx.request.handling_unit_content_feature.id).await?;
    let new_value = ctx.request.new_value.trim();
    if feature.value.as_deref().map(str::trim) == Some(new_value) {
      return Err(WorkflowError::Validation(format!("el valor '{}' es igual al actual", new_value)));
    }
    ctx.previous_value = feature.value;
    Ok(StepEffect::ReadOnly)
  }
}

struct UpdateFeatureValue;

#[async_trait]
impl SagaStep<SubstitutionContext, WorkflowError> for UpdateFeatureValue {
  fn name(&self) -> &str {
    "updateFeatureValue"
  }

  async fn execute(&self, ctx: &mut SubstitutionContext) -> Result<StepEffect, WorkflowError> {
    let input = ctx.tx.tag(json!({ "value": ctx.request.new_value.trim() }))?;
    ctx.tx
       .api
       .update_content_feature(&ctx.request.handling_unit_content_feature.id, input)
       .await?;
    Ok(StepEffect::Wrote)
  }
}

struct RecordSubstitutionMovement;

#[async_trait]
impl SagaStep<SubstitutionContext, WorkflowError> for RecordSubstitutionMovement {
  fn name(&self) -> &str {
    "recordSubstitutionMovement"
  }

  async fn execute(&self, ctx: &mut SubstitutionContext) -> Result<StepEffect, WorkflowError> {
    let content = &ctx.request.handling_unit_content;
    let input = ctx.tx.tag(json!({
                         "type": FEATURE_SUBSTITUTION_MOVEMENT,
                         "status": movement_status::DONE,
                         "articleId": content.article_id,
                         "quantity": content.quantity,
                         "stockStatus": content.stock_status,
                         "originalHandlingUnitId": content.handling_unit_id,
                         "originalContentId": content.id,
                         "finalHandlingUnitId": content.handling_unit_id,
                         "finalContentId": content.id,
                         "comment": format!("{} -> {}",
                                            ctx.previous_value.as_deref().unwrap_or(""),
                                            ctx.request.new_value.trim()),
                       }))?;
    ctx.movement = Some(ctx.tx.api.create_movement(input).await?);
    Ok(StepEffect::Wrote)
  }
}

struct ReadContent;

#[async_trait]
impl SagaStep<SubstitutionContext, WorkflowError> for ReadContent {
  fn name(&self) -> &str {
    "readContent"
  }

  async fn execute(&self, ctx: &mut SubstitutionContext) -> Result<StepEffect, WorkflowError> {
    ctx.result = Some(ctx.tx.api.get_handling_unit_content(&ctx.request.handling_unit_content.id).await?);
    Ok(StepEffect::ReadOnly)
  }
}

pub async fn validate_substitution(api: &WmsApi, request: SubstitutionRequest) -> Result<JsonValue, WorkflowError> {
  request.validate()?;
  let saga = transactional_saga("validateSubstitution").step(ReadFeature)
                                                       .step(UpdateFeatureValue)
                                                       .step(RecordSubstitutionMovement)
                                                       .step(ReadContent);
  let mut ctx = SubstitutionContext { tx: TransactionContext::new(api.clone()),
                                      request,
                                      previous_value: None,
                                      movement: None,
                                      result: None };
  run(&saga, &mut ctx).await?;
  Ok(json!({
    "handlingUnitContent": ctx.result,
    "movement": ctx.movement,
    "transactionId": ctx.tx.transaction_id,
  }))
}
