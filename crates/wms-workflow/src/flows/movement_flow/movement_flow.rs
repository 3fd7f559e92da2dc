// movement_flow.rs
//
// Workflow `movementToProcess`: el operario procesa un movimiento
// planificado. Un movimiento de unidad completa salta directamente de la
// selección a la ubicación final; un contenido sin características salta
// la lectura de lote. Al completarse ejecuta `validateMovement`.
use crate::engine::{StepRegistry, Workflow};
use crate::errors::WorkflowError;
use crate::flows::movement_flow::steps::{EnterQuantityStep50, ScanArticleStep20, ScanFeatureStep40,
                                         ScanFinalLocationStep70, SelectContentStep30, SelectMovementStep10,
                                         ValidateStep80};
use crate::sagas::validate_movement;
use crate::step::{field_as, StepContext, StepHandler};
use crate::WorkflowType;
use async_trait::async_trait;
use flow::{Process, StepDefinition, StepNumber, TransitionTable};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use wms_domain::{HandlingUnitContent, Movement, MovementValidationRequest};
use wms_graphql::WmsApi;

pub struct MovementToProcessFlow {
  table: Arc<TransitionTable>,
  steps: StepRegistry,
}

impl MovementToProcessFlow {
  pub fn new() -> Result<Self, WorkflowError> {
    let table = Self::transition_table()?;
    let steps = StepRegistry::new(&table,
                                  vec![Box::new(SelectMovementStep10),
                                       Box::new(ScanArticleStep20),
                                       Box::new(SelectContentStep30),
                                       Box::new(ScanFeatureStep40),
                                       Box::new(EnterQuantityStep50),
                                       Box::new(ScanFinalLocationStep70),
                                       Box::new(ValidateStep80)])?;
    Ok(Self { table: Arc::new(table), steps })
  }

  pub fn transition_table() -> Result<TransitionTable, WorkflowError> {
    let table =
      TransitionTable::new(vec![StepDefinition::new(SelectMovementStep10::NUMBER, "select_movement"),
                                StepDefinition::new(ScanArticleStep20::NUMBER, "scan_article")
                                  .skip_when(ScanFinalLocationStep70::NUMBER, |p| {
                                    field_as::<Movement>(p, SelectMovementStep10::NUMBER, "movement")
                                      .map(|m| m.is_full_handling_unit())
                                  }),
                                StepDefinition::new(SelectContentStep30::NUMBER, "select_content"),
                                StepDefinition::new(ScanFeatureStep40::NUMBER, "scan_feature")
                                  .skip_when(EnterQuantityStep50::NUMBER, |p| {
                                    field_as::<HandlingUnitContent>(p, SelectContentStep30::NUMBER, "content")
                                      .map(|c| !c.has_features())
                                  }),
                                StepDefinition::new(EnterQuantityStep50::NUMBER, "enter_quantity")
                                  .requires(&[SelectContentStep30::NUMBER]),
                                StepDefinition::new(ScanFinalLocationStep70::NUMBER, "scan_final_location")
                                  .requires(&[SelectMovementStep10::NUMBER]),
                                StepDefinition::new(ValidateStep80::NUMBER, "validate")
                                  .requires(&[ScanFinalLocationStep70::NUMBER]),])?;
    Ok(table)
  }

  fn request(process: &Process, api: &WmsApi) -> Result<MovementValidationRequest, WorkflowError> {
    let ctx = StepContext::new(process, api);
    let movement: Movement = ctx.require(SelectMovementStep10::NUMBER, "movement")?;
    let (content, quantity) = if movement.is_full_handling_unit() {
      (None, None)
    } else {
      (Some(ctx.require::<HandlingUnitContent>(SelectContentStep30::NUMBER, "content")?),
       Some(ctx.require::<f64>(EnterQuantityStep50::NUMBER, "quantity")?))
    };
    Ok(MovementValidationRequest { movement,
                                   final_location: ctx.require(ScanFinalLocationStep70::NUMBER, "location")?,
                                   final_handling_unit: ctx.typed(ScanFinalLocationStep70::NUMBER, "handlingUnit")?,
                                   quantity,
                                   content })
  }
}

#[async_trait]
impl Workflow for MovementToProcessFlow {
  fn workflow_type(&self) -> WorkflowType {
    WorkflowType::MovementToProcess
  }

  fn table(&self) -> Arc<TransitionTable> {
    self.table.clone()
  }

  fn handler(&self, step: StepNumber) -> Option<&dyn StepHandler> {
    self.steps.get(step)
  }

  async fn finalize(&self, process: &Process, api: &WmsApi) -> Result<JsonValue, WorkflowError> {
    let request = Self::request(process, api)?;
    validate_movement(api, request).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use flow::{BlockReason, Decision};
  use serde_json::json;

  fn data(v: JsonValue) -> flow::StepData {
    v.as_object().cloned().unwrap()
  }

  #[test]
  fn full_handling_unit_goes_straight_to_final_location() {
    let table = MovementToProcessFlow::transition_table().unwrap();
    let mut p = Process::default();
    p.complete(10, data(json!({"movement": {"id": "m1", "originalHandlingUnitId": "hu-1"}})));
    let res = table.resolve(&p);
    assert_eq!(res.decision, Decision::Active(70));
    assert!(res.was_skipped(20));
  }

  #[test]
  fn content_without_features_skips_lot_scan() {
    let table = MovementToProcessFlow::transition_table().unwrap();
    let mut p = Process::default();
    p.complete(10, data(json!({"movement": {"id": "m1", "originalHandlingUnitId": "hu-1", "originalContentId": "c1"}})));
    p.complete(20, data(json!({"article": {"id": "a1"}})));
    p.complete(30, data(json!({"content": {"id": "c1", "quantity": 5.0}})));
    assert_eq!(table.next_step(&p), Decision::Active(50));
  }

  #[test]
  fn malformed_movement_blocks_instead_of_guessing() {
    let table = MovementToProcessFlow::transition_table().unwrap();
    let mut p = Process::default();
    p.complete(10, data(json!({"movement": "m1"})));
    assert_eq!(table.next_step(&p), Decision::Blocked { step: 20, reason: BlockReason::GuardUndecided });
  }

  #[test]
  fn full_handling_unit_request_has_no_quantity() {
    let mut p = Process::default();
    p.complete(10, data(json!({"movement": {"id": "m1", "originalHandlingUnitId": "hu-1"}})));
    p.complete(70, data(json!({"location": {"id": "loc-2", "name": "B-02"}, "handlingUnit": null})));
    let api = WmsApi::new(Arc::new(wms_graphql::MockGraphqlClient::new()));
    let req = MovementToProcessFlow::request(&p, &api).unwrap();
    assert!(req.quantity.is_none());
    assert_eq!(req.final_location.id, "loc-2");
    assert!(req.validate().is_ok());
  }
}
