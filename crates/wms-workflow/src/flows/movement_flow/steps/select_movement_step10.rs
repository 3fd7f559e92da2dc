use crate::errors::WorkflowError;
use crate::step::{parse_input, step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use wms_domain::Movement;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectMovementInput {
  movement_id: String,
}

/// Selección del movimiento a procesar. Sólo se aceptan movimientos
/// abiertos.
pub struct SelectMovementStep10;

impl SelectMovementStep10 {
  pub const NUMBER: StepNumber = 10;
}

#[async_trait]
impl StepHandler for SelectMovementStep10 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "select_movement"
  }

  async fn handle(&self, ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError> {
    let input: SelectMovementInput = parse_input(input)?;
    let id = input.movement_id.trim();
    if id.is_empty() {
      return Err(WorkflowError::Validation("falta el movimiento".to_string()));
    }
    let movement = ctx.api.get_movement(id).await?;
    if !movement.is_open() {
      return Err(WorkflowError::Validation(format!("el movimiento {} ya está cerrado", movement.id)));
    }
    Ok(step_data([("movement", serde_json::to_value(&movement)?)]))
  }

  fn header(&self, data: &StepData) -> Option<String> {
    let movement: Movement = serde_json::from_value(data.get("movement")?.clone()).ok()?;
    let label = movement.number.map(|n| n.to_string()).unwrap_or(movement.id);
    Some(format!("Movimiento: {}", label))
  }
}
