use crate::errors::WorkflowError;
use crate::flows::movement_flow::steps::{SelectContentStep30, SelectMovementStep10};
use crate::step::{parse_input, step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use wms_domain::{check_quantity, HandlingUnitContent, Movement};

#[derive(Debug, Deserialize)]
struct EnterQuantityInput {
  quantity: f64,
}

/// Cantidad a mover: positiva y no mayor que la del contenido ni que la
/// pendiente del movimiento.
pub struct EnterQuantityStep50;

impl EnterQuantityStep50 {
  pub const NUMBER: StepNumber = 50;
}

#[async_trait]
impl StepHandler for EnterQuantityStep50 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "enter_quantity"
  }

  async fn handle(&self, ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError> {
    let input: EnterQuantityInput = parse_input(input)?;
    let content: HandlingUnitContent = ctx.require(SelectContentStep30::NUMBER, "content")?;
    let movement: Movement = ctx.require(SelectMovementStep10::NUMBER, "movement")?;
    let available = match movement.quantity {
      Some(planned) if planned > 0.0 => content.quantity.min(planned),
      _ => content.quantity,
    };
    check_quantity(input.quantity, Some(available))?;
    Ok(step_data([("quantity", json!(input.quantity))]))
  }

  fn header(&self, data: &StepData) -> Option<String> {
    Some(format!("Cantidad: {}", data.get("quantity")?))
  }
}
