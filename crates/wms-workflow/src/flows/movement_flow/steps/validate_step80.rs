use crate::errors::WorkflowError;
use crate::step::{step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde_json::{json, Value as JsonValue};

pub struct ValidateStep80;

impl ValidateStep80 {
  pub const NUMBER: StepNumber = 80;
}

#[async_trait]
impl StepHandler for ValidateStep80 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "validate"
  }

  async fn handle(&self, _ctx: &StepContext<'_>, _input: &JsonValue) -> Result<StepData, WorkflowError> {
    Ok(step_data([("confirmed", json!(true))]))
  }
}
