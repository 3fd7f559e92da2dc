use crate::errors::WorkflowError;
use crate::step::{parse_input, step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use wms_domain::HandlingUnitModel;

#[derive(Debug, Deserialize)]
struct SelectModelInput {
  #[serde(rename = "hUModel")]
  hu_model: HandlingUnitModel,
}

/// Modelo del palé nuevo.
pub struct SelectHuModelStep30;

impl SelectHuModelStep30 {
  pub const NUMBER: StepNumber = 30;
}

#[async_trait]
impl StepHandler for SelectHuModelStep30 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "select_hu_model"
  }

  async fn handle(&self, _ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError> {
    let input: SelectModelInput = parse_input(input)?;
    if input.hu_model.id.trim().is_empty() {
      return Err(WorkflowError::Validation("falta el modelo de palé".to_string()));
    }
    Ok(step_data([("hUModel", serde_json::to_value(&input.hu_model)?)]))
  }

  fn header(&self, data: &StepData) -> Option<String> {
    let name = data.get("hUModel")?.get("name")?.as_str()?;
    Some(format!("Modelo: {}", name))
  }
}
