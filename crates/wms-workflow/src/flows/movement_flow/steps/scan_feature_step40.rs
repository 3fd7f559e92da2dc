use crate::errors::WorkflowError;
use crate::flows::movement_flow::steps::SelectContentStep30;
use crate::step::{parse_input, step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use wms_domain::HandlingUnitContent;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanFeatureInput {
  value: String,
  #[serde(default)]
  feature_code_id: Option<String>,
}

/// Lectura de una característica (lote, serie) del contenido elegido. Sin
/// `featureCodeId` se compara con la primera característica.
pub struct ScanFeatureStep40;

impl ScanFeatureStep40 {
  pub const NUMBER: StepNumber = 40;
}

#[async_trait]
impl StepHandler for ScanFeatureStep40 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "scan_feature"
  }

  async fn handle(&self, ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError> {
    let input: ScanFeatureInput = parse_input(input)?;
    let value = input.value.trim();
    if value.is_empty() {
      return Err(WorkflowError::Validation("falta el valor de la característica".to_string()));
    }
    let content: HandlingUnitContent = ctx.require(SelectContentStep30::NUMBER, "content")?;
    let feature = match input.feature_code_id.as_deref() {
      Some(code) => content.feature(code),
      None => content.handling_unit_content_features.first(),
    };
    let feature = feature.ok_or_else(|| WorkflowError::Validation("característica no encontrada".to_string()))?;
    if feature.value.as_deref().map(str::trim) != Some(value) {
      return Err(WorkflowError::Validation(format!("el valor '{}' no coincide con el del contenido", value)));
    }
    Ok(step_data([("feature", serde_json::to_value(feature)?)]))
  }

  fn header(&self, data: &StepData) -> Option<String> {
    let value = data.get("feature")?.get("value")?.as_str()?;
    Some(format!("Lote: {}", value))
  }
}
