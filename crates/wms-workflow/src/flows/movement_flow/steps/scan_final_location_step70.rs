use crate::errors::WorkflowError;
use crate::step::{parse_input, step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use wms_domain::Barcode;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanFinalLocationInput {
  barcode: String,
  #[serde(default)]
  handling_unit: Option<String>,
}

/// Ubicación final y, opcionalmente, la unidad destino.
pub struct ScanFinalLocationStep70;

impl ScanFinalLocationStep70 {
  pub const NUMBER: StepNumber = 70;
}

#[async_trait]
impl StepHandler for ScanFinalLocationStep70 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "scan_final_location"
  }

  async fn handle(&self, ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError> {
    let input: ScanFinalLocationInput = parse_input(input)?;
    let barcode = Barcode::parse(&input.barcode)?;
    let location = ctx.api
                      .find_location_by_barcode(barcode.as_str())
                      .await?
                      .ok_or_else(|| WorkflowError::Validation(format!("ubicación {} no encontrada", barcode)))?;
    let handling_unit = match input.handling_unit.as_deref() {
      Some(raw) if !raw.trim().is_empty() => Some(Barcode::parse(raw)?.as_str().to_string()),
      _ => None,
    };
    Ok(step_data([("location", serde_json::to_value(&location)?), ("handlingUnit", json!(handling_unit))]))
  }

  fn header(&self, data: &StepData) -> Option<String> {
    let name = data.get("location")?.get("name")?.as_str()?;
    Some(format!("Destino: {}", name))
  }
}
