use crate::errors::WorkflowError;
use crate::flows::pack_flow::steps::ScanBoxStep10;
use crate::step::{parse_input, step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use wms_domain::{Barcode, HandlingUnit};

#[derive(Debug, Deserialize)]
struct ScanPalletInput {
  barcode: String,
}

/// Lectura del palé destino. Si no existe se creará al validar, y el paso
/// de modelo se vuelve obligatorio.
pub struct ScanPalletStep20;

impl ScanPalletStep20 {
  pub const NUMBER: StepNumber = 20;
  pub const PALLET_EXISTS: &'static str = "palletExists";
}

#[async_trait]
impl StepHandler for ScanPalletStep20 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "scan_pallet"
  }

  async fn handle(&self, ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError> {
    let input: ScanPalletInput = parse_input(input)?;
    let barcode = Barcode::parse(&input.barcode)?;
    let box_unit: HandlingUnit = ctx.require(ScanBoxStep10::NUMBER, "box")?;
    if box_unit.name == barcode.as_str() {
      return Err(WorkflowError::Validation("la caja no puede paletizarse sobre sí misma".to_string()));
    }
    let existing = ctx.api.find_handling_unit_by_name(barcode.as_str()).await?;
    Ok(step_data([("pallet", json!(barcode.as_str())),
                  (Self::PALLET_EXISTS, json!(existing.is_some())),
                  ("existing", serde_json::to_value(&existing)?)]))
  }

  fn header(&self, data: &StepData) -> Option<String> {
    let pallet = data.get("pallet")?.as_str()?;
    match data.get(Self::PALLET_EXISTS).and_then(JsonValue::as_bool) {
      Some(false) => Some(format!("Palé: {} (nuevo)", pallet)),
      _ => Some(format!("Palé: {}", pallet)),
    }
  }
}
