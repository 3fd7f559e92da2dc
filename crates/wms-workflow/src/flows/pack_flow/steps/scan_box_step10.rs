use crate::errors::WorkflowError;
use crate::step::{parse_input, step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use wms_domain::{Barcode, HandlingUnit};

#[derive(Debug, Deserialize)]
struct ScanBoxInput {
  barcode: String,
}

/// Lectura de la caja a paletizar. La caja no puede estar ya sobre un palé.
pub struct ScanBoxStep10;

impl ScanBoxStep10 {
  pub const NUMBER: StepNumber = 10;
}

#[async_trait]
impl StepHandler for ScanBoxStep10 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "scan_box"
  }

  async fn handle(&self, ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError> {
    let input: ScanBoxInput = parse_input(input)?;
    let barcode = Barcode::parse(&input.barcode)?;
    let found = match ctx.api.find_handling_unit_by_barcode(barcode.as_str()).await? {
      Some(hu) => Some(hu),
      None => ctx.api.find_handling_unit_by_name(barcode.as_str()).await?,
    };
    let box_unit = found.ok_or_else(|| WorkflowError::Validation(format!("caja {} no encontrada", barcode)))?;
    if let Some(parent) = &box_unit.parent_handling_unit_id {
      return Err(WorkflowError::Validation(format!("la caja {} ya está en el palé {}", box_unit.name, parent)));
    }
    Ok(step_data([("box", serde_json::to_value(&box_unit)?)]))
  }

  fn header(&self, data: &StepData) -> Option<String> {
    let box_unit: HandlingUnit = serde_json::from_value(data.get("box")?.clone()).ok()?;
    Some(format!("Caja: {}", box_unit.name))
  }
}
