use crate::errors::WorkflowError;
use crate::flows::movement_flow::steps::SelectMovementStep10;
use crate::step::{parse_input, step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use wms_domain::{Barcode, Movement};

#[derive(Debug, Deserialize)]
struct ScanArticleInput {
  barcode: String,
}

/// Lectura del artículo; debe coincidir con el del movimiento.
pub struct ScanArticleStep20;

impl ScanArticleStep20 {
  pub const NUMBER: StepNumber = 20;
}

#[async_trait]
impl StepHandler for ScanArticleStep20 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "scan_article"
  }

  async fn handle(&self, ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError> {
    let input: ScanArticleInput = parse_input(input)?;
    let barcode = Barcode::parse(&input.barcode)?;
    let movement: Movement = ctx.require(SelectMovementStep10::NUMBER, "movement")?;
    let article = ctx.api
                     .find_article_by_name(barcode.as_str())
                     .await?
                     .ok_or_else(|| WorkflowError::Validation(format!("artículo {} no encontrado", barcode)))?;
    if let Some(expected) = &movement.article_id {
      if expected != &article.id {
        return Err(WorkflowError::Validation(format!("el artículo {} no corresponde al movimiento", article.name)));
      }
    }
    Ok(step_data([("article", serde_json::to_value(&article)?)]))
  }

  fn header(&self, data: &StepData) -> Option<String> {
    let name = data.get("article")?.get("name")?.as_str()?;
    Some(format!("Artículo: {}", name))
  }
}
