use crate::errors::WorkflowError;
use crate::flows::movement_flow::steps::{ScanArticleStep20, SelectMovementStep10};
use crate::step::{parse_input, step_data, StepContext, StepHandler};
use async_trait::async_trait;
use flow::{StepData, StepNumber};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use wms_domain::{Article, Movement};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectContentInput {
  content_id: String,
}

/// Contenido de origen: mismo artículo y, si el movimiento la fija, misma
/// unidad de origen.
pub struct SelectContentStep30;

impl SelectContentStep30 {
  pub const NUMBER: StepNumber = 30;
}

#[async_trait]
impl StepHandler for SelectContentStep30 {
  fn number(&self) -> StepNumber {
    Self::NUMBER
  }

  fn name(&self) -> &str {
    "select_content"
  }

  async fn handle(&self, ctx: &StepContext<'_>, input: &JsonValue) -> Result<StepData, WorkflowError> {
    let input: SelectContentInput = parse_input(input)?;
    let movement: Movement = ctx.require(SelectMovementStep10::NUMBER, "movement")?;
    let article: Article = ctx.require(ScanArticleStep20::NUMBER, "article")?;
    let content = ctx.api.get_handling_unit_content(input.content_id.trim()).await?;
    if content.article_id != article.id {
      return Err(WorkflowError::Validation(format!("el contenido {} no es del artículo {}", content.id, article.name)));
    }
    if let Some(origin) = &movement.original_handling_unit_id {
      if origin != &content.handling_unit_id {
        return Err(WorkflowError::Validation(format!("el contenido {} no está en la unidad de origen", content.id)));
      }
    }
    if content.quantity <= 0.0 {
      return Err(WorkflowError::Validation(format!("el contenido {} está vacío", content.id)));
    }
    Ok(step_data([("content", serde_json::to_value(&content)?)]))
  }
}
