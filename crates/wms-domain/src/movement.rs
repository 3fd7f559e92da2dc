// movement.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Estados de movimiento usados por el backend.
pub mod movement_status {
  pub const TO_BE_PROCESSED: i64 = 100;
  pub const IN_PROGRESS: i64 = 200;
  pub const DONE: i64 = 300;
  pub const CANCELLED: i64 = 1000;
}

/// Movimiento de stock planificado o registrado.
///
/// Un movimiento sin contenido de origen (`original_content_id`) pero con
/// unidad de origen traslada la unidad completa; en ese caso el operario no
/// escanea artículo ni cantidad.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Movement {
  pub id: String,
  pub number: Option<i64>,
  #[serde(rename = "type")]
  pub movement_type: Option<String>,
  pub status: Option<i64>,
  pub article_id: Option<String>,
  pub stock_status: Option<i64>,
  pub quantity: Option<f64>,
  pub original_location_id: Option<String>,
  pub original_handling_unit_id: Option<String>,
  pub original_content_id: Option<String>,
  pub final_location_id: Option<String>,
  pub final_handling_unit_id: Option<String>,
  pub final_content_id: Option<String>,
  pub last_transaction_id: Option<String>,
  pub created: Option<DateTime<Utc>>,
}

impl Movement {
  pub fn is_full_handling_unit(&self) -> bool {
    self.original_content_id.is_none() && self.original_handling_unit_id.is_some()
  }

  pub fn is_open(&self) -> bool {
    !matches!(self.status, Some(movement_status::DONE) | Some(movement_status::CANCELLED))
  }
}
