// handling_unit.rs
//
// Unidad de manipulación (palé, caja) y su contenido. Los campos anidados
// (`location`, `handling_unit_contents`, `child_handling_units`) sólo se
// rellenan cuando la consulta los pide.
use crate::{Article, Location};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlingUnit {
  pub id: String,
  pub name: String,
  pub barcode: Option<String>,
  #[serde(rename = "type")]
  pub hu_type: Option<i64>,
  pub category: Option<i64>,
  pub location_id: Option<String>,
  pub location: Option<Location>,
  pub parent_handling_unit_id: Option<String>,
  pub handling_unit_model_id: Option<String>,
  pub stock_owner_id: Option<String>,
  pub last_transaction_id: Option<String>,
  pub handling_unit_contents: Vec<HandlingUnitContent>,
  pub child_handling_units: Vec<HandlingUnit>,
}

impl HandlingUnit {
  /// Cantidad total de un artículo en la unidad.
  pub fn quantity_of(&self, article_id: &str) -> f64 {
    self.handling_unit_contents
        .iter()
        .filter(|c| c.article_id == article_id)
        .map(|c| c.quantity)
        .sum()
  }

  pub fn is_empty(&self) -> bool {
    self.handling_unit_contents.iter().all(|c| c.quantity <= 0.0) && self.child_handling_units.is_empty()
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlingUnitContent {
  pub id: String,
  pub handling_unit_id: String,
  pub article_id: String,
  pub article: Option<Article>,
  pub quantity: f64,
  pub stock_status: Option<i64>,
  pub stock_owner_id: Option<String>,
  pub last_transaction_id: Option<String>,
  pub handling_unit_content_features: Vec<HandlingUnitContentFeature>,
}

impl HandlingUnitContent {
  pub fn has_features(&self) -> bool {
    !self.handling_unit_content_features.is_empty()
  }

  pub fn feature(&self, feature_code_id: &str) -> Option<&HandlingUnitContentFeature> {
    self.handling_unit_content_features.iter().find(|f| f.feature_code_id == feature_code_id)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlingUnitContentFeature {
  pub id: String,
  pub handling_unit_content_id: String,
  pub feature_code_id: String,
  pub value: Option<String>,
  pub last_transaction_id: Option<String>,
}

/// Plantilla (dimensiones, tipo) para crear unidades nuevas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandlingUnitModel {
  pub id: String,
  pub name: String,
  #[serde(rename = "type")]
  pub hu_type: Option<i64>,
  pub height: Option<f64>,
  pub width: Option<f64>,
  pub length: Option<f64>,
  pub weight: Option<f64>,
}
