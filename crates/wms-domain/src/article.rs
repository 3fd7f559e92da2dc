// article.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
  pub id: String,
  pub name: String,
  pub description: Option<String>,
  pub base_unit_weight: Option<f64>,
  pub stock_owner_id: Option<String>,
  /// Características (lote, número de serie, fecha de caducidad...) que
  /// deben informarse al manipular el artículo.
  pub feature_codes: Vec<FeatureCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureCode {
  pub id: String,
  pub name: String,
  pub unique: bool,
  pub date_type: bool,
}

impl Article {
  pub fn has_features(&self) -> bool {
    !self.feature_codes.is_empty()
  }
}
