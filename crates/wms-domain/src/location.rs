// location.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
  pub id: String,
  pub name: String,
  pub barcode: Option<String>,
  pub category: Option<i64>,
  pub status: Option<i64>,
}
