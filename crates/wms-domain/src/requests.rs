// requests.rs
//
// Cuerpos de las rutas transaccionales. `validate` aplica las
// comprobaciones locales que nunca deben llegar a la red.
use crate::{Article, Barcode, DomainError, HandlingUnit, HandlingUnitContent, HandlingUnitContentFeature,
            HandlingUnitModel, Location, Movement};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Comprueba que una cantidad es positiva y no supera lo disponible.
pub fn check_quantity(requested: f64, available: Option<f64>) -> Result<(), DomainError> {
  if !requested.is_finite() || requested <= 0.0 {
    return Err(DomainError::ValidationError(format!("la cantidad debe ser mayor que cero (recibido {})", requested)));
  }
  if let Some(available) = available {
    if requested > available {
      return Err(DomainError::ValidationError(format!("la cantidad {} supera la disponible ({})",
                                                      requested, available)));
    }
  }
  Ok(())
}

fn require(value: &str, what: &str) -> Result<(), DomainError> {
  if value.trim().is_empty() {
    return Err(DomainError::ValidationError(format!("falta {}", what)));
  }
  Ok(())
}

/// Paletizado: colocar una caja sobre un palé (existente o nuevo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PalletizationRequest {
  /// Nombre del palé destino.
  pub handling_unit: String,
  #[serde(rename = "box")]
  pub box_unit: HandlingUnit,
  #[serde(rename = "hUModel", default)]
  pub hu_model: Option<HandlingUnitModel>,
}

impl PalletizationRequest {
  pub fn validate(&self) -> Result<(), DomainError> {
    let pallet = Barcode::parse(&self.handling_unit)?;
    require(&self.box_unit.id, "la caja")?;
    if self.box_unit.name == pallet.as_str() {
      return Err(DomainError::ValidationError("la caja no puede paletizarse sobre sí misma".to_string()));
    }
    Ok(())
  }
}

/// Sustitución del valor de una característica (lote, número de serie...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionRequest {
  pub handling_unit_content_feature: HandlingUnitContentFeature,
  pub new_value: String,
  pub handling_unit_content: HandlingUnitContent,
}

impl SubstitutionRequest {
  pub fn validate(&self) -> Result<(), DomainError> {
    require(&self.handling_unit_content_feature.id, "la característica")?;
    require(&self.handling_unit_content.id, "el contenido")?;
    require(&self.new_value, "el nuevo valor")?;
    let owner = &self.handling_unit_content_feature.handling_unit_content_id;
    if !owner.is_empty() && owner != &self.handling_unit_content.id {
      return Err(DomainError::ValidationError(format!("la característica {} no pertenece al contenido {}",
                                                      self.handling_unit_content_feature.id,
                                                      self.handling_unit_content.id)));
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureInput {
  pub feature_code_id: String,
  pub value: String,
}

/// Recepción de devolución: mercancía que vuelve al almacén.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnReceptionRequest {
  #[serde(default)]
  pub return_location_barcode: Option<String>,
  pub handling_unit: String,
  pub article: Article,
  pub quantity: f64,
  pub stock_status: i64,
  #[serde(default)]
  pub features: Vec<FeatureInput>,
  #[serde(default)]
  pub stock_owner_id: Option<String>,
}

impl ReturnReceptionRequest {
  pub fn validate(&self) -> Result<(), DomainError> {
    Barcode::parse(&self.handling_unit)?;
    require(&self.article.id, "el artículo")?;
    check_quantity(self.quantity, None)?;
    let mut seen = HashSet::new();
    for f in &self.features {
      require(&f.value, &format!("el valor de la característica {}", f.feature_code_id))?;
      if !seen.insert(f.feature_code_id.as_str()) {
        return Err(DomainError::ValidationError(format!("característica {} repetida", f.feature_code_id)));
      }
    }
    if let Some(missing) = self.article.feature_codes.iter().find(|fc| !seen.contains(fc.id.as_str())) {
      return Err(DomainError::ValidationError(format!("falta la característica {}", missing.name)));
    }
    Ok(())
  }
}

/// Cierre de un movimiento guiado: dónde termina la mercancía.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementValidationRequest {
  pub movement: Movement,
  pub final_location: Location,
  #[serde(default)]
  pub final_handling_unit: Option<String>,
  #[serde(default)]
  pub quantity: Option<f64>,
  #[serde(default)]
  pub content: Option<HandlingUnitContent>,
}

impl MovementValidationRequest {
  pub fn validate(&self) -> Result<(), DomainError> {
    require(&self.movement.id, "el movimiento")?;
    require(&self.final_location.id, "la ubicación final")?;
    if !self.movement.is_open() {
      return Err(DomainError::ValidationError(format!("el movimiento {} ya está cerrado", self.movement.id)));
    }
    if self.movement.is_full_handling_unit() {
      return Ok(());
    }
    let content =
      self.content.as_ref().ok_or_else(|| DomainError::ValidationError("falta el contenido de origen".to_string()))?;
    let quantity = self.quantity
                       .ok_or_else(|| DomainError::ValidationError("falta la cantidad".to_string()))?;
    check_quantity(quantity, Some(content.quantity))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::FeatureCode;
  use serde_json::json;

  #[test]
  fn quantity_rules() {
    assert!(check_quantity(1.0, Some(1.0)).is_ok());
    assert!(check_quantity(0.0, None).is_err());
    assert!(check_quantity(-2.0, None).is_err());
    assert!(check_quantity(f64::NAN, None).is_err());
    assert!(check_quantity(3.0, Some(2.5)).is_err());
  }

  #[test]
  fn palletization_body_uses_backend_names() {
    let req: PalletizationRequest = serde_json::from_value(json!({
                                                             "handlingUnit": "PAL-9",
                                                             "box": {"id": "hu-box", "name": "BOX-1"},
                                                             "hUModel": {"id": "model-1", "name": "EUR"}
                                                           })).unwrap();
    assert!(req.validate().is_ok());
    assert_eq!(req.hu_model.unwrap().id, "model-1");

    let bad = PalletizationRequest { handling_unit: "BOX-1".into(),
                                     box_unit: HandlingUnit { id: "hu-box".into(),
                                                              name: "BOX-1".into(),
                                                              ..Default::default() },
                                     hu_model: None };
    assert!(bad.validate().is_err());
  }

  #[test]
  fn return_reception_requires_every_article_feature() {
    let article = Article { id: "a1".into(),
                            name: "Widget".into(),
                            feature_codes: vec![FeatureCode { id: "lot".into(), name: "Lot".into(), ..Default::default() }],
                            ..Default::default() };
    let mut req = ReturnReceptionRequest { return_location_barcode: None,
                                           handling_unit: "RET-1".into(),
                                           article,
                                           quantity: 2.0,
                                           stock_status: 2000,
                                           features: vec![],
                                           stock_owner_id: None };
    assert!(req.validate().is_err());
    req.features.push(FeatureInput { feature_code_id: "lot".into(), value: "L1".into() });
    assert!(req.validate().is_ok());
    req.features.push(FeatureInput { feature_code_id: "lot".into(), value: "L2".into() });
    assert!(req.validate().is_err());
  }

  #[test]
  fn movement_validation_checks_available_quantity() {
    let movement = Movement { id: "m1".into(),
                              original_handling_unit_id: Some("hu".into()),
                              original_content_id: Some("c1".into()),
                              ..Default::default() };
    let content = HandlingUnitContent { id: "c1".into(), quantity: 5.0, ..Default::default() };
    let mut req = MovementValidationRequest { movement,
                                              final_location: Location { id: "loc".into(), ..Default::default() },
                                              final_handling_unit: None,
                                              quantity: Some(6.0),
                                              content: Some(content) };
    assert!(req.validate().is_err());
    req.quantity = Some(5.0);
    assert!(req.validate().is_ok());
    req.movement.original_content_id = None;
    req.quantity = None;
    assert!(req.validate().is_ok());
  }
}
