use crate::{Article, FeatureCode, HandlingUnit, HandlingUnitContent, HandlingUnitContentFeature, HandlingUnitModel,
            Location, Movement};

pub struct DomainStubs;

impl DomainStubs {
  /// Ubicación de ejemplo.
  pub fn location(id: &str) -> Location {
    Location { id: id.to_string(),
               name: format!("LOC-{}", id),
               barcode: Some(format!("LOC-{}", id)),
               ..Default::default() }
  }

  /// Artículo con una característica de lote.
  pub fn article_with_lot(id: &str) -> Article {
    Article { id: id.to_string(),
              name: format!("ART-{}", id),
              feature_codes: vec![FeatureCode { id: "lot".into(), name: "Lot".into(), ..Default::default() }],
              ..Default::default() }
  }

  /// Caja con un contenido de `quantity` unidades del artículo indicado.
  pub fn box_with_content(id: &str, article_id: &str, quantity: f64) -> HandlingUnit {
    let content = HandlingUnitContent { id: format!("{}-c1", id),
                                        handling_unit_id: id.to_string(),
                                        article_id: article_id.to_string(),
                                        quantity,
                                        handling_unit_content_features: vec![HandlingUnitContentFeature {
                                          id: format!("{}-c1-f1", id),
                                          handling_unit_content_id: format!("{}-c1", id),
                                          feature_code_id: "lot".into(),
                                          value: Some("L-001".into()),
                                          last_transaction_id: None,
                                        }],
                                        ..Default::default() };
    HandlingUnit { id: id.to_string(),
                   name: format!("BOX-{}", id),
                   location_id: Some("loc-box".into()),
                   handling_unit_contents: vec![content],
                   ..Default::default() }
  }

  pub fn pallet_model() -> HandlingUnitModel {
    HandlingUnitModel { id: "model-eur".into(), name: "EUR pallet".into(), hu_type: Some(71100), ..Default::default() }
  }

  /// Movimiento parcial (desde un contenido concreto).
  pub fn partial_movement(id: &str) -> Movement {
    Movement { id: id.to_string(),
               article_id: Some("a1".into()),
               quantity: Some(3.0),
               original_location_id: Some("loc-a".into()),
               original_handling_unit_id: Some("hu-a".into()),
               original_content_id: Some("hu-a-c1".into()),
               status: Some(crate::movement_status::TO_BE_PROCESSED),
               ..Default::default() }
  }

  /// Movimiento de unidad completa.
  pub fn full_movement(id: &str) -> Movement {
    Movement { id: id.to_string(),
               original_location_id: Some("loc-a".into()),
               original_handling_unit_id: Some("hu-a".into()),
               status: Some(crate::movement_status::TO_BE_PROCESSED),
               ..Default::default() }
  }
}
