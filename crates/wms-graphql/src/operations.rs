// Archivo: operations.rs
// Propósito: `WmsApi`, las operaciones del backend que usan las sagas y los
// pasos de los workflows. Las entidades se leen y escriben con
// `EntityClient`; las operaciones de transacción son mutaciones propias.
use crate::client::{take_field, GraphqlClient, GraphqlRequest};
use crate::crud::{EntityClient, EntityModel};
use crate::errors::ApiError;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use wms_domain::{Article, HandlingUnit, HandlingUnitContent, HandlingUnitContentFeature, Location, Movement};

const LOCATION_FIELDS: &str = "id name barcode category status";
const ARTICLE_FIELDS: &str = "id name description baseUnitWeight stockOwnerId featureCodes { id name unique dateType }";
const FEATURE_FIELDS: &str = "id handlingUnitContentId featureCodeId value lastTransactionId";
const MOVEMENT_FIELDS: &str = "id number type status articleId stockStatus quantity originalLocationId \
                               originalHandlingUnitId originalContentId finalLocationId finalHandlingUnitId \
                               finalContentId lastTransactionId created";

fn content_fields() -> String {
    format!("id handlingUnitId articleId quantity stockStatus stockOwnerId lastTransactionId \
             handlingUnitContentFeatures {{ {} }}",
            FEATURE_FIELDS)
}

fn handling_unit_fields() -> String {
    format!("id name barcode type category locationId parentHandlingUnitId handlingUnitModelId stockOwnerId \
             lastTransactionId location {{ {loc} }} handlingUnitContents {{ {huc} }} childHandlingUnits {{ id name \
             barcode type locationId parentHandlingUnitId handlingUnitContents {{ {huc} }} }}",
            loc = LOCATION_FIELDS,
            huc = content_fields())
}

/// Operaciones de negocio sobre el backend.
#[derive(Clone)]
pub struct WmsApi {
    client: Arc<dyn GraphqlClient>,
    handling_units: EntityClient,
    contents: EntityClient,
    features: EntityClient,
    locations: EntityClient,
    articles: EntityClient,
    movements: EntityClient,
    parameters: EntityClient,
}

impl WmsApi {
    pub fn new(client: Arc<dyn GraphqlClient>) -> Self {
        let entity = |name: &str, plural: &str, fields: &str| {
            EntityClient::new(client.clone(), EntityModel::new(name, plural, fields))
        };
        Self { handling_units: entity("HandlingUnit", "handlingUnits", &handling_unit_fields()),
               contents: entity("HandlingUnitContent", "handlingUnitContents", &content_fields()),
               features: entity("HandlingUnitContentFeature", "handlingUnitContentFeatures", FEATURE_FIELDS),
               locations: entity("Location", "locations", LOCATION_FIELDS),
               articles: entity("Article", "articles", ARTICLE_FIELDS),
               movements: entity("Movement", "movements", MOVEMENT_FIELDS),
               parameters: entity("Parameter", "parameters", "id scope code value"),
               client }
    }

    pub fn client(&self) -> &Arc<dyn GraphqlClient> {
        &self.client
    }

    // --- transacciones -----------------------------------------------------

    /// Pide al backend un identificador de transacción.
    pub async fn generate_transaction_id(&self) -> Result<String, ApiError> {
        let query = "mutation generateTransactionId { generateTransactionId }";
        let data = self.client
                       .execute(GraphqlRequest::new("generateTransactionId", query, json!({})))
                       .await?;
        match take_field(data, "generateTransactionId")? {
            JsonValue::String(id) if !id.is_empty() => Ok(id),
            other => Err(ApiError::Decode(format!("identificador de transacción inválido: {}", other))),
        }
    }

    /// Deshace en el backend todas las escrituras marcadas con `id`.
    pub async fn rollback_transaction(&self, id: &str) -> Result<JsonValue, ApiError> {
        let query = "mutation rollbackTransaction($id: String!) { rollbackTransaction(id: $id) }";
        let data = self.client
                       .execute(GraphqlRequest::new("rollbackTransaction", query, json!({ "id": id })))
                       .await?;
        take_field(data, "rollbackTransaction")
    }

    // --- lecturas ----------------------------------------------------------

    /// Valor de un parámetro de configuración (`scope`/`code`).
    pub async fn get_parameter(&self, scope: &str, code: &str) -> Result<Option<String>, ApiError> {
        let found: Option<JsonValue> = self.parameters.find_one(json!({ "scope": scope, "code": code })).await?;
        Ok(found.and_then(|p| p.get("value").and_then(|v| v.as_str()).map(str::to_string)))
    }

    pub async fn find_location_by_barcode(&self, barcode: &str) -> Result<Option<Location>, ApiError> {
        self.locations.find_one(json!({ "barcode": barcode })).await
    }

    pub async fn find_location_by_name(&self, name: &str) -> Result<Option<Location>, ApiError> {
        self.locations.find_one(json!({ "name": name })).await
    }

    pub async fn get_location(&self, id: &str) -> Result<Option<Location>, ApiError> {
        self.locations.detail(id).await
    }

    pub async fn find_handling_unit_by_name(&self, name: &str) -> Result<Option<HandlingUnit>, ApiError> {
        self.handling_units.find_one(json!({ "name": name })).await
    }

    pub async fn find_handling_unit_by_barcode(&self, barcode: &str) -> Result<Option<HandlingUnit>, ApiError> {
        self.handling_units.find_one(json!({ "barcode": barcode })).await
    }

    /// Lectura completa de una unidad con contenidos e hijos.
    pub async fn get_handling_unit(&self, id: &str) -> Result<HandlingUnit, ApiError> {
        self.handling_units
            .detail(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("unidad de manipulación {}", id)))
    }

    pub async fn get_handling_unit_content(&self, id: &str) -> Result<HandlingUnitContent, ApiError> {
        self.contents
            .detail(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("contenido {}", id)))
    }

    pub async fn get_content_feature(&self, id: &str) -> Result<HandlingUnitContentFeature, ApiError> {
        self.features
            .detail(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("característica {}", id)))
    }

    pub async fn find_article_by_name(&self, name: &str) -> Result<Option<Article>, ApiError> {
        self.articles.find_one(json!({ "name": name })).await
    }

    pub async fn get_movement(&self, id: &str) -> Result<Movement, ApiError> {
        self.movements
            .detail(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("movimiento {}", id)))
    }

    // --- escrituras ----------------------------------------------------------

    pub async fn create_handling_unit(&self, input: JsonValue) -> Result<HandlingUnit, ApiError> {
        self.handling_units.create(input).await
    }

    pub async fn update_handling_unit(&self, id: &str, input: JsonValue) -> Result<HandlingUnit, ApiError> {
        self.handling_units.update(id, input).await
    }

    pub async fn create_handling_unit_content(&self, input: JsonValue) -> Result<HandlingUnitContent, ApiError> {
        self.contents.create(input).await
    }

    pub async fn update_handling_unit_content(&self,
                                              id: &str,
                                              input: JsonValue)
                                              -> Result<HandlingUnitContent, ApiError> {
        self.contents.update(id, input).await
    }

    pub async fn create_content_feature(&self, input: JsonValue) -> Result<HandlingUnitContentFeature, ApiError> {
        self.features.create(input).await
    }

    pub async fn update_content_feature(&self,
                                        id: &str,
                                        input: JsonValue)
                                        -> Result<HandlingUnitContentFeature, ApiError> {
        self.features.update(id, input).await
    }

    pub async fn create_movement(&self, input: JsonValue) -> Result<Movement, ApiError> {
        self.movements.create(input).await
    }

    pub async fn update_movement(&self, id: &str, input: JsonValue) -> Result<Movement, ApiError> {
        self.movements.update(id, input).await
    }
}
