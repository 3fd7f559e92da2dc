// Archivo: crud.rs
// Propósito: acceso genérico por entidad (list/detail/create/update/delete/
// export). Cada entidad se describe con un `EntityModel` (nombre, plural y
// campos a pedir) y las consultas se construyen con las convenciones de
// nombres del esquema remoto.
use crate::client::{take_field, GraphqlClient, GraphqlRequest};
use crate::errors::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

/// Metadatos de una entidad del esquema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityModel {
    /// Nombre en PascalCase (`HandlingUnit`).
    pub name: String,
    /// Plural en camelCase (`handlingUnits`).
    pub plural: String,
    /// Selección de campos GraphQL.
    pub fields: String,
}

impl EntityModel {
    pub fn new(name: &str, plural: &str, fields: &str) -> Self {
        Self { name: name.to_string(), plural: plural.to_string(), fields: fields.to_string() }
    }

    /// Nombre en camelCase (`handlingUnit`).
    pub fn singular(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Plural en PascalCase (`HandlingUnits`), usado en `export*`.
    fn plural_pascal(&self) -> String {
        let mut chars = self.plural.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPage {
    pub page: u32,
    pub items_per_page: u32,
}

impl Default for ListPage {
    fn default() -> Self {
        Self { page: 1, items_per_page: 100 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResult<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub items_per_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<T>,
}

/// Cliente CRUD de una entidad.
#[derive(Clone)]
pub struct EntityClient {
    client: Arc<dyn GraphqlClient>,
    model: EntityModel,
}

impl EntityClient {
    pub fn new(client: Arc<dyn GraphqlClient>, model: EntityModel) -> Self {
        Self { client, model }
    }

    pub fn model(&self) -> &EntityModel {
        &self.model
    }

    pub async fn list<T: DeserializeOwned>(&self,
                                           filters: JsonValue,
                                           page: ListPage,
                                           order_by: Option<JsonValue>)
                                           -> Result<ListResult<T>, ApiError> {
        let m = &self.model;
        let query = format!("query {plural}($filters: {name}SearchFilters, $orderBy: [{name}OrderByCriterion!], \
                             $page: Int!, $itemsPerPage: Int!) {{ {plural}(filters: $filters, orderBy: $orderBy, \
                             page: $page, itemsPerPage: $itemsPerPage) {{ count itemsPerPage totalPages results {{ \
                             {fields} }} }} }}",
                            plural = m.plural,
                            name = m.name,
                            fields = m.fields);
        let variables = json!({"filters": filters, "orderBy": order_by, "page": page.page,
                               "itemsPerPage": page.items_per_page});
        let data = self.client.execute(GraphqlRequest::new(&m.plural, query, variables)).await?;
        Ok(serde_json::from_value(take_field(data, &m.plural)?)?)
    }

    /// Primer resultado que cumple los filtros.
    pub async fn find_one<T: DeserializeOwned>(&self, filters: JsonValue) -> Result<Option<T>, ApiError> {
        let page = self.list::<T>(filters, ListPage { page: 1, items_per_page: 1 }, None).await?;
        Ok(page.results.into_iter().next())
    }

    pub async fn detail<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, ApiError> {
        let m = &self.model;
        let singular = m.singular();
        let query = format!("query {s}($id: String!) {{ {s}(id: $id) {{ {fields} }} }}",
                            s = singular,
                            fields = m.fields);
        let data = self.client.execute(GraphqlRequest::new(&singular, query, json!({ "id": id }))).await?;
        let value = take_field(data, &singular)?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    pub async fn create<T: DeserializeOwned>(&self, input: JsonValue) -> Result<T, ApiError> {
        let m = &self.model;
        let op = format!("create{}", m.name);
        let query = format!("mutation {op}($input: Create{name}Input!) {{ {op}(input: $input) {{ {fields} }} }}",
                            op = op,
                            name = m.name,
                            fields = m.fields);
        let data = self.client.execute(GraphqlRequest::new(&op, query, json!({ "input": input }))).await?;
        Ok(serde_json::from_value(take_field(data, &op)?)?)
    }

    pub async fn update<T: DeserializeOwned>(&self, id: &str, input: JsonValue) -> Result<T, ApiError> {
        let m = &self.model;
        let op = format!("update{}", m.name);
        let query = format!("mutation {op}($id: String!, $input: Update{name}Input!) {{ {op}(id: $id, input: \
                             $input) {{ {fields} }} }}",
                            op = op,
                            name = m.name,
                            fields = m.fields);
        let data = self.client.execute(GraphqlRequest::new(&op, query, json!({ "id": id, "input": input }))).await?;
        Ok(serde_json::from_value(take_field(data, &op)?)?)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let m = &self.model;
        let op = format!("delete{}", m.name);
        let query = format!("mutation {op}($id: String!) {{ {op}(id: $id) }}", op = op);
        let data = self.client.execute(GraphqlRequest::new(&op, query, json!({ "id": id }))).await?;
        Ok(take_field(data, &op)?.as_bool().unwrap_or(false))
    }

    /// Exportación asíncrona; el backend devuelve la referencia del fichero.
    pub async fn export(&self, filters: JsonValue, format: &str) -> Result<JsonValue, ApiError> {
        let m = &self.model;
        let op = format!("export{}", m.plural_pascal());
        let query = format!("mutation {op}($format: ExportFormat, $filters: {name}ExtendedSearchFilters) {{ \
                             {op}(format: $format, filters: $filters) {{ id url }} }}",
                            op = op,
                            name = m.name);
        let data = self.client
                       .execute(GraphqlRequest::new(&op, query, json!({ "format": format, "filters": filters })))
                       .await?;
        take_field(data, &op)
    }
}
