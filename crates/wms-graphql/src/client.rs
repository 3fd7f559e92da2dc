// Archivo: client.rs
// Propósito: contrato `GraphqlClient` (una petición con nombre de operación
// contra un único endpoint) e implementación HTTP con `reqwest`.
use crate::errors::{ApiError, GraphqlErrorItem};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Petición GraphQL con nombre de operación y variables tipadas por el
/// esquema remoto.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub operation_name: String,
    pub query: String,
    pub variables: JsonValue,
}

impl GraphqlRequest {
    pub fn new(operation_name: impl Into<String>, query: impl Into<String>, variables: JsonValue) -> Self {
        Self { operation_name: operation_name.into(), query: query.into(), variables }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<JsonValue>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorItem>>,
}

/// Cliente GraphQL. Devuelve el objeto `data` de la respuesta o un
/// `ApiError` si la respuesta trae `errors`.
#[async_trait]
pub trait GraphqlClient: Send + Sync {
    async fn execute(&self, request: GraphqlRequest) -> Result<JsonValue, ApiError>;
}

/// Cliente HTTP. El token se fija por petición entrante con `with_token`.
#[derive(Clone)]
pub struct HttpGraphqlClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpGraphqlClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint: endpoint.into(), token: None })
    }

    /// Copia del cliente (comparte el pool de conexiones) con otro token.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self { http: self.http.clone(), endpoint: self.endpoint.clone(), token }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl GraphqlClient for HttpGraphqlClient {
    async fn execute(&self, request: GraphqlRequest) -> Result<JsonValue, ApiError> {
        debug!("graphql: {} -> {}", request.operation_name, self.endpoint);
        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let parsed: GraphqlResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(ApiError::Http { status: status.as_u16(), body });
            }
            Err(e) => return Err(ApiError::Decode(format!("{}: {}", request.operation_name, e))),
        };
        if let Some(errors) = parsed.errors.filter(|e| !e.is_empty()) {
            return Err(ApiError::Graphql(errors));
        }
        if !status.is_success() {
            return Err(ApiError::Http { status: status.as_u16(), body });
        }
        parsed.data
              .filter(|d| !d.is_null())
              .ok_or_else(|| ApiError::Decode(format!("{}: respuesta sin 'data'", request.operation_name)))
    }
}

/// Extrae `data.<field>` de una respuesta.
pub fn take_field(mut data: JsonValue, field: &str) -> Result<JsonValue, ApiError> {
    match data.get_mut(field) {
        Some(value) => Ok(value.take()),
        None => Err(ApiError::Decode(format!("falta el campo '{}' en la respuesta", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_with_operation_name() {
        let req = GraphqlRequest::new("generateTransactionId", "mutation generateTransactionId { generateTransactionId }",
                                      json!({}));
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["operationName"], "generateTransactionId");
        assert!(v.get("operation_name").is_none());
    }

    #[test]
    fn take_field_extracts_or_fails() {
        let data = json!({"handlingUnit": {"id": "x"}});
        assert_eq!(take_field(data.clone(), "handlingUnit").unwrap(), json!({"id": "x"}));
        assert!(matches!(take_field(data, "location"), Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let client = HttpGraphqlClient::new("http://127.0.0.1:9/graphql", Duration::from_millis(500)).unwrap()
                                                                                                    .with_token(Some("t".into()));
        let err = client.execute(GraphqlRequest::new("ping", "query ping { ping }", json!({}))).await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
