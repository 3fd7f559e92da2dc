// Archivo: errors.rs
// Propósito: errores del cliente GraphQL y su normalización en una única
// variante etiquetada que consumen todos los llamadores.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Entrada de la lista `errors` de una respuesta GraphQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorItem {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<JsonValue>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Fallo de red o de construcción de la petición.
    #[error("Error de transporte: {0}")]
    Transport(String),
    /// Respuesta HTTP no exitosa sin cuerpo GraphQL interpretable.
    #[error("Error HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// El backend devolvió `errors`.
    #[error("{}", graphql_summary(.0))]
    Graphql(Vec<GraphqlErrorItem>),
    /// Respuesta sin el campo esperado o con forma inesperada.
    #[error("Respuesta inesperada: {0}")]
    Decode(String),
    /// Búsqueda sin resultado cuando se esperaba uno.
    #[error("No encontrado: {0}")]
    NotFound(String),
}

fn graphql_summary(errors: &[GraphqlErrorItem]) -> String {
    match errors.first() {
        Some(first) => first.message.clone(),
        None => "error GraphQL sin detalle".to_string(),
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

/// Forma normalizada de cualquier error del backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NormalizedError {
    /// El primer error GraphQL trae `extensions.code` (y opcionalmente
    /// `extensions.variables`).
    Structured { code: String, variables: IndexMap<String, String> },
    /// Cualquier otro caso: red, HTTP, forma inesperada.
    Unstructured { raw: String },
}

impl ApiError {
    pub fn normalize(&self) -> NormalizedError {
        if let ApiError::Graphql(errors) = self {
            let extensions = errors.first().and_then(|e| e.extensions.as_ref());
            let code = extensions.and_then(|ext| ext.get("code")).and_then(|c| match c {
                                                                     JsonValue::String(s) => Some(s.clone()),
                                                                     JsonValue::Number(n) => Some(n.to_string()),
                                                                     _ => None,
                                                                 });
            if let Some(code) = code {
                let variables = extensions.and_then(|ext| ext.get("variables"))
                                          .and_then(|v| v.as_object())
                                          .map(|vars| {
                                              vars.iter()
                                                  .map(|(k, v)| {
                                                      let text = match v {
                                                          JsonValue::String(s) => s.clone(),
                                                          other => other.to_string(),
                                                      };
                                                      (k.clone(), text)
                                                  })
                                                  .collect()
                                          })
                                          .unwrap_or_default();
                return NormalizedError::Structured { code, variables };
            }
        }
        NormalizedError::Unstructured { raw: self.to_string() }
    }

    /// Código estructurado, si lo hay.
    pub fn code(&self) -> Option<String> {
        match self.normalize() {
            NormalizedError::Structured { code, .. } => Some(code),
            NormalizedError::Unstructured { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn structured_when_first_error_has_code() {
        let err = ApiError::Graphql(vec![GraphqlErrorItem { message: "duplicate".into(),
                                                            extensions: Some(json!({
                                                                "code": "FAPI_000001",
                                                                "variables": {"table": "handling_unit", "count": 2}
                                                            })) },
                                         GraphqlErrorItem { message: "other".into(), extensions: None }]);
        match err.normalize() {
            NormalizedError::Structured { code, variables } => {
                assert_eq!(code, "FAPI_000001");
                assert_eq!(variables.get("table").map(String::as_str), Some("handling_unit"));
                assert_eq!(variables.get("count").map(String::as_str), Some("2"));
            }
            other => panic!("expected structured, got {:?}", other),
        }
    }

    #[test]
    fn unstructured_otherwise() {
        let err = ApiError::Graphql(vec![GraphqlErrorItem { message: "boom".into(), extensions: Some(json!({})) }]);
        assert_eq!(err.normalize(), NormalizedError::Unstructured { raw: "boom".into() });
        let err = ApiError::Transport("connection refused".into());
        assert!(matches!(err.normalize(), NormalizedError::Unstructured { .. }));
        assert_eq!(err.code(), None);
    }
}
