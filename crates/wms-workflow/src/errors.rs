use flow::FlowError;
use saga::SagaFailure;
use thiserror::Error;
use wms_domain::DomainError;
use wms_graphql::{ApiError, ErrorPayload, Locale, Operation};

// Errores comunes de los workflows.
//
// Centraliza los errores del almacén de procesos (`FlowError`), de las
// validaciones del dominio, del backend GraphQL y de las sagas.
#[derive(Error, Debug)]
pub enum WorkflowError {
  /// Errores originados por el almacén de procesos / orquestador.
  #[error("Error de flujo: {0}")]
  Flow(#[from] FlowError),

  /// Validaciones del dominio (cantidades, códigos, peticiones).
  #[error("Error de dominio: {0}")]
  Domain(#[from] DomainError),

  /// Errores del backend GraphQL.
  #[error("{0}")]
  Api(#[from] ApiError),

  /// Fallo de una saga; `source` es el error original del paso.
  #[error("{saga}: el paso '{step}' falló: {source}")]
  Saga { saga: String, step: String, rolled_back: bool, source: Box<WorkflowError> },

  /// Errores de serializacion/deserializacion JSON.
  #[error("Error de serializacion: {0}")]
  Serialization(#[from] serde_json::Error),

  /// Validación local de un paso: nunca llega a la red ni al almacén.
  #[error("Error de validacion: {0}")]
  Validation(String),

  #[error("Workflow desconocido: {0}")]
  UnknownWorkflow(String),
}

impl From<SagaFailure<WorkflowError>> for WorkflowError {
  fn from(f: SagaFailure<WorkflowError>) -> Self {
    WorkflowError::Saga { saga: f.saga, step: f.step, rolled_back: f.rolled_back, source: Box::new(f.error) }
  }
}

impl WorkflowError {
  /// Error de backend subyacente, si lo hay.
  pub fn api_error(&self) -> Option<&ApiError> {
    match self {
      WorkflowError::Api(e) => Some(e),
      WorkflowError::Saga { source, .. } => source.api_error(),
      _ => None,
    }
  }

  /// Código estable para errores locales.
  pub fn local_code(&self) -> &'static str {
    match self {
      WorkflowError::Flow(FlowError::NotFound(_)) => "NOT_FOUND",
      WorkflowError::Flow(FlowError::InvalidStep(_)) => "INVALID_STEP",
      WorkflowError::Flow(_) => "PROCESS_STORE",
      WorkflowError::Domain(_) | WorkflowError::Validation(_) => "VALIDATION",
      WorkflowError::Saga { source, .. } => source.local_code(),
      WorkflowError::Serialization(_) => "SERIALIZATION",
      WorkflowError::UnknownWorkflow(_) => "UNKNOWN_WORKFLOW",
      WorkflowError::Api(_) => "API",
    }
  }

  /// Cuerpo de error para las respuestas HTTP.
  pub fn payload(&self, operation: Operation, locale: Locale) -> ErrorPayload {
    match self.api_error() {
      Some(api) => {
        let mut payload = ErrorPayload::from_api_error(api, operation, locale);
        if payload.code.is_none() {
          payload.code = Some(self.local_code().to_string());
        }
        payload
      }
      None => {
        let message = match self {
          WorkflowError::Saga { source, .. } => source.to_string(),
          other => other.to_string(),
        };
        ErrorPayload::local(message, self.local_code())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use wms_graphql::GraphqlErrorItem;

  #[test]
  fn saga_failure_keeps_backend_code() {
    let api = ApiError::Graphql(vec![GraphqlErrorItem { message: "dup".into(),
                                                        extensions: Some(json!({"code": "FAPI_000001",
                                                                                "variables": {"table": "pallet"}})) }]);
    let err = WorkflowError::Saga { saga: "validatePalletization".into(),
                                    step: "createPallet".into(),
                                    rolled_back: true,
                                    source: Box::new(WorkflowError::Api(api)) };
    let p = err.payload(Operation::Validate, Locale::En);
    assert_eq!(p.code.as_deref(), Some("FAPI_000001"));
    assert_eq!(p.message, "dup");
    assert_eq!(p.user_message, "This pallet already exists");
  }

  #[test]
  fn local_errors_get_local_codes() {
    let err = WorkflowError::Validation("cantidad inválida".into());
    let p = err.payload(Operation::Validate, Locale::En);
    assert_eq!(p.code.as_deref(), Some("VALIDATION"));
    assert!(p.message.contains("cantidad inválida"));
    let err = WorkflowError::from(FlowError::InvalidStep("x".into()));
    assert_eq!(err.local_code(), "INVALID_STEP");
  }
}
