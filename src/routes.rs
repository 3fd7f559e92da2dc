// Archivo: routes.rs
// Propósito: rutas HTTP del servidor.
//
// - `POST /api/validate-*`: ejecutan una saga con el cuerpo JSON de la
//   petición.
// - `/api/workflows/{workflow}/processes/{name}`: consulta, envío de pasos,
//   retroceso y reinicio de procesos guiados.
//
// Todas responden `200 {"response": ...}` o `500 {"error": {...}}`. El
// cuerpo se lee como bytes y se interpreta aquí para que un JSON inválido
// también acabe en el sobre de error.
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use flow::{FlowError, StepNumber};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::future::Future;
use wms_domain::{MovementValidationRequest, PalletizationRequest, ReturnReceptionRequest, SubstitutionRequest};
use wms_graphql::{Operation, WmsApi};
use wms_workflow::sagas::{validate_movement, validate_palletization, validate_return_reception, validate_substitution};
use wms_workflow::{SubmitOutcome, WorkflowError, WorkflowType};

const TOKEN_COOKIE: &str = "token";

pub fn router(state: AppState) -> Router {
  Router::new().route("/health", get(health))
               .route("/api/validate-palletization", post(palletization))
               .route("/api/validate-substitution", post(substitution))
               .route("/api/validate-return-reception", post(return_reception))
               .route("/api/validate-movement", post(movement))
               .route("/api/workflows/{workflow}/processes/{name}",
                      get(view_process).delete(reset_process))
               .route("/api/workflows/{workflow}/processes/{name}/steps/{step}", post(submit_step))
               .route("/api/workflows/{workflow}/processes/{name}/steps/{step}/back", post(back_step))
               .with_state(state)
}

pub async fn health() -> Json<JsonValue> {
  Json(json!({"status": "ok"}))
}

/// Token del operario: cookie `token` o, si no, cabecera
/// `Authorization: Bearer`.
pub fn request_token(headers: &HeaderMap) -> Option<String> {
  let from_cookie = headers.get_all(COOKIE)
                           .iter()
                           .filter_map(|v| v.to_str().ok())
                           .flat_map(|v| v.split(';'))
                           .filter_map(|pair| pair.trim().split_once('='))
                           .find(|(k, _)| *k == TOKEN_COOKIE)
                           .map(|(_, v)| v.trim().to_string());
  from_cookie.filter(|t| !t.is_empty()).or_else(|| {
                                          headers.get(AUTHORIZATION)
                                                 .and_then(|v| v.to_str().ok())
                                                 .and_then(|v| v.strip_prefix("Bearer "))
                                                 .map(|t| t.trim().to_string())
                                                 .filter(|t| !t.is_empty())
                                        })
}

fn success<T: Serialize>(value: T) -> Response {
  (StatusCode::OK, Json(json!({ "response": value }))).into_response()
}

fn failure(state: &AppState, err: &WorkflowError, operation: Operation) -> Response {
  warn!("{} falló: {}", operation, err);
  let payload = err.payload(operation, state.locale);
  (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": payload }))).into_response()
}

fn respond<T: Serialize>(state: &AppState, result: Result<T, WorkflowError>, operation: Operation) -> Response {
  match result {
    Ok(value) => success(value),
    Err(err) => failure(state, &err, operation),
  }
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, WorkflowError> {
  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(serde_json::from_value(json!({}))?);
  }
  Ok(serde_json::from_slice(body)?)
}

async fn run_saga<R, F, Fut>(state: AppState, headers: HeaderMap, body: Bytes, saga: F) -> Response
  where R: DeserializeOwned,
        F: FnOnce(WmsApi, R) -> Fut,
        Fut: Future<Output = Result<JsonValue, WorkflowError>>
{
  let result = match parse_body::<R>(&body) {
    Ok(request) => saga(state.api(request_token(&headers)), request).await,
    Err(err) => Err(err),
  };
  respond(&state, result, Operation::Validate)
}

pub async fn palletization(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
  run_saga(state, headers, body, |api, req: PalletizationRequest| async move {
    validate_palletization(&api, req).await
  }).await
}

pub async fn substitution(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
  run_saga(state, headers, body, |api, req: SubstitutionRequest| async move {
    validate_substitution(&api, req).await
  }).await
}

pub async fn return_reception(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
  run_saga(state, headers, body, |api, req: ReturnReceptionRequest| async move {
    validate_return_reception(&api, req).await
  }).await
}

pub async fn movement(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
  run_saga(state, headers, body, |api, req: MovementValidationRequest| async move {
    validate_movement(&api, req).await
  }).await
}

fn parse_workflow(raw: &str) -> Result<WorkflowType, WorkflowError> {
  match raw.parse::<WorkflowType>() {
    Ok(WorkflowType::Unknown) | Err(()) => Err(WorkflowError::UnknownWorkflow(raw.to_string())),
    Ok(workflow) => Ok(workflow),
  }
}

fn parse_step(raw: &str) -> Result<StepNumber, WorkflowError> {
  raw.parse::<StepNumber>()
     .map_err(|_| WorkflowError::Flow(FlowError::InvalidStep(format!("'{}' no es un número de paso", raw))))
}

pub async fn view_process(State(state): State<AppState>, Path((workflow, name)): Path<(String, String)>) -> Response {
  let result = parse_workflow(&workflow).and_then(|wf| state.runner.view(wf, &name));
  respond(&state, result, Operation::Read)
}

pub async fn submit_step(State(state): State<AppState>,
                         Path((workflow, name, step)): Path<(String, String, String)>,
                         headers: HeaderMap,
                         body: Bytes)
                         -> Response {
  let result: Result<SubmitOutcome, WorkflowError> = async {
    let wf = parse_workflow(&workflow)?;
    let step = parse_step(&step)?;
    let input: JsonValue = parse_body(&body)?;
    debug!("{} '{}': envío del paso {}", wf, name, step);
    let api = state.api(request_token(&headers));
    state.runner.submit(wf, &name, step, &input, &api).await
  }.await;
  respond(&state, result, Operation::Validate)
}

pub async fn back_step(State(state): State<AppState>,
                       Path((workflow, name, step)): Path<(String, String, String)>)
                       -> Response {
  let result = parse_workflow(&workflow).and_then(|wf| state.runner.back(wf, &name, parse_step(&step)?));
  respond(&state, result, Operation::Update)
}

pub async fn reset_process(State(state): State<AppState>, Path((workflow, name)): Path<(String, String)>) -> Response {
  let result = parse_workflow(&workflow).and_then(|wf| state.runner.reset(wf, &name))
                                        .map(|()| json!({"deleted": true}));
  respond(&state, result, Operation::Delete)
}
