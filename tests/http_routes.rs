use axum::body::{to_bytes, Bytes};
use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use flow::{InMemoryProcessStore, ProcessStore};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wms_flow::routes::{back_step, health, reset_process, return_reception, submit_step, view_process};
use wms_flow::{AppState, ClientProvider};
use wms_graphql::{ApiError, GraphqlClient, GraphqlErrorItem, Locale, MockGraphqlClient};

/// Proveedor que anota el token de cada petición.
struct RecordingProvider {
  client: Arc<MockGraphqlClient>,
  tokens: Mutex<Vec<Option<String>>>,
}

impl ClientProvider for RecordingProvider {
  fn client(&self, token: Option<String>) -> Arc<dyn GraphqlClient> {
    self.tokens.lock().unwrap().push(token);
    self.client.clone()
  }
}

fn setup() -> (AppState, Arc<InMemoryProcessStore>, Arc<MockGraphqlClient>, Arc<RecordingProvider>) {
  let store = Arc::new(InMemoryProcessStore::default());
  let mock = Arc::new(MockGraphqlClient::new());
  let provider = Arc::new(RecordingProvider { client: mock.clone(), tokens: Mutex::new(vec![]) });
  let state = AppState::new(store.clone(), provider.clone(), Locale::En).unwrap();
  (state, store, mock, provider)
}

async fn body_json(response: Response) -> Value {
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn process_path(workflow: &str, name: &str) -> Path<(String, String)> {
  Path((workflow.to_string(), name.to_string()))
}

fn step_path(workflow: &str, name: &str, step: &str) -> Path<(String, String, String)> {
  Path((workflow.to_string(), name.to_string(), step.to_string()))
}

fn return_body() -> Bytes {
  Bytes::from(json!({"returnLocationBarcode": "RET-01",
                     "handlingUnit": "HU-RET-1",
                     "article": {"id": "a1", "name": "ART-a1"},
                     "quantity": 2.0,
                     "stockStatus": 1}).to_string())
}

#[tokio::test]
async fn failed_return_reception_answers_500_with_the_backend_error() {
  let (state, _store, mock, provider) = setup();
  let failure = ApiError::Graphql(vec![GraphqlErrorItem { message: "stock status closed".into(),
                                                          extensions: Some(json!({"code": "FAPI_000004",
                                                                                  "variables": {"table": "HU-RET-1"}})) }]);
  mock.respond("generateTransactionId", json!({"generateTransactionId": "tx-8"}))
      .respond("locations", json!({"locations": {"count": 1, "results": [{"id": "loc-ret", "name": "RET"}]}}))
      .respond("handlingUnits", json!({"handlingUnits": {"count": 0, "results": []}}))
      .respond("createHandlingUnit", json!({"createHandlingUnit": {"id": "hu-new", "name": "HU-RET-1"}}))
      .fail("createHandlingUnitContent", failure)
      .respond("rollbackTransaction", json!({"rollbackTransaction": true}));
  let mut headers = HeaderMap::new();
  headers.insert(COOKIE, HeaderValue::from_static("token=abc"));

  let response = return_reception(State(state), headers, return_body()).await;
  assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body = body_json(response).await;
  assert_eq!(body["error"]["message"], "stock status closed");
  assert_eq!(body["error"]["code"], "FAPI_000004");
  assert_eq!(body["error"]["variables"], json!({"table": "HU-RET-1"}));
  assert_eq!(body["error"]["userMessage"], "Insufficient stock in HU-RET-1");
  assert!(body.get("response").is_none());

  let rollbacks = mock.calls_to("rollbackTransaction");
  assert_eq!(rollbacks.len(), 1);
  assert_eq!(rollbacks[0].variables, json!({"id": "tx-8"}));
  assert_eq!(*provider.tokens.lock().unwrap(), vec![Some("abc".to_string())]);
}

#[tokio::test]
async fn malformed_body_is_a_500_without_network_calls() {
  let (state, _store, mock, provider) = setup();
  let response = return_reception(State(state), HeaderMap::new(), Bytes::from_static(b"{not json")).await;
  assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body = body_json(response).await;
  assert_eq!(body["error"]["code"], "SERIALIZATION");
  assert!(mock.calls().is_empty());
  assert!(provider.tokens.lock().unwrap().is_empty());
}

#[tokio::test]
async fn process_api_walks_a_movement_forward_and_back() {
  let (state, store, mock, provider) = setup();
  let empty = body_json(view_process(State(state.clone()), process_path("movementToProcess", "op-1")).await).await;
  assert_eq!(empty["response"]["activeStep"], 10);
  assert_eq!(empty["response"]["status"], "active");

  mock.respond("movement",
               json!({"movement": {"id": "m1", "number": 41, "status": 100, "articleId": "a1", "quantity": 3.0,
                                   "originalHandlingUnitId": "hu-a", "originalContentId": "hu-a-c1"}}));
  let mut headers = HeaderMap::new();
  headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
  let response = submit_step(State(state.clone()),
                             step_path("movementToProcess", "op-1", "10"),
                             headers,
                             Bytes::from(json!({"movementId": "m1"}).to_string())).await;
  assert_eq!(response.status(), StatusCode::OK);
  let body = body_json(response).await;
  assert_eq!(body["response"]["outcome"], "advanced");
  assert_eq!(body["response"]["view"]["activeStep"], 20);
  assert_eq!(body["response"]["view"]["header"], json!(["Movimiento: 41"]));
  assert_eq!(*provider.tokens.lock().unwrap(), vec![Some("xyz".to_string())]);
  assert_eq!(store.get("movementToProcess:op-1").to_json()["currentStep"], 10);

  let back = body_json(back_step(State(state.clone()), step_path("movementToProcess", "op-1", "20")).await).await;
  assert_eq!(back["response"]["activeStep"], 10);

  let reset = body_json(reset_process(State(state.clone()), process_path("movementToProcess", "op-1")).await).await;
  assert_eq!(reset["response"], json!({"deleted": true}));
  assert!(store.list().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_workflow_and_bad_step_use_the_error_envelope() {
  let (state, _store, mock, _provider) = setup();
  let response = view_process(State(state.clone()), process_path("shipping", "op-9")).await;
  assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body_json(response).await["error"]["code"], "UNKNOWN_WORKFLOW");

  let response = submit_step(State(state.clone()), step_path("pack", "op-9", "20"), HeaderMap::new(), Bytes::new()).await;
  assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
  assert_eq!(body_json(response).await["error"]["code"], "INVALID_STEP");

  let response = submit_step(State(state), step_path("pack", "op-9", "ten"), HeaderMap::new(), Bytes::new()).await;
  assert_eq!(body_json(response).await["error"]["code"], "INVALID_STEP");
  assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
  assert_eq!(health().await.0, json!({"status": "ok"}));
}
