use flow::{InMemoryProcessStore, ProcessStore};
use serde_json::{json, Value};
use std::sync::Arc;
use wms_graphql::{ApiError, MockGraphqlClient, WmsApi};
use wms_workflow::{SubmitOutcome, WorkflowError, WorkflowFactory, WorkflowRunner, WorkflowType};

const WF: WorkflowType = WorkflowType::MovementToProcess;

fn setup() -> (Arc<InMemoryProcessStore>, WorkflowRunner<InMemoryProcessStore>, Arc<MockGraphqlClient>, WmsApi) {
  let store = Arc::new(InMemoryProcessStore::default());
  let runner = WorkflowRunner::new(store.clone(), WorkflowFactory::new().unwrap());
  let mock = Arc::new(MockGraphqlClient::new());
  let api = WmsApi::new(mock.clone());
  (store, runner, mock, api)
}

fn partial_movement() -> Value {
  json!({"id": "m1", "number": 41, "status": 100, "articleId": "a1", "quantity": 3.0,
         "originalHandlingUnitId": "hu-a", "originalContentId": "hu-a-c1"})
}

fn full_movement() -> Value {
  json!({"id": "m2", "number": 42, "status": 100, "originalHandlingUnitId": "hu-a"})
}

fn advanced(outcome: SubmitOutcome) -> wms_workflow::WorkflowView {
  match outcome {
    SubmitOutcome::Advanced { view } => view,
    other => panic!("se esperaba un avance: {:?}", other),
  }
}

#[tokio::test]
async fn first_step_on_empty_process_is_stored_and_leads_to_article_scan() {
  let (store, runner, mock, api) = setup();
  let initial = runner.view(WF, "op-1").unwrap();
  assert_eq!(initial.active_step, Some(10));
  assert_eq!(initial.active_step_name.as_deref(), Some("select_movement"));
  assert_eq!(initial.process, json!({}));

  mock.respond("movement", json!({ "movement": partial_movement() }));
  let view = advanced(runner.submit(WF, "op-1", 10, &json!({"movementId": "m1"}), &api).await.unwrap());
  assert_eq!(view.active_step, Some(20));
  assert_eq!(view.header, vec!["Movimiento: 41".to_string()]);

  let stored = store.get("movementToProcess:op-1").to_json();
  let mut keys: Vec<&String> = stored.as_object().unwrap().keys().collect();
  keys.sort();
  assert_eq!(keys, vec!["currentStep", "step10"]);
  assert_eq!(stored["currentStep"], 10);
  assert_eq!(stored["step10"]["data"]["movement"]["id"], "m1");
  assert!(stored["step10"].get("previousStep").is_none());
}

#[tokio::test]
async fn full_handling_unit_movement_skips_to_final_location() {
  let (_store, runner, mock, api) = setup();
  mock.respond("movement", json!({ "movement": full_movement() }));
  let view = advanced(runner.submit(WF, "op-2", 10, &json!({"movementId": "m2"}), &api).await.unwrap());
  assert_eq!(view.active_step, Some(70));
  assert_eq!(view.active_step_name.as_deref(), Some("scan_final_location"));
}

#[tokio::test]
async fn submitting_a_step_that_is_not_active_is_rejected_before_any_call() {
  let (store, runner, mock, api) = setup();
  let err = runner.submit(WF, "op-3", 30, &json!({"contentId": "c1"}), &api).await.unwrap_err();
  assert_eq!(err.local_code(), "INVALID_STEP");
  let err = runner.submit(WF, "op-3", 60, &json!({}), &api).await.unwrap_err();
  assert_eq!(err.local_code(), "NOT_FOUND");
  assert!(mock.calls().is_empty());
  assert!(store.list().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_input_leaves_the_process_untouched() {
  let (store, runner, mock, api) = setup();
  mock.respond("movement", json!({ "movement": partial_movement() }))
      .respond("articles", json!({"articles": {"count": 1, "results": [{"id": "a1", "name": "ART-1"}]}}))
      .respond("handlingUnitContent",
               json!({"handlingUnitContent": {"id": "hu-a-c1", "handlingUnitId": "hu-a", "articleId": "a1",
                                              "quantity": 2.0}}));
  runner.submit(WF, "op-4", 10, &json!({"movementId": "m1"}), &api).await.unwrap();
  runner.submit(WF, "op-4", 20, &json!({"barcode": "ART-1"}), &api).await.unwrap();
  let view = advanced(runner.submit(WF, "op-4", 30, &json!({"contentId": "hu-a-c1"}), &api).await.unwrap());
  // sin características se salta la lectura de lote
  assert_eq!(view.active_step, Some(50));
  let before = store.get("movementToProcess:op-4");

  let err = runner.submit(WF, "op-4", 50, &json!({"quantity": 2.5}), &api).await.unwrap_err();
  assert!(matches!(err, WorkflowError::Domain(_)));
  let err = runner.submit(WF, "op-4", 50, &json!({"quantity": 0}), &api).await.unwrap_err();
  assert_eq!(err.local_code(), "VALIDATION");
  assert_eq!(store.get("movementToProcess:op-4"), before);

  let view = advanced(runner.submit(WF, "op-4", 50, &json!({"quantity": 2}), &api).await.unwrap());
  assert_eq!(view.active_step, Some(70));
}

#[tokio::test]
async fn back_from_unentered_step_returns_to_the_previous_one() {
  let (store, runner, mock, api) = setup();
  mock.respond("movement", json!({ "movement": partial_movement() }))
      .respond("articles", json!({"articles": {"count": 1, "results": [{"id": "a1", "name": "ART-1"}]}}));
  runner.submit(WF, "op-5", 10, &json!({"movementId": "m1"}), &api).await.unwrap();
  runner.submit(WF, "op-5", 20, &json!({"barcode": "ART-1"}), &api).await.unwrap();
  let view = runner.back(WF, "op-5", 30).unwrap();
  assert_eq!(view.active_step, Some(20));
  let stored = store.get("movementToProcess:op-5");
  assert!(stored.is_complete(10));
  assert!(!stored.is_complete(20));

  runner.reset(WF, "op-5").unwrap();
  assert_eq!(runner.view(WF, "op-5").unwrap().active_step, Some(10));
}

#[tokio::test]
async fn completing_the_path_runs_validation_and_deletes_the_process() {
  let (store, runner, mock, api) = setup();
  mock.respond("movement", json!({ "movement": full_movement() }))
      .respond("locations", json!({"locations": {"count": 1, "results": [{"id": "loc-b", "name": "B-02"}]}}))
      .respond("generateTransactionId", json!({"generateTransactionId": "tx-m"}))
      .respond("movement", json!({ "movement": full_movement() }))
      .respond("updateHandlingUnit", json!({"updateHandlingUnit": {"id": "hu-a", "locationId": "loc-b"}}))
      .respond("updateMovement", json!({"updateMovement": {"id": "m2", "status": 300}}))
      .respond("handlingUnit", json!({"handlingUnit": {"id": "hu-a", "name": "PAL-A", "locationId": "loc-b"}}));
  runner.submit(WF, "op-6", 10, &json!({"movementId": "m2"}), &api).await.unwrap();
  let view = advanced(runner.submit(WF, "op-6", 70, &json!({"barcode": "LOC-B"}), &api).await.unwrap());
  assert_eq!(view.active_step, Some(80));
  assert_eq!(view.header, vec!["Movimiento: 42".to_string(), "Destino: B-02".to_string()]);

  match runner.submit(WF, "op-6", 80, &json!({}), &api).await.unwrap() {
    SubmitOutcome::Finalized { result } => {
      assert_eq!(result["transactionId"], "tx-m");
      assert_eq!(result["movement"]["status"], 300);
      assert_eq!(result["handlingUnit"]["locationId"], "loc-b");
    }
    other => panic!("se esperaba la finalización: {:?}", other),
  }
  assert!(store.list().unwrap().is_empty());
  let close = &mock.calls_to("updateMovement")[0];
  assert_eq!(close.variables["input"]["status"], 300);
  assert_eq!(close.variables["input"]["finalLocationId"], "loc-b");
  assert_eq!(close.variables["input"]["lastTransactionId"], "tx-m");
  assert_eq!(mock.pending(), 0);
}

#[tokio::test]
async fn failed_validation_rolls_back_and_reopens_the_last_step() {
  let (store, runner, mock, api) = setup();
  mock.respond("movement", json!({ "movement": full_movement() }))
      .respond("locations", json!({"locations": {"count": 1, "results": [{"id": "loc-b", "name": "B-02"}]}}))
      .respond("generateTransactionId", json!({"generateTransactionId": "tx-f"}))
      .respond("movement", json!({ "movement": full_movement() }))
      .respond("updateHandlingUnit", json!({"updateHandlingUnit": {"id": "hu-a", "locationId": "loc-b"}}))
      .fail("updateMovement", ApiError::Transport("timeout".into()))
      .respond("rollbackTransaction", json!({"rollbackTransaction": true}));
  runner.submit(WF, "op-7", 10, &json!({"movementId": "m2"}), &api).await.unwrap();
  runner.submit(WF, "op-7", 70, &json!({"barcode": "LOC-B"}), &api).await.unwrap();

  let err = runner.submit(WF, "op-7", 80, &json!({}), &api).await.unwrap_err();
  assert!(matches!(err, WorkflowError::Saga { rolled_back: true, .. }));
  assert_eq!(mock.calls_to("rollbackTransaction")[0].variables, json!({"id": "tx-f"}));

  let view = runner.view(WF, "op-7").unwrap();
  assert_eq!(view.active_step, Some(80));
  let stored = store.get("movementToProcess:op-7");
  assert!(stored.is_complete(70));
  assert!(!stored.is_complete(80));
}
