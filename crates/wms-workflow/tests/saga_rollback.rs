use serde_json::json;
use std::sync::Arc;
use wms_domain::{Article, DomainStubs, HandlingUnitContentFeature, PalletizationRequest, ReturnReceptionRequest,
                 SubstitutionRequest};
use wms_graphql::{ApiError, GraphqlErrorItem, Locale, MockGraphqlClient, Operation, WmsApi};
use wms_workflow::sagas::{validate_palletization, validate_return_reception, validate_substitution};
use wms_workflow::WorkflowError;

fn return_request() -> ReturnReceptionRequest {
  ReturnReceptionRequest { return_location_barcode: Some("RET-01".into()),
                           handling_unit: "HU-RET-1".into(),
                           article: Article { id: "a1".into(), name: "ART-a1".into(), ..Default::default() },
                           quantity: 2.0,
                           stock_status: 1,
                           features: vec![],
                           stock_owner_id: None }
}

#[tokio::test]
async fn failing_content_creation_rolls_back_once_with_the_transaction_id() {
  let mock = Arc::new(MockGraphqlClient::new());
  let failure = ApiError::Graphql(vec![GraphqlErrorItem { message: "stock status closed".into(),
                                                          extensions: Some(json!({"code": "FAPI_000004",
                                                                                  "variables": {"table": "HU-RET-1"}})) }]);
  mock.respond("generateTransactionId", json!({"generateTransactionId": "tx-8"}))
      .respond("locations", json!({"locations": {"count": 1, "results": [{"id": "loc-ret", "name": "RET"}]}}))
      .respond("handlingUnits", json!({"handlingUnits": {"count": 0, "results": []}}))
      .respond("createHandlingUnit", json!({"createHandlingUnit": {"id": "hu-new", "name": "HU-RET-1"}}))
      .fail("createHandlingUnitContent", failure)
      .respond("rollbackTransaction", json!({"rollbackTransaction": true}));
  let api = WmsApi::new(mock.clone());

  let err = validate_return_reception(&api, return_request()).await.unwrap_err();
  match &err {
    WorkflowError::Saga { step, rolled_back, .. } => {
      assert_eq!(step, "createHandlingUnitContent");
      assert!(*rolled_back);
    }
    other => panic!("se esperaba un fallo de saga: {:?}", other),
  }
  assert_eq!(mock.operation_names(),
             vec!["generateTransactionId",
                  "locations",
                  "handlingUnits",
                  "createHandlingUnit",
                  "createHandlingUnitContent",
                  "rollbackTransaction"]);
  let rollbacks = mock.calls_to("rollbackTransaction");
  assert_eq!(rollbacks.len(), 1);
  assert_eq!(rollbacks[0].variables, json!({"id": "tx-8"}));
  let create = &mock.calls_to("createHandlingUnit")[0];
  assert_eq!(create.variables["input"]["lastTransactionId"], "tx-8");
  assert_eq!(create.variables["input"]["locationId"], "loc-ret");

  let payload = err.payload(Operation::Validate, Locale::En);
  assert_eq!(payload.message, "stock status closed");
  assert_eq!(payload.code.as_deref(), Some("FAPI_000004"));
  assert_eq!(payload.user_message, "Insufficient stock in HU-RET-1");
}

#[tokio::test]
async fn failing_rollback_is_logged_and_the_original_error_surfaces() {
  let mock = Arc::new(MockGraphqlClient::new());
  let failure = ApiError::Graphql(vec![GraphqlErrorItem { message: "stock status closed".into(),
                                                          extensions: Some(json!({"code": "FAPI_000004",
                                                                                  "variables": {"table": "HU-RET-1"}})) }]);
  mock.respond("generateTransactionId", json!({"generateTransactionId": "tx-11"}))
      .respond("locations", json!({"locations": {"count": 1, "results": [{"id": "loc-ret", "name": "RET"}]}}))
      .respond("handlingUnits", json!({"handlingUnits": {"count": 0, "results": []}}))
      .respond("createHandlingUnit", json!({"createHandlingUnit": {"id": "hu-new", "name": "HU-RET-1"}}))
      .fail("createHandlingUnitContent", failure)
      .fail("rollbackTransaction", ApiError::Transport("backend unavailable".into()));
  let api = WmsApi::new(mock.clone());

  let err = validate_return_reception(&api, return_request()).await.unwrap_err();
  match &err {
    WorkflowError::Saga { step, rolled_back, source, .. } => {
      assert_eq!(step, "createHandlingUnitContent");
      assert!(*rolled_back);
      assert!(matches!(source.as_ref(), WorkflowError::Api(ApiError::Graphql(_))));
    }
    other => panic!("se esperaba un fallo de saga: {:?}", other),
  }
  let rollbacks = mock.calls_to("rollbackTransaction");
  assert_eq!(rollbacks.len(), 1);
  assert_eq!(rollbacks[0].variables, json!({"id": "tx-11"}));

  let payload = err.payload(Operation::Validate, Locale::En);
  assert_eq!(payload.message, "stock status closed");
  assert_eq!(payload.code.as_deref(), Some("FAPI_000004"));
  assert!(!payload.message.contains("backend unavailable"));
  assert_eq!(mock.pending(), 0);
}

#[tokio::test]
async fn lookup_failure_before_any_write_does_not_roll_back() {
  let mock = Arc::new(MockGraphqlClient::new());
  mock.respond("generateTransactionId", json!({"generateTransactionId": "tx-9"}))
      .fail("locations", ApiError::Transport("connection reset".into()));
  let api = WmsApi::new(mock.clone());
  let err = validate_return_reception(&api, return_request()).await.unwrap_err();
  assert!(matches!(err, WorkflowError::Saga { rolled_back: false, .. }));
  assert!(mock.calls_to("rollbackTransaction").is_empty());
}

#[tokio::test]
async fn unknown_return_location_falls_back_to_the_default_parameter() {
  let mock = Arc::new(MockGraphqlClient::new());
  mock.respond("generateTransactionId", json!({"generateTransactionId": "tx-10"}))
      .respond("locations", json!({"locations": {"count": 0, "results": []}}))
      .respond("parameters", json!({"parameters": {"count": 1, "results": [{"value": "RETURNS"}]}}))
      .respond("locations", json!({"locations": {"count": 1, "results": [{"id": "loc-def", "name": "RETURNS"}]}}))
      .respond("handlingUnits",
               json!({"handlingUnits": {"count": 1, "results": [{"id": "hu-1", "name": "HU-RET-1",
                                                                  "locationId": "loc-def"}]}}))
      .respond("createHandlingUnitContent",
               json!({"createHandlingUnitContent": {"id": "c-1", "handlingUnitId": "hu-1", "articleId": "a1",
                                                    "quantity": 2.0}}))
      .respond("createMovement", json!({"createMovement": {"id": "mv-1", "type": "return", "status": 300}}))
      .respond("handlingUnit", json!({"handlingUnit": {"id": "hu-1", "name": "HU-RET-1"}}));
  let api = WmsApi::new(mock.clone());
  let out = validate_return_reception(&api, return_request()).await.unwrap();
  assert_eq!(out["transactionId"], "tx-10");
  assert_eq!(out["handlingUnit"]["id"], "hu-1");
  assert_eq!(mock.calls_to("parameters")[0].variables["filters"],
             json!({"scope": "inbound", "code": "DEFAULT_RETURN_LOCATION"}));
  assert!(mock.calls_to("createHandlingUnit").is_empty());
  assert_eq!(mock.pending(), 0);
}

#[tokio::test]
async fn missing_article_feature_never_reaches_the_network() {
  let mock = Arc::new(MockGraphqlClient::new());
  let api = WmsApi::new(mock.clone());
  let mut request = return_request();
  request.article = DomainStubs::article_with_lot("a1");
  let err = validate_return_reception(&api, request).await.unwrap_err();
  assert_eq!(err.local_code(), "VALIDATION");
  assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn substitution_with_identical_value_is_rejected_without_writes() {
  let mock = Arc::new(MockGraphqlClient::new());
  let feature = HandlingUnitContentFeature { id: "f1".into(),
                                             handling_unit_content_id: "c1".into(),
                                             feature_code_id: "lot".into(),
                                             value: Some("L-001".into()),
                                             last_transaction_id: None };
  mock.respond("generateTransactionId", json!({"generateTransactionId": "tx-s"}))
      .respond("handlingUnitContentFeature",
               json!({"handlingUnitContentFeature": serde_json::to_value(&feature).unwrap()}));
  let api = WmsApi::new(mock.clone());
  let mut content = DomainStubs::box_with_content("hu", "a1", 4.0).handling_unit_contents.remove(0);
  content.id = "c1".into();
  let request = SubstitutionRequest { handling_unit_content_feature: feature,
                                      new_value: " L-001 ".into(),
                                      handling_unit_content: content };
  let err = validate_substitution(&api, request).await.unwrap_err();
  assert!(matches!(err, WorkflowError::Saga { rolled_back: false, .. }));
  assert_eq!(err.local_code(), "VALIDATION");
  assert!(mock.calls_to("updateHandlingUnitContentFeature").is_empty());
  assert!(mock.calls_to("rollbackTransaction").is_empty());
}

#[tokio::test]
async fn substitution_updates_value_and_records_movement() {
  let mock = Arc::new(MockGraphqlClient::new());
  mock.respond("generateTransactionId", json!({"generateTransactionId": "tx-s2"}))
      .respond("handlingUnitContentFeature",
               json!({"handlingUnitContentFeature": {"id": "f1", "featureCodeId": "lot", "value": "L-001"}}))
      .respond("updateHandlingUnitContentFeature",
               json!({"updateHandlingUnitContentFeature": {"id": "f1", "value": "L-002"}}))
      .respond("createMovement", json!({"createMovement": {"id": "mv-s", "type": "featureSubstitution"}}))
      .respond("handlingUnitContent", json!({"handlingUnitContent": {"id": "hu-c1", "articleId": "a1"}}));
  let api = WmsApi::new(mock.clone());
  let content = DomainStubs::box_with_content("hu", "a1", 4.0).handling_unit_contents.remove(0);
  let feature = content.handling_unit_content_features[0].clone();
  let request = SubstitutionRequest { handling_unit_content_feature: feature,
                                      new_value: "L-002".into(),
                                      handling_unit_content: content };
  let out = validate_substitution(&api, request).await.unwrap();
  assert_eq!(out["movement"]["type"], "featureSubstitution");
  let update = &mock.calls_to("updateHandlingUnitContentFeature")[0];
  assert_eq!(update.variables["input"], json!({"value": "L-002", "lastTransactionId": "tx-s2"}));
  let movement = &mock.calls_to("createMovement")[0];
  assert_eq!(movement.variables["input"]["comment"], "L-001 -> L-002");
}

#[tokio::test]
async fn palletization_creates_missing_pallet_at_packing_location() {
  let mock = Arc::new(MockGraphqlClient::new());
  mock.respond("generateTransactionId", json!({"generateTransactionId": "tx-p"}))
      .respond("handlingUnits", json!({"handlingUnits": {"count": 0, "results": []}}))
      .respond("parameters", json!({"parameters": {"count": 1, "results": [{"value": "PACK-01"}]}}))
      .respond("locations", json!({"locations": {"count": 1, "results": [{"id": "loc-pack", "name": "PACK-01"}]}}))
      .respond("createHandlingUnit", json!({"createHandlingUnit": {"id": "hu-pal", "name": "PAL-9"}}))
      .respond("updateHandlingUnit", json!({"updateHandlingUnit": {"id": "hu-box", "name": "BOX-hu-box"}}))
      .respond("handlingUnit", json!({"handlingUnit": {"id": "hu-pal", "name": "PAL-9",
                                                       "childHandlingUnits": [{"id": "hu-box"}]}}));
  let api = WmsApi::new(mock.clone());
  let request = PalletizationRequest { handling_unit: "PAL-9".into(),
                                       box_unit: DomainStubs::box_with_content("hu-box", "a1", 1.0),
                                       hu_model: Some(DomainStubs::pallet_model()) };
  let out = validate_palletization(&api, request).await.unwrap();
  assert_eq!(out["handlingUnit"]["childHandlingUnits"][0]["id"], "hu-box");

  let create = &mock.calls_to("createHandlingUnit")[0];
  assert_eq!(create.variables["input"]["locationId"], "loc-pack");
  assert_eq!(create.variables["input"]["handlingUnitModelId"], "model-eur");
  let attach = &mock.calls_to("updateHandlingUnit")[0];
  assert_eq!(attach.variables["id"], "hu-box");
  assert_eq!(attach.variables["input"]["parentHandlingUnitId"], "hu-pal");
  assert_eq!(attach.variables["input"]["lastTransactionId"], "tx-p");
  assert_eq!(mock.pending(), 0);
}
