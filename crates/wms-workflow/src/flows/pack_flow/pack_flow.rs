// pack_flow.rs
//
// Workflow `pack`: caja -> palé -> (modelo del palé nuevo) -> validación.
// Al completarse ejecuta `validatePalletization`.
use crate::engine::{StepRegistry, Workflow};
use crate::errors::WorkflowError;
use crate::flows::pack_flow::steps::{ScanBoxStep10, ScanPalletStep20, SelectHuModelStep30, ValidateStep40};
use crate::sagas::validate_palletization;
use crate::step::{field_as, StepContext, StepHandler};
use crate::WorkflowType;
use async_trait::async_trait;
use flow::{Process, StepDefinition, StepNumber, TransitionTable};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use wms_domain::{HandlingUnitModel, PalletizationRequest};
use wms_graphql::WmsApi;

pub struct PackFlow {
  table: Arc<TransitionTable>,
  steps: StepRegistry,
}

impl PackFlow {
  pub fn new() -> Result<Self, WorkflowError> {
    let table = Self::transition_table()?;
    let steps = StepRegistry::new(&table,
                                  vec![Box::new(ScanBoxStep10),
                                       Box::new(ScanPalletStep20),
                                       Box::new(SelectHuModelStep30),
                                       Box::new(ValidateStep40)])?;
    Ok(Self { table: Arc::new(table), steps })
  }

  /// Con un palé existente no hace falta modelo.
  pub fn transition_table() -> Result<TransitionTable, WorkflowError> {
    let table = TransitionTable::new(vec![StepDefinition::new(ScanBoxStep10::NUMBER, "scan_box"),
                                          StepDefinition::new(ScanPalletStep20::NUMBER, "scan_pallet"),
                                          StepDefinition::new(SelectHuModelStep30::NUMBER, "select_hu_model")
                                            .skip_when(ValidateStep40::NUMBER, |p| {
                                              field_as::<bool>(p, ScanPalletStep20::NUMBER,
                                                               ScanPalletStep20::PALLET_EXISTS)
                                            }),
                                          StepDefinition::new(ValidateStep40::NUMBER, "validate")
                                            .requires(&[ScanBoxStep10::NUMBER, ScanPalletStep20::NUMBER]),])?;
    Ok(table)
  }

  fn request(process: &Process, api: &WmsApi) -> Result<PalletizationRequest, WorkflowError> {
    let ctx = StepContext::new(process, api);
    let pallet_exists: bool = ctx.require(ScanPalletStep20::NUMBER, ScanPalletStep20::PALLET_EXISTS)?;
    let hu_model = if pallet_exists {
      None
    } else {
      Some(ctx.require::<HandlingUnitModel>(SelectHuModelStep30::NUMBER, "hUModel")?)
    };
    Ok(PalletizationRequest { handling_unit: ctx.require(ScanPalletStep20::NUMBER, "pallet")?,
                              box_unit: ctx.require(ScanBoxStep10::NUMBER, "box")?,
                              hu_model })
  }
}

#[async_trait]
impl Workflow for PackFlow {
  fn workflow_type(&self) -> WorkflowType {
    WorkflowType::Pack
  }

  fn table(&self) -> Arc<TransitionTable> {
    self.table.clone()
  }

  fn handler(&self, step: StepNumber) -> Option<&dyn StepHandler> {
    self.steps.get(step)
  }

  async fn finalize(&self, process: &Process, api: &WmsApi) -> Result<JsonValue, WorkflowError> {
    let request = Self::request(process, api)?;
    validate_palletization(api, request).await
  }
}
