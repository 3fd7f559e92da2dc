//! wms-workflow: workflows guiados del almacén
//!
//! Define los pasos (`StepHandler`) de cada workflow, su tabla de
//! transiciones, las sagas transaccionales que los cierran y el
//! `WorkflowRunner`, que combina `flow::ProcessService` con la validación
//! de cada paso y la finalización.

pub mod engine;
pub mod errors;
pub mod factory;
pub mod flows;
pub mod runner;
pub mod sagas;
pub mod step;
pub mod workflow_type;

pub use engine::Workflow;
pub use errors::WorkflowError;
pub use factory::WorkflowFactory;
pub use runner::{SubmitOutcome, WorkflowRunner, WorkflowView};
pub use step::{StepContext, StepHandler};
pub use workflow_type::WorkflowType;
