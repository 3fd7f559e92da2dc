pub mod guided_flow;

pub use guided_flow::{StepRegistry, Workflow};
