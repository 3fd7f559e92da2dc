pub mod workflow_factory;

pub use workflow_factory::WorkflowFactory;
