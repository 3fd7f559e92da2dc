#[allow(clippy::module_inception)]
pub mod movement_flow;
pub mod steps;

pub use movement_flow::MovementToProcessFlow;
