pub mod movement_flow;
pub mod pack_flow;

pub use movement_flow::MovementToProcessFlow;
pub use pack_flow::PackFlow;
