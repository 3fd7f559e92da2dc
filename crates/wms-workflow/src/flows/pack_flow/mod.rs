#[allow(clippy::module_inception)]
pub mod pack_flow;
pub mod steps;

pub use pack_flow::PackFlow;
