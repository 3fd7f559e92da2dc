pub mod context;
pub mod trait_step;

pub use context::{field_as, StepContext};
pub(crate) use trait_step::step_data;
pub use trait_step::{parse_input, StepHandler};
