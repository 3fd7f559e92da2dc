//! Crate `saga`: ejecución ordenada de pasos con compensación
//!
//! Una `Saga` es una lista de pasos `{execute, compensate}` que se ejecutan
//! en orden estricto, uno tras otro, sobre un contexto mutable compartido.
//! Los pasos de sólo lectura no hacen la saga compensable; la primera
//! escritura sí. Ante el primer error se compensan en orden inverso los
//! pasos que escribieron y después la compensación global de la saga.
//!
//! Ejemplo rápido:
//! ```rust
//! use saga::{Saga, SagaStep, StepEffect};
//! struct Count;
//! #[async_trait::async_trait]
//! impl SagaStep<u32, String> for Count {
//!     fn name(&self) -> &str { "count" }
//!     async fn execute(&self, ctx: &mut u32) -> Result<StepEffect, String> {
//!         *ctx += 1;
//!         Ok(StepEffect::Wrote)
//!     }
//! }
//! let saga = Saga::new("demo").step(Count).step(Count);
//! let mut n = 0u32;
//! let report = tokio_test::block_on(saga.run(&mut n)).unwrap();
//! assert_eq!((n, report.writes), (2, 2));
//! ```
pub mod errors;
pub mod runner;
pub mod step;

pub use errors::SagaFailure;
pub use runner::{Saga, SagaReport};
pub use step::{Compensation, SagaStep, StepEffect};
