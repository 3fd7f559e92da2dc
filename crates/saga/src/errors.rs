// Archivo: errors.rs
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Fallo de una saga: el error original del paso, si se compensó y los
/// errores de compensación (que nunca sustituyen al original).
#[derive(Debug, Error)]
#[error("saga '{saga}' falló en el paso '{step}': {error}")]
pub struct SagaFailure<E> {
    pub saga: String,
    pub run_id: Uuid,
    pub step: String,
    pub error: E,
    /// Pasos completados antes del fallo.
    pub executed: Vec<String>,
    /// Se intentó compensar (había al menos una escritura).
    pub rolled_back: bool,
    pub compensation_errors: Vec<E>,
}

impl<E> SagaFailure<E> where E: fmt::Debug + fmt::Display
{
    /// Consume el fallo y devuelve el error original.
    pub fn into_error(self) -> E {
        self.error
    }
}
