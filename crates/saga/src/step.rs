// Archivo: step.rs
// Propósito: contratos de un paso de saga y de la compensación global.
use async_trait::async_trait;

/// Efecto de un paso completado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEffect {
    /// Lectura: no hay nada que deshacer.
    ReadOnly,
    /// Escritura: a partir de aquí un fallo exige compensar.
    Wrote,
}

/// Paso de una saga. `execute` puede leer y escribir el contexto para
/// pasar resultados a los pasos siguientes.
#[async_trait]
pub trait SagaStep<C, E>: Send + Sync
    where C: Send + Sync,
          E: Send
{
    fn name(&self) -> &str;

    async fn execute(&self, ctx: &mut C) -> Result<StepEffect, E>;

    /// Deshace la escritura de este paso. Sólo se llama si `execute`
    /// devolvió `StepEffect::Wrote`.
    async fn compensate(&self, _ctx: &C) -> Result<(), E> {
        Ok(())
    }
}

/// Compensación a nivel de saga (por ejemplo, anular en el backend toda
/// una transacción). Se ejecuta una vez, tras las de los pasos.
#[async_trait]
pub trait Compensation<C, E>: Send + Sync
    where C: Send + Sync,
          E: Send
{
    async fn compensate(&self, ctx: &C) -> Result<(), E>;
}
