// Archivo: runner.rs
// Propósito: `Saga`, el ejecutor secuencial con compensación en orden
// inverso.
use crate::errors::SagaFailure;
use crate::step::{Compensation, SagaStep, StepEffect};
use log::{debug, error, warn};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Resultado de una ejecución completa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SagaReport {
    pub saga: String,
    pub run_id: Uuid,
    pub executed: Vec<String>,
    pub writes: usize,
}

pub struct Saga<C, E>
    where C: Send + Sync,
          E: Send
{
    name: String,
    steps: Vec<Box<dyn SagaStep<C, E>>>,
    compensation: Option<Box<dyn Compensation<C, E>>>,
}

impl<C, E> Saga<C, E>
    where C: Send + Sync,
          E: Send + fmt::Debug + fmt::Display
{
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), steps: Vec::new(), compensation: None }
    }

    /// Añade un paso al final.
    pub fn step<S>(mut self, step: S) -> Self
        where S: SagaStep<C, E> + 'static
    {
        self.steps.push(Box::new(step));
        self
    }

    /// Fija la compensación global.
    pub fn with_compensation<K>(mut self, compensation: K) -> Self
        where K: Compensation<C, E> + 'static
    {
        self.compensation = Some(Box::new(compensation));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Ejecuta los pasos en orden. Ante el primer error compensa si hubo
    /// alguna escritura y devuelve el error original.
    pub async fn run(&self, ctx: &mut C) -> Result<SagaReport, SagaFailure<E>> {
        let run_id = Uuid::new_v4();
        let mut executed = Vec::with_capacity(self.steps.len());
        let mut written = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            debug!("saga '{}' [{}]: paso '{}'", self.name, run_id, step.name());
            match step.execute(ctx).await {
                Ok(StepEffect::ReadOnly) => executed.push(step.name().to_string()),
                Ok(StepEffect::Wrote) => {
                    executed.push(step.name().to_string());
                    written.push(index);
                }
                Err(err) => {
                    warn!("saga '{}' [{}]: el paso '{}' falló: {}", self.name, run_id, step.name(), err);
                    let rolled_back = !written.is_empty();
                    let compensation_errors = if rolled_back {
                        self.compensate(run_id, ctx, &written).await
                    } else {
                        Vec::new()
                    };
                    return Err(SagaFailure { saga: self.name.clone(),
                                             run_id,
                                             step: step.name().to_string(),
                                             error: err,
                                             executed,
                                             rolled_back,
                                             compensation_errors });
                }
            }
        }
        debug!("saga '{}' [{}]: completada ({} escrituras)", self.name, run_id, written.len());
        Ok(SagaReport { saga: self.name.clone(), run_id, executed, writes: written.len() })
    }

    async fn compensate(&self, run_id: Uuid, ctx: &C, written: &[usize]) -> Vec<E> {
        let mut errors = Vec::new();
        for index in written.iter().rev() {
            let step = &self.steps[*index];
            if let Err(err) = step.compensate(ctx).await {
                error!("saga '{}' [{}]: compensación de '{}' fallida: {}", self.name, run_id, step.name(), err);
                errors.push(err);
            }
        }
        if let Some(compensation) = &self.compensation {
            if let Err(err) = compensation.compensate(ctx).await {
                error!("saga '{}' [{}]: compensación global fallida: {}", self.name, run_id, err);
                errors.push(err);
            }
        }
        errors
    }
}
