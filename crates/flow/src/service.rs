// Archivo: service.rs
// Propósito: implementar `ProcessService`, la capa orquestadora que combina
// el almacén de procesos con la tabla de transiciones (entrar a un paso,
// completarlo, retroceder, reiniciar). Esta capa se invoca desde los
// runners de workflows y desde los handlers HTTP.
use crate::domain::{Process, StepData, StepNumber};
use crate::engine::{Decision, Resolution, TransitionTable};
use crate::errors::{FlowError, Result};
use crate::repository::ProcessStore;
use log::debug;
use std::sync::Arc;

/// Instantánea de un proceso junto con su resolución.
#[derive(Debug, Clone)]
pub struct ProcessView {
    pub name: String,
    pub process: Process,
    pub resolution: Resolution,
}

impl ProcessView {
    pub fn decision(&self) -> &Decision {
        &self.resolution.decision
    }

    pub fn is_completed(&self) -> bool {
        self.resolution.decision == Decision::Completed
    }
}

/// Servicio de alto nivel sobre procesos guiados.
///
/// Cada operación lee el proceso completo, lo modifica y lo vuelve a
/// escribir (última escritura gana). Tras escribir, la resolución se
/// recalcula para devolver el nuevo paso activo.
pub struct ProcessService<S>
    where S: ProcessStore + ?Sized
{
    store: Arc<S>,
    table: Arc<TransitionTable>,
}

impl<S> Clone for ProcessService<S> where S: ProcessStore + ?Sized
{
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), table: self.table.clone() }
    }
}

impl<S> ProcessService<S> where S: ProcessStore + ?Sized
{
    /// Crea el servicio inyectando el almacén y la tabla de transiciones.
    pub fn new(store: Arc<S>, table: Arc<TransitionTable>) -> Self {
        Self { store, table }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn build_view(&self, name: &str, process: Process) -> ProcessView {
        let resolution = self.table.resolve(&process);
        ProcessView { name: name.to_string(), process, resolution }
    }

    fn ensure_known(&self, step: StepNumber) -> Result<()> {
        if self.table.contains(step) {
            Ok(())
        } else {
            Err(FlowError::NotFound(format!("paso {}", step)))
        }
    }

    fn ensure_active(&self, name: &str, process: &Process, step: StepNumber) -> Result<()> {
        self.ensure_known(step)?;
        match self.table.next_step(process) {
            Decision::Active(active) if active == step => Ok(()),
            other => Err(FlowError::InvalidStep(format!("el paso {} no está activo en '{}' ({:?})", step, name, other))),
        }
    }

    /// Estado actual del proceso y paso activo.
    pub fn view(&self, name: &str) -> ProcessView {
        let process = self.store.get(name);
        self.build_view(name, process)
    }

    /// Registra la llegada al paso activo.
    pub fn enter(&self, name: &str, step: StepNumber) -> Result<ProcessView> {
        let mut process = self.store.get(name);
        self.ensure_active(name, &process, step)?;
        process.enter(step);
        self.store.set(name, &process)?;
        Ok(self.build_view(name, process))
    }

    /// Completa el paso activo con sus datos y devuelve la nueva resolución.
    pub fn submit(&self, name: &str, step: StepNumber, data: StepData) -> Result<ProcessView> {
        let mut process = self.store.get(name);
        self.ensure_active(name, &process, step)?;
        process.complete(step, data);
        self.store.set(name, &process)?;
        debug!("process '{}': paso {} completado", name, step);
        Ok(self.build_view(name, process))
    }

    /// Retrocede desde `step`, que debe ser el paso activo o el actual.
    pub fn back(&self, name: &str, step: StepNumber) -> Result<ProcessView> {
        self.ensure_known(step)?;
        let mut process = self.store.get(name);
        let active = self.table.next_step(&process).active_step();
        if active != Some(step) && process.current_step != Some(step) {
            return Err(FlowError::InvalidStep(format!("no se puede retroceder desde el paso {} en '{}'", step, name)));
        }
        match process.back(step) {
            Some(target) => {
                self.store.set(name, &process)?;
                debug!("process '{}': retroceso de {} a {}", name, step, target);
            }
            None => {
                self.store.delete(name)?;
                debug!("process '{}': retroceso al inicio", name);
            }
        }
        Ok(self.build_view(name, process))
    }

    /// Quita los datos de un paso ya completado para que vuelva a ser el
    /// activo (por ejemplo, tras un fallo al validar el proceso).
    pub fn reopen(&self, name: &str, step: StepNumber) -> Result<ProcessView> {
        self.ensure_known(step)?;
        let mut process = self.store.get(name);
        if let Some(entry) = process.steps.get_mut(&step) {
            entry.data = None;
        }
        self.store.set(name, &process)?;
        Ok(self.build_view(name, process))
    }

    /// Elimina el proceso.
    pub fn reset(&self, name: &str) -> Result<()> {
        self.store.delete(name)
    }
}
