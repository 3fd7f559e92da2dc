// Archivo: store.rs
// Propósito: `JsonProcessStore`, implementación de `ProcessStore` que guarda
// cada proceso como una cadena JSON bajo su nombre en cualquier
// `KeyValueStore`.
use crate::domain::Process;
use crate::errors::Result;
use crate::repository::{KeyValueStore, ProcessStore};
use log::warn;

/// Adaptador `ProcessStore` sobre un `KeyValueStore`.
pub struct JsonProcessStore<S>
    where S: KeyValueStore
{
    inner: S,
}

impl<S> JsonProcessStore<S> where S: KeyValueStore
{
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Acceso al almacén subyacente (inspección y pruebas).
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S> ProcessStore for JsonProcessStore<S> where S: KeyValueStore
{
    fn get(&self, process_name: &str) -> Process {
        let raw = match self.inner.get_raw(process_name) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Process::default(),
            Err(e) => {
                warn!("process store: lectura de '{}' fallida, se usa proceso vacío: {}", process_name, e);
                return Process::default();
            }
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => Process::from_json(&value),
            Err(e) => {
                warn!("process store: entrada '{}' malformada, se ignora: {}", process_name, e);
                Process::default()
            }
        }
    }

    fn set(&self, process_name: &str, process: &Process) -> Result<()> {
        let raw = serde_json::to_string(process)?;
        self.inner.put_raw(process_name, &raw)
    }

    fn delete(&self, process_name: &str) -> Result<()> {
        self.inner.remove(process_name)
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut keys = self.inner.keys()?;
        keys.sort();
        Ok(keys)
    }
}
