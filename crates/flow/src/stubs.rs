// Archivo: stubs.rs
// Propósito: implementaciones en memoria para pruebas y wiring rápido.
//
// Estas implementaciones no son durables: se pierden al terminar el proceso
// y se usan para demos, pruebas locales o como respaldo cuando no se
// configura una base de datos.
use crate::errors::Result;
use crate::repository::KeyValueStore;
use crate::store::JsonProcessStore;
use dashmap::DashMap;

/// Almacén clave/valor en memoria.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: DashMap<String, String>,
}

impl InMemoryKeyValueStore {
    /// Crea un almacén vacío.
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.iter().map(|e| e.key().clone()).collect())
    }
}

/// Almacén de procesos en memoria (JSON sobre `InMemoryKeyValueStore`).
pub type InMemoryProcessStore = JsonProcessStore<InMemoryKeyValueStore>;

impl Default for InMemoryProcessStore {
    fn default() -> Self {
        JsonProcessStore::new(InMemoryKeyValueStore::new())
    }
}
