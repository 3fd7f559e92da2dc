// Archivo: repository.rs
// Propósito: definir el trait `ProcessStore` y el trait auxiliar de bajo
// nivel `KeyValueStore`. Describe el contrato que deben implementar las
// persistencias (SQLite, en memoria, etc.).
use crate::domain::Process;
use crate::errors::Result;

/// Almacén durable de procesos guiados, indexado por nombre de proceso.
///
/// Semántica última-escritura-gana: no hay fusión. Quien llama debe leer el
/// objeto completo, modificarlo y volver a escribirlo.
pub trait ProcessStore: Send + Sync {
    /// Devuelve el proceso existente o uno vacío. Nunca falla: entradas
    /// ausentes, ilegibles o malformadas se tratan como vacías.
    fn get(&self, process_name: &str) -> Process;

    /// Persiste el objeto completo.
    fn set(&self, process_name: &str, process: &Process) -> Result<()>;

    /// Elimina todo el estado del proceso.
    fn delete(&self, process_name: &str) -> Result<()>;

    /// Nombres de los procesos almacenados.
    fn list(&self) -> Result<Vec<String>>;
}

/// Almacén clave/valor de cadenas sobre el que se serializan los procesos.
pub trait KeyValueStore: Send + Sync {
    /// Lee el valor crudo asociado a `key`.
    fn get_raw(&self, key: &str) -> Result<Option<String>>;
    /// Escribe (o reemplaza) el valor asociado a `key`.
    fn put_raw(&self, key: &str, value: &str) -> Result<()>;
    /// Borra `key`. Borrar una clave inexistente no es un error.
    fn remove(&self, key: &str) -> Result<()>;
    /// Todas las claves presentes.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        (**self).get_raw(key)
    }
    fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        (**self).put_raw(key, value)
    }
    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}
