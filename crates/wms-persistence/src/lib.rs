//! Persistencia SQLite (Diesel + r2d2) del almacén de procesos guiados.
//!
//! Expone `DieselKeyValueStore`, que implementa `flow::KeyValueStore`; el
//! formato de los procesos lo sigue decidiendo `flow::JsonProcessStore`
//! (opcionalmente envuelto en `flow::SealedStore`).

mod errors;
mod kv_store;
pub mod schema;

pub use errors::PersistenceError;
pub use kv_store::{DieselKeyValueStore, MIGRATIONS};

/// Variables consultadas, en orden, para la URL de la base de datos.
pub const STORE_URL_VARS: [&str; 2] = ["WMS_STORE_URL", "DATABASE_URL"];

/// URL de la base de datos: la primera de `STORE_URL_VARS` que tenga valor.
pub fn store_url_from<F>(get: F) -> Option<String>
  where F: Fn(&str) -> Option<String>
{
  STORE_URL_VARS.iter()
                .filter_map(|key| get(*key))
                .map(|url| url.trim().to_string())
                .find(|url| !url.is_empty())
}
