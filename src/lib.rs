//! wms-flow: servidor HTTP de los workflows guiados del almacén
//!
//! Expone las sagas `validate*` y la API de procesos guiados sobre el
//! `WorkflowRunner` de `wms-workflow`.
pub mod config;
pub mod routes;
pub mod state;

pub use config::{AppConfig, ConfigError};
pub use routes::router;
pub use state::{AppState, ClientProvider, FixedClient};
