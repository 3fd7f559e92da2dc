//! Crate `flow`: almacén de procesos guiados y orquestación de pasos
//!
//! Este crate define los tipos de dominio (`Process`, `StepEntry`), el
//! contrato de persistencia `ProcessStore` (y el de bajo nivel
//! `KeyValueStore`), implementaciones en memoria útiles para pruebas
//! (`InMemoryKeyValueStore`, `InMemoryProcessStore`), la tabla de
//! transiciones declarativa (`TransitionTable`) y el servicio
//! `ProcessService` que combina ambos.
//!
//! Diseño resumido:
//! - Un proceso se guarda entero bajo su nombre; escribir reemplaza el objeto
//!   completo (última escritura gana).
//! - El siguiente paso se decide con una función pura sobre el proceso, de
//!   modo que se puede probar sin ninguna interfaz.
//! - Las reglas de salto fallan cerrado: si no pueden decidir, el paso
//!   dependiente no se muestra ni se salta.
//!
//! Ejemplo rápido:
//! ```rust
//! use flow::{InMemoryProcessStore, ProcessService, StepDefinition, TransitionTable};
//! use std::sync::Arc;
//! let table = TransitionTable::new(vec![StepDefinition::new(10, "scan"), StepDefinition::new(20, "confirm")]).unwrap();
//! let service = ProcessService::new(Arc::new(InMemoryProcessStore::default()), Arc::new(table));
//! let view = service.view("pack");
//! assert_eq!(view.decision().active_step(), Some(10));
//! ```
pub mod domain;
pub mod engine;
pub mod errors;
pub mod repository;
pub mod sealed;
pub mod service;
pub mod store;
pub mod stubs;

pub use domain::*;
pub use engine::*;
pub use errors::*;
pub use repository::*;
pub use sealed::*;
pub use service::*;
pub use store::*;
pub use stubs::*;
