//! wms-graphql: cliente del backend GraphQL del almacén
//!
//! - `client`: contrato `GraphqlClient` y su implementación HTTP.
//! - `crud`: acceso genérico list/detail/create/update/delete/export por
//!   entidad.
//! - `operations`: operaciones concretas (`WmsApi`) usadas por las sagas y
//!   los pasos de los workflows.
//! - `errors` / `messages`: normalización de errores y mensajes para el
//!   usuario.
//! - `stubs`: cliente simulado con respuestas programadas para pruebas.
pub mod client;
pub mod crud;
pub mod errors;
pub mod messages;
pub mod operations;
pub mod stubs;

pub use client::{GraphqlClient, GraphqlRequest, HttpGraphqlClient};
pub use crud::{EntityClient, EntityModel, ListPage, ListResult};
pub use errors::{ApiError, GraphqlErrorItem, NormalizedError};
pub use messages::{user_message, ErrorPayload, Locale, Operation};
pub use operations::WmsApi;
pub use stubs::MockGraphqlClient;
