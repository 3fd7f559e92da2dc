//! wms-domain: entidades del almacén tal como las devuelve el backend
//! GraphQL (unidades de manipulación, contenidos, ubicaciones, artículos,
//! movimientos) y las peticiones de las operaciones transaccionales.
//!
//! Los tipos se serializan en camelCase para coincidir con el esquema
//! remoto. Las validaciones locales (`validate`) se ejecutan antes de
//! cualquier llamada de red.
mod article;
mod barcode;
mod domain_stubs;
mod errors;
mod handling_unit;
mod location;
mod movement;
mod requests;

pub use article::{Article, FeatureCode};
pub use barcode::Barcode;
pub use domain_stubs::DomainStubs;
pub use errors::DomainError;
pub use handling_unit::{HandlingUnit, HandlingUnitContent, HandlingUnitContentFeature, HandlingUnitModel};
pub use location::Location;
pub use movement::{movement_status, Movement};
pub use requests::{check_quantity, FeatureInput, MovementValidationRequest, PalletizationRequest,
                   ReturnReceptionRequest, SubstitutionRequest};
