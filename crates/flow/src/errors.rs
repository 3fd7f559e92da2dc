// Archivo: errors.rs
// Propósito: definir los errores del almacén de procesos y del orquestador
// de pasos, y el alias Result<T> usado por las APIs del crate.
use thiserror::Error;

/// Errores comunes del dominio de procesos guiados.
///
/// - `NotFound`: entidad no encontrada.
/// - `InvalidStep`: se intentó operar sobre un paso que no es el activo.
/// - `InvalidDefinition`: tabla de transiciones mal construida.
/// - `Storage`: error al acceder al almacenamiento.
/// - `Other`: cualquier otro error.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Entidad no encontrada (por ejemplo, un paso fuera de la tabla).
    #[error("No encontrado: {0}")]
    NotFound(String),
    /// El paso no puede recibir la operación en el estado actual.
    #[error("Paso inválido: {0}")]
    InvalidStep(String),
    /// Definición de flujo inconsistente (números repetidos, saltos hacia
    /// atrás, prerequisitos inexistentes).
    #[error("Definición inválida: {0}")]
    InvalidDefinition(String),
    /// Error genérico de almacenamiento (BD, clave/valor, etc.).
    #[error("Error de almacenamiento: {0}")]
    Storage(String),
    /// Error de serialización del proceso.
    #[error("Error de serialización: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Otro tipo de error.
    #[error("Otro: {0}")]
    Other(String),
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, FlowError>;
