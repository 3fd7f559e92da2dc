// Archivo: messages.rs
// Propósito: traducir errores del backend a mensajes para el operario.
//
// Los códigos estructurados se buscan en un catálogo por idioma y sus
// variables (`{table}`, ...) se interpolan. Sin código, o con un código
// desconocido, se usa el mensaje genérico de la operación.
use crate::errors::{ApiError, NormalizedError};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "fr" | "fr-fr" => Ok(Locale::Fr),
            other => Err(format!("idioma no soportado: {}", other)),
        }
    }
}

/// Operación durante la que se produjo el error; elige el mensaje genérico.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Read,
    Export,
    Validate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Read => "read",
            Operation::Export => "export",
            Operation::Validate => "validate",
        };
        write!(f, "{}", s)
    }
}

fn fallback(operation: Operation, locale: Locale) -> &'static str {
    match (locale, operation) {
        (Locale::En, Operation::Create) => "Error creating data",
        (Locale::En, Operation::Update) => "Error updating data",
        (Locale::En, Operation::Delete) => "Error deleting data",
        (Locale::En, Operation::Read) => "Error loading data",
        (Locale::En, Operation::Export) => "Error exporting data",
        (Locale::En, Operation::Validate) => "Error validating the operation",
        (Locale::Fr, Operation::Create) => "Erreur lors de la création des données",
        (Locale::Fr, Operation::Update) => "Erreur lors de la mise à jour des données",
        (Locale::Fr, Operation::Delete) => "Erreur lors de la suppression des données",
        (Locale::Fr, Operation::Read) => "Erreur lors du chargement des données",
        (Locale::Fr, Operation::Export) => "Erreur lors de l'export des données",
        (Locale::Fr, Operation::Validate) => "Erreur lors de la validation de l'opération",
    }
}

fn catalogue(code: &str, locale: Locale) -> Option<&'static str> {
    let msg = match (code, locale) {
        ("FAPI_000001", Locale::En) => "This {table} already exists",
        ("FAPI_000001", Locale::Fr) => "Ce(tte) {table} existe déjà",
        ("FAPI_000002", Locale::En) => "This {table} is still referenced and cannot be deleted",
        ("FAPI_000002", Locale::Fr) => "Ce(tte) {table} est encore référencé(e) et ne peut pas être supprimé(e)",
        ("FAPI_000003", Locale::En) => "{table} not found",
        ("FAPI_000003", Locale::Fr) => "{table} introuvable",
        ("FAPI_000004", Locale::En) => "Insufficient stock in {table}",
        ("FAPI_000004", Locale::Fr) => "Stock insuffisant dans {table}",
        ("FAPI_000005", Locale::En) => "The transaction has already been rolled back",
        ("FAPI_000005", Locale::Fr) => "La transaction a déjà été annulée",
        _ => return None,
    };
    Some(msg)
}

/// Sustituye `{nombre}` por el valor de la variable correspondiente.
fn interpolate(template: &str, variables: &IndexMap<String, String>) -> String {
    let mut out = template.to_string();
    for (key, value) in variables {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// Mensaje legible para el operario.
pub fn user_message(err: &ApiError, operation: Operation, locale: Locale) -> String {
    match err.normalize() {
        NormalizedError::Structured { code, variables } => match catalogue(&code, locale) {
            Some(template) => interpolate(template, &variables),
            None => fallback(operation, locale).to_string(),
        },
        NormalizedError::Unstructured { .. } => fallback(operation, locale).to_string(),
    }
}

/// Cuerpo `{"error": {...}}` de las respuestas 500: el mensaje original
/// del error, su código y variables si los hay, y el texto traducido.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<IndexMap<String, String>>,
    pub user_message: String,
}

impl ErrorPayload {
    pub fn from_api_error(err: &ApiError, operation: Operation, locale: Locale) -> Self {
        let user_message = user_message(err, operation, locale);
        let message = err.to_string();
        match err.normalize() {
            NormalizedError::Structured { code, variables } => {
                Self { message,
                       code: Some(code),
                       variables: if variables.is_empty() { None } else { Some(variables) },
                       user_message }
            }
            NormalizedError::Unstructured { .. } => Self { message, code: None, variables: None, user_message },
        }
    }

    /// Error local (validación, paso inválido) con código propio.
    pub fn local(message: impl Into<String>, code: impl Into<String>) -> Self {
        let message = message.into();
        Self { user_message: message.clone(), message, code: Some(code.into()), variables: None }
    }
}
