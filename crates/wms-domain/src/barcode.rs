// barcode.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Código leído por el escáner. Nunca vacío; se guarda sin espacios en los
/// extremos.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Barcode(String);

impl Barcode {
  pub fn parse(raw: &str) -> Result<Self, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(DomainError::ValidationError("el código de barras no puede estar vacío".to_string()));
    }
    if trimmed.chars().any(|c| c.is_control()) {
      return Err(DomainError::ValidationError(format!("código de barras con caracteres inválidos: {:?}", trimmed)));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Barcode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Barcode {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trims_and_rejects_empty() {
    assert_eq!(Barcode::parse("  PAL-001 ").unwrap().as_str(), "PAL-001");
    assert!(Barcode::parse("   ").is_err());
    assert!(Barcode::parse("A\u{7}B").is_err());
  }
}
