use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enum para identificar los tipos de workflow que soporta el crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowType {
  Pack,
  MovementToProcess,
  #[default]
  Unknown,
}

impl WorkflowType {
  pub const ALL: [WorkflowType; 2] = [WorkflowType::Pack, WorkflowType::MovementToProcess];
}

impl fmt::Display for WorkflowType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      WorkflowType::Pack => "pack",
      WorkflowType::MovementToProcess => "movementToProcess",
      WorkflowType::Unknown => "unknown",
    };
    write!(f, "{}", s)
  }
}

impl FromStr for WorkflowType {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().replace(['-', '_'], "").as_str() {
      "pack" => Ok(WorkflowType::Pack),
      "movementtoprocess" => Ok(WorkflowType::MovementToProcess),
      _ => Ok(WorkflowType::Unknown),
    }
  }
}
