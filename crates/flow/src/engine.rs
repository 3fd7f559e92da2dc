// Archivo: engine.rs
// Propósito: tabla de transiciones declarativa y resolución del "siguiente
// paso".
//
// La resolución es una función pura de un `Process`: no escribe nada, de
// modo que evaluarla dos veces con la misma instantánea produce el mismo
// resultado. Las reglas de salto se evalúan de nuevo en cada resolución y
// deben depender sólo de datos de pasos ya completados.
use crate::domain::{Process, StepNumber};
use crate::errors::{FlowError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Bound;
use std::sync::Arc;

/// Predicado de salto. `Some(true)` salta el paso, `Some(false)` lo muestra
/// y `None` indica que faltan datos previos para decidir (falla cerrado).
pub type Guard = Arc<dyn Fn(&Process) -> Option<bool> + Send + Sync>;

/// Regla de salto de un paso: si `guard` se cumple el flujo continúa en
/// `next_on_skip`.
#[derive(Clone)]
pub struct SkipRule {
    pub guard: Guard,
    pub next_on_skip: StepNumber,
}

impl fmt::Debug for SkipRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipRule").field("next_on_skip", &self.next_on_skip).finish()
    }
}

/// Definición de un paso dentro de la tabla.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    pub number: StepNumber,
    pub name: String,
    /// Prerequisitos adicionales (además del paso previo en el camino).
    pub requires: Vec<StepNumber>,
    pub skip: Option<SkipRule>,
}

impl StepDefinition {
    pub fn new(number: StepNumber, name: impl Into<String>) -> Self {
        Self { number, name: name.into(), requires: Vec::new(), skip: None }
    }

    /// Declara prerequisitos explícitos.
    pub fn requires(mut self, steps: &[StepNumber]) -> Self {
        self.requires.extend_from_slice(steps);
        self
    }

    /// Declara una regla de salto hacia `next_on_skip`.
    pub fn skip_when<F>(mut self, next_on_skip: StepNumber, guard: F) -> Self
        where F: Fn(&Process) -> Option<bool> + Send + Sync + 'static
    {
        self.skip = Some(SkipRule { guard: Arc::new(guard), next_on_skip });
        self
    }
}

/// Motivo por el que la resolución no puede ofrecer un paso.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockReason {
    /// La regla de salto no pudo decidir por falta de datos previos.
    GuardUndecided,
    /// Falta `data` en un prerequisito explícito.
    MissingPrerequisite(StepNumber),
}

/// Resultado de decidir el siguiente paso.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Único paso que debe mostrarse.
    Active(StepNumber),
    /// Ningún paso puede mostrarse todavía.
    Blocked { step: StepNumber, reason: BlockReason },
    /// Todos los pasos del camino están completos.
    Completed,
}

impl Decision {
    pub fn active_step(&self) -> Option<StepNumber> {
        match self {
            Decision::Active(step) => Some(*step),
            _ => None,
        }
    }
}

/// Estado de un paso recorrido durante la resolución.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    Completed,
    Skipped,
}

/// Resultado completo de la resolución: la decisión y el camino recorrido
/// hasta ella.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub decision: Decision,
    pub path: Vec<(StepNumber, PathStatus)>,
}

impl Resolution {
    /// Pasos completados en el camino, en orden.
    pub fn completed_steps(&self) -> impl Iterator<Item = StepNumber> + '_ {
        self.path.iter().filter(|(_, s)| *s == PathStatus::Completed).map(|(n, _)| *n)
    }

    pub fn was_skipped(&self, step: StepNumber) -> bool {
        self.path.iter().any(|(n, s)| *n == step && *s == PathStatus::Skipped)
    }
}

/// Tabla de transiciones validada y ordenada por número de paso.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    steps: BTreeMap<StepNumber, StepDefinition>,
}

impl TransitionTable {
    /// Construye la tabla validando su coherencia.
    pub fn new(definitions: Vec<StepDefinition>) -> Result<Self> {
        if definitions.is_empty() {
            return Err(FlowError::InvalidDefinition("la tabla no tiene pasos".into()));
        }
        let mut steps = BTreeMap::new();
        for def in definitions {
            let number = def.number;
            if steps.insert(number, def).is_some() {
                return Err(FlowError::InvalidDefinition(format!("paso {} repetido", number)));
            }
        }
        for def in steps.values() {
            if let Some(rule) = &def.skip {
                if rule.next_on_skip <= def.number || !steps.contains_key(&rule.next_on_skip) {
                    return Err(FlowError::InvalidDefinition(format!("el paso {} salta a {}, que no es un paso posterior \
                                                                     de la tabla",
                                                                    def.number, rule.next_on_skip)));
                }
            }
            for req in &def.requires {
                if *req >= def.number || !steps.contains_key(req) {
                    return Err(FlowError::InvalidDefinition(format!("el paso {} requiere {}, que no es un paso \
                                                                     anterior de la tabla",
                                                                    def.number, req)));
                }
            }
        }
        Ok(Self { steps })
    }

    pub fn first_step(&self) -> StepNumber {
        // la tabla nunca está vacía (validado en `new`)
        self.steps.keys().next().copied().unwrap_or_default()
    }

    pub fn last_step(&self) -> StepNumber {
        self.steps.keys().next_back().copied().unwrap_or_default()
    }

    pub fn contains(&self, step: StepNumber) -> bool {
        self.steps.contains_key(&step)
    }

    pub fn definition(&self, step: StepNumber) -> Option<&StepDefinition> {
        self.steps.get(&step)
    }

    pub fn steps(&self) -> impl Iterator<Item = &StepDefinition> {
        self.steps.values()
    }

    fn next_after(&self, step: StepNumber) -> Option<StepNumber> {
        self.steps.range((Bound::Excluded(step), Bound::Unbounded)).next().map(|(n, _)| *n)
    }

    /// Recorre la tabla desde el primer paso y decide el único paso activo.
    ///
    /// En cada paso se evalúa primero la regla de salto; si no se salta y
    /// ya tiene `data` se continúa con el siguiente en orden; si no, se
    /// comprueban sus prerequisitos y se devuelve como activo.
    pub fn resolve(&self, process: &Process) -> Resolution {
        let mut path = Vec::new();
        let mut cursor = Some(self.first_step());
        while let Some(step) = cursor {
            let Some(def) = self.steps.get(&step) else { break };
            if let Some(rule) = &def.skip {
                match (rule.guard)(process) {
                    Some(true) => {
                        path.push((step, PathStatus::Skipped));
                        cursor = Some(rule.next_on_skip);
                        continue;
                    }
                    Some(false) => {}
                    None => {
                        return Resolution { decision: Decision::Blocked { step, reason: BlockReason::GuardUndecided },
                                            path };
                    }
                }
            }
            if process.is_complete(step) {
                path.push((step, PathStatus::Completed));
                cursor = self.next_after(step);
                continue;
            }
            if let Some(missing) = def.requires.iter().find(|r| !process.is_complete(**r)) {
                return Resolution { decision: Decision::Blocked { step,
                                                                  reason: BlockReason::MissingPrerequisite(*missing) },
                                    path };
            }
            return Resolution { decision: Decision::Active(step), path };
        }
        Resolution { decision: Decision::Completed, path }
    }

    /// Atajo de `resolve` que sólo devuelve la decisión.
    pub fn next_step(&self, process: &Process) -> Decision {
        self.resolve(process).decision
    }
}
