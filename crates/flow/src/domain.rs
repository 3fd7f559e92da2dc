// Archivo: domain.rs
// Propósito: tipos de dominio del almacén de procesos: `Process` (un flujo
// guiado en curso) y `StepEntry` (el registro de un paso). Incluye las
// transiciones puras (`enter`, `complete`, `back`) que el servicio aplica con
// lectura-modificación-escritura sobre el objeto completo.
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// Número de paso (10, 20, ...). El orden numérico es el orden del flujo.
pub type StepNumber = u32;

/// Datos producidos por un paso. Su forma es propia de cada paso y opaca
/// para el orquestador.
pub type StepData = Map<String, JsonValue>;

/// Clave del marcador de paso actual dentro del objeto serializado.
pub const CURRENT_STEP_KEY: &str = "currentStep";

/// Registro de un paso dentro de un `Process`.
///
/// - `previous_step`: paso al que vuelve "atrás" (permite saltar pasos
///   opcionales al retroceder).
/// - `data`: ausente hasta que el paso se completa.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_step: Option<StepNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StepData>,
}

impl StepEntry {
    /// Un paso está completo si y sólo si tiene `data`.
    pub fn is_complete(&self) -> bool {
        self.data.is_some()
    }
}

/// Estado persistido de un proceso guiado.
///
/// Se serializa como un objeto JSON plano: `{"currentStep": 10, "step10":
/// {...}}`. Claves desconocidas o entradas malformadas se ignoran al leer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Process {
    pub current_step: Option<StepNumber>,
    pub steps: BTreeMap<StepNumber, StepEntry>,
}

/// Construye la clave `stepN` usada en la representación serializada.
pub fn step_key(step: StepNumber) -> String {
    format!("step{}", step)
}

/// Extrae el número de paso de una clave `stepN`.
pub fn parse_step_key(key: &str) -> Option<StepNumber> {
    key.strip_prefix("step")?.parse().ok()
}

impl Process {
    pub fn is_empty(&self) -> bool {
        self.current_step.is_none() && self.steps.is_empty()
    }

    pub fn entry(&self, step: StepNumber) -> Option<&StepEntry> {
        self.steps.get(&step)
    }

    /// Datos de un paso completado.
    pub fn data(&self, step: StepNumber) -> Option<&StepData> {
        self.steps.get(&step).and_then(|e| e.data.as_ref())
    }

    pub fn is_complete(&self, step: StepNumber) -> bool {
        self.data(step).is_some()
    }

    /// Lee un campo concreto de los datos de un paso.
    pub fn field(&self, step: StepNumber, key: &str) -> Option<&JsonValue> {
        self.data(step).and_then(|d| d.get(key))
    }

    /// Llegada a un paso: si aún no tiene registro se anota desde qué paso
    /// se llegó y se mueve el marcador `current_step`.
    pub fn enter(&mut self, step: StepNumber) {
        if self.steps.contains_key(&step) {
            return;
        }
        let previous_step = self.current_step.filter(|cur| *cur != step);
        self.steps.insert(step, StepEntry { previous_step, data: None });
        self.current_step = Some(step);
    }

    /// Completa un paso con sus datos. Conserva el `previous_step` anotado a
    /// la llegada; si no hubo llegada explícita se toma el paso actual.
    pub fn complete(&mut self, step: StepNumber, data: StepData) {
        let arrived_from = self.current_step.filter(|cur| *cur != step);
        let entry = self.steps.entry(step).or_insert_with(|| StepEntry { previous_step: arrived_from, data: None });
        entry.data = Some(data);
        self.current_step = Some(step);
    }

    /// Retrocede desde `step`.
    ///
    /// Con `K = previous_step` del registro de `step` (o el paso actual si
    /// `step` aún no tiene registro), elimina `data` (no el registro) de
    /// todos los pasos numerados en `[K, step]` y deja
    /// `current_step = K`. Los pasos menores que `K` no se tocan. Si el paso
    /// no tiene predecesor anotado se limpia el proceso entero y se devuelve
    /// `None` (vuelta al inicio).
    pub fn back(&mut self, step: StepNumber) -> Option<StepNumber> {
        // sin registro (paso activo aún no anotado) se vuelve al paso actual
        let previous = match self.steps.get(&step) {
            Some(entry) => entry.previous_step,
            None => self.current_step.filter(|cur| *cur != step),
        };
        match previous {
            Some(k) => {
                let (lo, hi) = (k.min(step), k.max(step));
                for (_, entry) in self.steps.range_mut(lo..=hi) {
                    entry.data = None;
                }
                self.current_step = Some(k);
                Some(k)
            }
            None => {
                self.clear();
                None
            }
        }
    }

    /// Elimina todo el estado del proceso.
    pub fn clear(&mut self) {
        self.current_step = None;
        self.steps.clear();
    }

    /// Representación JSON persistida.
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        if let Some(cur) = self.current_step {
            map.insert(CURRENT_STEP_KEY.to_string(), JsonValue::from(cur));
        }
        for (step, entry) in &self.steps {
            // StepEntry sólo contiene tipos serializables sin fallo.
            let value = serde_json::to_value(entry).unwrap_or(JsonValue::Null);
            map.insert(step_key(*step), value);
        }
        JsonValue::Object(map)
    }

    /// Reconstruye un `Process` tolerando entradas ausentes o malformadas:
    /// lo que no se puede interpretar se descarta.
    pub fn from_json(value: &JsonValue) -> Process {
        let mut process = Process::default();
        let Some(map) = value.as_object() else {
            return process;
        };
        process.current_step = map.get(CURRENT_STEP_KEY)
                                  .and_then(|v| v.as_u64())
                                  .and_then(|v| StepNumber::try_from(v).ok());
        for (key, raw) in map {
            let Some(step) = parse_step_key(key) else { continue };
            if let Ok(entry) = serde_json::from_value::<StepEntry>(raw.clone()) {
                process.steps.insert(step, entry);
            }
        }
        process
    }
}

impl Serialize for Process {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Process {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Ok(Process::from_json(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(v: JsonValue) -> StepData {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn complete_first_step_on_empty_process() {
        let mut p = Process::default();
        p.complete(10, data(json!({"movement": {"id": "m1"}})));
        assert_eq!(p.to_json(), json!({"currentStep": 10, "step10": {"data": {"movement": {"id": "m1"}}}}));
    }

    #[test]
    fn enter_records_arrival_once() {
        let mut p = Process::default();
        p.complete(10, data(json!({"a": 1})));
        p.enter(20);
        p.enter(20);
        assert_eq!(p.entry(20).unwrap().previous_step, Some(10));
        assert_eq!(p.current_step, Some(20));
        assert!(!p.is_complete(20));
    }

    #[test]
    fn back_clears_range_and_keeps_entries() {
        let mut p = Process::default();
        p.complete(10, data(json!({"a": 1})));
        p.complete(20, data(json!({"b": 2})));
        p.complete(70, data(json!({"c": 3})));
        // 70 was reached from 20 (30..60 skipped)
        assert_eq!(p.entry(70).unwrap().previous_step, Some(20));
        assert_eq!(p.back(70), Some(20));
        assert!(p.is_complete(10));
        assert!(!p.is_complete(20));
        assert!(!p.is_complete(70));
        assert!(p.entry(70).is_some());
        assert_eq!(p.current_step, Some(20));
    }

    #[test]
    fn back_from_first_step_clears_everything() {
        let mut p = Process::default();
        p.complete(10, data(json!({"a": 1})));
        assert_eq!(p.back(10), None);
        assert!(p.is_empty());
    }

    #[test]
    fn from_json_ignores_garbage() {
        let p = Process::from_json(&json!({"currentStep": "x", "step10": 5, "step20": {"data": {"k": true}}, "other": 1}));
        assert_eq!(p.current_step, None);
        assert!(p.entry(10).is_none());
        assert!(p.is_complete(20));
        assert_eq!(Process::from_json(&json!([1, 2])), Process::default());
    }

    #[test]
    fn parse_step_keys() {
        assert_eq!(parse_step_key("step70"), Some(70));
        assert_eq!(parse_step_key("stepx"), None);
        assert_eq!(parse_step_key("currentStep"), None);
        assert_eq!(step_key(40), "step40");
    }
}
