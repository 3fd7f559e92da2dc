// Archivo: stubs.rs
// Propósito: `MockGraphqlClient`, cliente simulado para pruebas. Las
// respuestas se programan por nombre de operación (en cola, en orden) y
// cada petición recibida se registra.
use crate::client::{GraphqlClient, GraphqlRequest};
use crate::errors::ApiError;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

type Scripted = Result<JsonValue, ApiError>;

#[derive(Default)]
pub struct MockGraphqlClient {
    responses: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    calls: Arc<Mutex<Vec<GraphqlRequest>>>,
}

fn lock<'a, T>(m: &'a Mutex<T>, name: &str) -> Result<MutexGuard<'a, T>, ApiError> {
    m.lock().map_err(|e| ApiError::Transport(format!("Mutex '{}' poisoned: {}", name, e)))
}

impl MockGraphqlClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encola el objeto `data` que devolverá la siguiente llamada a
    /// `operation`.
    pub fn respond(&self, operation: &str, data: JsonValue) -> &Self {
        self.push(operation, Ok(data))
    }

    /// Encola un error para la siguiente llamada a `operation`.
    pub fn fail(&self, operation: &str, error: ApiError) -> &Self {
        self.push(operation, Err(error))
    }

    fn push(&self, operation: &str, scripted: Scripted) -> &Self {
        if let Ok(mut map) = lock(&self.responses, "responses") {
            map.entry(operation.to_string()).or_default().push_back(scripted);
        }
        self
    }

    /// Peticiones recibidas, en orden.
    pub fn calls(&self) -> Vec<GraphqlRequest> {
        lock(&self.calls, "calls").map(|c| c.clone()).unwrap_or_default()
    }

    /// Nombres de operación recibidos, en orden.
    pub fn operation_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.operation_name).collect()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<GraphqlRequest> {
        self.calls().into_iter().filter(|c| c.operation_name == operation).collect()
    }

    /// Respuestas programadas que nadie consumió.
    pub fn pending(&self) -> usize {
        lock(&self.responses, "responses").map(|m| m.values().map(VecDeque::len).sum()).unwrap_or(0)
    }
}

#[async_trait]
impl GraphqlClient for MockGraphqlClient {
    async fn execute(&self, request: GraphqlRequest) -> Result<JsonValue, ApiError> {
        let operation = request.operation_name.clone();
        lock(&self.calls, "calls")?.push(request);
        let next = lock(&self.responses, "responses")?.get_mut(&operation).and_then(VecDeque::pop_front);
        match next {
            Some(scripted) => scripted,
            None => Err(ApiError::Transport(format!("sin respuesta programada para '{}'", operation))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn scripted_responses_are_consumed_in_order() {
        let mock = MockGraphqlClient::new();
        mock.respond("op", json!({"op": 1})).respond("op", json!({"op": 2}));
        let req = GraphqlRequest::new("op", "query op { op }", json!({}));
        assert_eq!(mock.execute(req.clone()).await.unwrap(), json!({"op": 1}));
        assert_eq!(mock.execute(req.clone()).await.unwrap(), json!({"op": 2}));
        assert!(mock.execute(req).await.is_err());
        assert_eq!(mock.operation_names(), vec!["op", "op", "op"]);
        assert_eq!(mock.pending(), 0);
    }
}
