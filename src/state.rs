// Archivo: state.rs
// Propósito: estado compartido del servidor. Construye el almacén de
// procesos según la configuración y entrega, por petición, un `WmsApi`
// con el token del operario.
use crate::config::AppConfig;
use flow::{InMemoryKeyValueStore, JsonProcessStore, ProcessStore, SealedStore};
use log::info;
use std::sync::Arc;
use wms_graphql::{ApiError, GraphqlClient, HttpGraphqlClient, Locale, WmsApi};
use wms_persistence::{DieselKeyValueStore, PersistenceError};
use wms_workflow::{WorkflowError, WorkflowFactory, WorkflowRunner};

/// Fuente de clientes GraphQL ligados a un token.
pub trait ClientProvider: Send + Sync {
  fn client(&self, token: Option<String>) -> Arc<dyn GraphqlClient>;
}

impl ClientProvider for HttpGraphqlClient {
  fn client(&self, token: Option<String>) -> Arc<dyn GraphqlClient> {
    Arc::new(self.with_token(token))
  }
}

/// Siempre el mismo cliente, sea cual sea el token. Útil en pruebas.
pub struct FixedClient(pub Arc<dyn GraphqlClient>);

impl ClientProvider for FixedClient {
  fn client(&self, _token: Option<String>) -> Arc<dyn GraphqlClient> {
    self.0.clone()
  }
}

#[derive(Clone)]
pub struct AppState {
  pub runner: WorkflowRunner<dyn ProcessStore>,
  pub clients: Arc<dyn ClientProvider>,
  pub locale: Locale,
}

impl AppState {
  pub fn new(store: Arc<dyn ProcessStore>, clients: Arc<dyn ClientProvider>, locale: Locale) -> Result<Self, WorkflowError> {
    let runner = WorkflowRunner::new(store, WorkflowFactory::new()?);
    Ok(Self { runner, clients, locale })
  }

  /// Estado completo a partir de la configuración: cliente HTTP y almacén.
  pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
    let http = HttpGraphqlClient::new(config.graphql_url.clone(), config.graphql_timeout)
      .map_err(|e: ApiError| anyhow::anyhow!("no se pudo crear el cliente GraphQL: {}", e))?;
    let store = open_store(config)?;
    Ok(Self::new(store, Arc::new(http), config.locale)?)
  }

  pub fn api(&self, token: Option<String>) -> WmsApi {
    WmsApi::new(self.clients.client(token))
  }
}

/// SQLite si hay URL, en memoria si no; sellado cuando hay secreto.
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn ProcessStore>, PersistenceError> {
  let store: Arc<dyn ProcessStore> = match (&config.store_url, &config.store_secret) {
    (Some(url), Some(secret)) => {
      info!("almacén de procesos: SQLite sellado en {}", url);
      Arc::new(JsonProcessStore::new(SealedStore::new(DieselKeyValueStore::new(url)?, secret)))
    }
    (Some(url), None) => {
      info!("almacén de procesos: SQLite en {}", url);
      Arc::new(JsonProcessStore::new(DieselKeyValueStore::new(url)?))
    }
    (None, Some(secret)) => {
      info!("almacén de procesos: memoria (sellado)");
      Arc::new(JsonProcessStore::new(SealedStore::new(InMemoryKeyValueStore::new(), secret)))
    }
    (None, None) => {
      info!("almacén de procesos: memoria");
      Arc::new(JsonProcessStore::new(InMemoryKeyValueStore::new()))
    }
  };
  Ok(store)
}
