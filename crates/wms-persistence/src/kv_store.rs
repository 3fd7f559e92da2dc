use crate::errors::PersistenceError;
use crate::schema;
use crate::schema::process_store::dsl as ps;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use flow::KeyValueStore;
use log::{debug, warn};
use std::sync::Arc;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

type DbPool = Pool<ConnectionManager<SqliteConnection>>;

const BUSY_TIMEOUT_MS: u32 = 5000;

/// URLs de SQLite en memoria: cada conexión sería una base distinta.
fn is_in_memory(database_url: &str) -> bool {
  database_url.trim() == ":memory:" || database_url.contains("mode=memory")
}

/// PRAGMAs aplicados a cada conexión que abre el pool.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
  wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    diesel::sql_query(format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS)).execute(conn)
                                                                           .map_err(diesel::r2d2::Error::QueryError)?;
    if self.wal {
      if let Err(e) = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(conn) {
        warn!("PRAGMA journal_mode: {}", e);
      }
    }
    Ok(())
  }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::process_store)]
struct ProcessRow {
  pub key: String,
  pub value: String,
  pub updated_at: i64,
}

/// Almacén clave/valor sobre SQLite. Cada proceso es una fila; escribir
/// reemplaza la fila completa.
#[derive(Clone)]
pub struct DieselKeyValueStore {
  pool: Arc<DbPool>,
}

impl DieselKeyValueStore {
  /// Abre (o crea) la base de datos y aplica las migraciones pendientes.
  ///
  /// Con `:memory:` el pool mantiene una única conexión que no caduca; si
  /// no, las migraciones y los datos quedarían en bases distintas.
  pub fn new(database_url: &str) -> Result<Self, PersistenceError> {
    let in_memory = is_in_memory(database_url);
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let builder = DbPool::builder().connection_customizer(Box::new(SqlitePragmas { wal: !in_memory }));
    let builder = if in_memory {
      builder.max_size(1).min_idle(Some(1)).idle_timeout(None).max_lifetime(None)
    } else {
      builder.max_size(4)
    };
    let pool = builder.build(manager)?;
    let store = DieselKeyValueStore { pool: Arc::new(pool) };
    store.conn()?
         .run_pending_migrations(MIGRATIONS)
         .map_err(|e| PersistenceError::Migration(e.to_string()))?;
    debug!("almacén de procesos abierto en {}", database_url);
    Ok(store)
  }

  fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, PersistenceError> {
    Ok(self.pool.get()?)
  }

  fn read(&self, k: &str) -> Result<Option<String>, PersistenceError> {
    let mut conn = self.conn()?;
    Ok(ps::process_store.filter(ps::key.eq(k))
                        .select(ps::value)
                        .first::<String>(&mut conn)
                        .optional()?)
  }

  fn write(&self, k: &str, v: &str) -> Result<(), PersistenceError> {
    let mut conn = self.conn()?;
    let row = ProcessRow { key: k.to_string(), value: v.to_string(), updated_at: Utc::now().timestamp_millis() };
    diesel::replace_into(ps::process_store).values(&row).execute(&mut conn)?;
    Ok(())
  }

  fn delete(&self, k: &str) -> Result<(), PersistenceError> {
    let mut conn = self.conn()?;
    diesel::delete(ps::process_store.filter(ps::key.eq(k))).execute(&mut conn)?;
    Ok(())
  }

  fn all_keys(&self) -> Result<Vec<String>, PersistenceError> {
    let mut conn = self.conn()?;
    Ok(ps::process_store.select(ps::key).order(ps::key.asc()).load::<String>(&mut conn)?)
  }
}

impl KeyValueStore for DieselKeyValueStore {
  fn get_raw(&self, key: &str) -> flow::Result<Option<String>> {
    Ok(self.read(key)?)
  }

  fn put_raw(&self, key: &str, value: &str) -> flow::Result<()> {
    Ok(self.write(key, value)?)
  }

  fn remove(&self, key: &str) -> flow::Result<()> {
    Ok(self.delete(key)?)
  }

  fn keys(&self) -> flow::Result<Vec<String>> {
    Ok(self.all_keys()?)
  }
}
