// [libs/infra/store/src/client.rs]
/*!
 * =================================================================
 * APARATO: STORE CONNECTION CLIENT (ESTRATO L3)
 * RESPONSABILIDAD: GESTIÓN DE ENLACES Y PERSISTENCIA ACID
 *
 * El driver `libsql::Database` es el pool: cada repositorio abre una
 * `Connection` ligera por operación vía `get_connection`. En modo
 * `:memory:` se retiene un ancla viva para que el esquema sobreviva
 * entre conexiones (de lo contrario SQLite purga la base al cerrar la
 * última conexión).
 * =================================================================
 */

use libsql::{Builder, Connection, Database};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::errors::StoreError;
use crate::schema::apply_schema;

#[derive(Clone)]
pub struct Store {
    driver: Arc<Database>,
    _memory_anchor: Option<Arc<Connection>>,
}

impl Store {
    /// Opens (or creates) a local libsql database file at `path`, or an
    /// in-memory database when `path == ":memory:"`. Applies the schema
    /// before returning.
    #[instrument]
    pub async fn connect(path: &str) -> Result<Self, StoreError> {
        if path.is_empty() {
            return Err(StoreError::ConfigurationError);
        }

        info!("🔌 [STORE]: Opening database link at [{path}]");

        let is_memory = path == ":memory:" || path.contains("mode=memory");

        let driver = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        let driver = Arc::new(driver);
        let mut anchor = None;

        if is_memory {
            let anchor_conn = driver
                .connect()
                .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
            apply_schema(&anchor_conn).await?;
            anchor = Some(Arc::new(anchor_conn));
            info!("⚓ [STORE]: In-memory database anchored and schema applied.");
        } else {
            let bootstrap_conn = driver
                .connect()
                .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
            apply_schema(&bootstrap_conn).await?;
        }

        Ok(Self {
            driver,
            _memory_anchor: anchor,
        })
    }

    pub fn get_connection(&self) -> Result<Connection, StoreError> {
        self.driver.connect().map_err(|e| {
            error!("⚠️ [STORE]: connection allocation failed: {e}");
            StoreError::ConnectionError(e.to_string())
        })
    }
}
