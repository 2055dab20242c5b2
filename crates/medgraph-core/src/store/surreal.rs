//! SurrealDB graph store.

use async_trait::async_trait;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

use super::{Dialect, GraphStore, Row, StoreError, BATCH_PARAM};
use crate::config::ConnectionSettings;
use crate::model::{Category, RelationKind};

/// Graph store backed by SurrealDB.
///
/// Each category is a table keyed by `type::thing(table, name)`, so the
/// record id doubles as the natural key. Relations are graph edges created
/// with `RELATE`.
pub struct SurrealStore {
    db: Surreal<Any>,
}

impl SurrealStore {
    /// Connect, sign in as root for remote endpoints, and select namespace and database.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, StoreError> {
        let db = any::connect(settings.endpoint.as_str())
            .await
            .map_err(|e| StoreError::Connection(format!("{}: {}", settings.endpoint, e)))?;

        // Embedded engines run without authentication.
        if !settings.endpoint.starts_with("mem://") {
            db.signin(Root {
                username: &settings.username,
                password: &settings.password,
            })
            .await
            .map_err(|e| StoreError::Connection(format!("sign-in failed: {}", e)))?;
        }

        db.use_ns(settings.namespace.as_str())
            .use_db(settings.database.as_str())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::debug!(
            endpoint = %settings.endpoint,
            namespace = %settings.namespace,
            database = %settings.database,
            "connected to SurrealDB"
        );
        Ok(Self { db })
    }

    async fn count(&self, statement: String) -> Result<usize, StoreError> {
        #[derive(serde::Deserialize)]
        struct CountResult {
            count: i64,
        }

        let result: Option<CountResult> = self.db.query(statement).await?.take(0)?;
        Ok(result.map(|r| r.count as usize).unwrap_or(0))
    }
}

#[async_trait]
impl GraphStore for SurrealStore {
    fn dialect(&self) -> Dialect {
        Dialect::SurrealQl
    }

    async fn run(&self, statement: &str, batch: &[Row]) -> Result<(), StoreError> {
        self.db
            .query(statement)
            .bind((BATCH_PARAM, batch.to_vec()))
            .await?
            .check()?;
        Ok(())
    }

    async fn ensure_unique_constraint(&self, category: Category, key: &str) -> Result<(), StoreError> {
        let statement = self.dialect().unique_constraint(category, key)?;
        self.db.query(statement).await?.check()?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.db.query(self.dialect().delete_all()).await?.check()?;
        Ok(())
    }

    async fn count_nodes(&self, category: Category) -> Result<usize, StoreError> {
        self.count(self.dialect().count_nodes(category)).await
    }

    async fn count_edges(&self, kind: RelationKind) -> Result<usize, StoreError> {
        self.count(self.dialect().count_edges(kind)).await
    }
}
