//! Neo4j graph store.

use async_trait::async_trait;
use neo4rs::{query, BoltType, ConfigBuilder, Graph};
use std::collections::HashMap;

use super::{Dialect, GraphStore, Row, StoreError, BATCH_PARAM};
use crate::config::ConnectionSettings;
use crate::model::{Category, RelationKind};

/// Graph store backed by Neo4j over Bolt.
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect and verify the connection with a trivial query.
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, StoreError> {
        let config = ConfigBuilder::default()
            .uri(settings.endpoint.as_str())
            .user(settings.username.as_str())
            .password(settings.password.as_str())
            .db(settings.database.as_str())
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| StoreError::Connection(format!("{}: {}", settings.endpoint, e)))?;

        // The driver connects lazily; fail here rather than on the first batch.
        graph
            .run(query("RETURN 1"))
            .await
            .map_err(|e| StoreError::Connection(format!("{}: {}", settings.endpoint, e)))?;

        tracing::debug!(endpoint = %settings.endpoint, database = %settings.database, "connected to Neo4j");
        Ok(Self { graph })
    }

    async fn count(&self, statement: String) -> Result<usize, StoreError> {
        let mut result = self.graph.execute(query(&statement)).await?;
        let count = match result.next().await? {
            Some(row) => row
                .get::<i64>("count")
                .map_err(|e| StoreError::Database(e.to_string()))?,
            None => 0,
        };
        Ok(count as usize)
    }
}

/// Convert rows into Bolt maps.
fn bolt_rows(batch: &[Row]) -> Vec<HashMap<String, BoltType>> {
    batch
        .iter()
        .map(|row| {
            row.iter()
                .map(|(k, v)| (k.clone(), BoltType::from(v.as_str())))
                .collect()
        })
        .collect()
}

#[async_trait]
impl GraphStore for Neo4jStore {
    fn dialect(&self) -> Dialect {
        Dialect::Cypher
    }

    async fn run(&self, statement: &str, batch: &[Row]) -> Result<(), StoreError> {
        self.graph
            .run(query(statement).param(BATCH_PARAM, bolt_rows(batch)))
            .await?;
        Ok(())
    }

    async fn ensure_unique_constraint(&self, category: Category, key: &str) -> Result<(), StoreError> {
        let statement = self.dialect().unique_constraint(category, key)?;
        self.graph.run(query(&statement)).await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.graph.run(query(&self.dialect().delete_all())).await?;
        Ok(())
    }

    async fn count_nodes(&self, category: Category) -> Result<usize, StoreError> {
        self.count(self.dialect().count_nodes(category)).await
    }

    async fn count_edges(&self, kind: RelationKind) -> Result<usize, StoreError> {
        self.count(self.dialect().count_edges(kind)).await
    }
}
