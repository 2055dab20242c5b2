//! Graph store backends.
//!
//! The loader talks to a store through [`GraphStore`]: batched parametrized
//! statements, idempotent uniqueness constraints and a full reset. Two
//! backends exist, chosen by endpoint scheme:
//!
//! - [`SurrealStore`] - SurrealDB over `ws://`, `wss://`, `http://`, `https://`,
//!   or embedded in memory with `mem://`
//! - [`Neo4jStore`] - Neo4j over `bolt://` or `neo4j://` (and their `+s`/`+ssc` variants)
//!
//! # Example
//!
//! ```ignore
//! use medgraph_core::store::{connect, GraphStore};
//!
//! let store = connect(&settings).await?;
//! store.delete_all().await?;
//! ```

mod dialect;
mod error;
mod neo4j;
mod surreal;

pub use dialect::{Dialect, BATCH_PARAM};
pub use error::StoreError;
pub use neo4j::Neo4jStore;
pub use surreal::SurrealStore;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::config::ConnectionSettings;
use crate::model::{Category, DiseaseRecord, NamePair, RelationKind, NATURAL_KEY};

/// One row of a batch: column name to value.
pub type Row = BTreeMap<String, String>;

/// Capabilities the loader needs from a graph database.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Query language used for statement templates.
    fn dialect(&self) -> Dialect;

    /// Execute a statement with `batch` bound to [`BATCH_PARAM`].
    async fn run(&self, statement: &str, batch: &[Row]) -> Result<(), StoreError>;

    /// Ensure `key` is unique within `category`. Succeeds if the constraint already exists.
    async fn ensure_unique_constraint(&self, category: Category, key: &str) -> Result<(), StoreError>;

    /// Delete every node and relationship.
    async fn delete_all(&self) -> Result<(), StoreError>;

    /// Number of nodes stored under a category.
    async fn count_nodes(&self, category: Category) -> Result<usize, StoreError>;

    /// Number of edges stored for a relation kind.
    async fn count_edges(&self, kind: RelationKind) -> Result<usize, StoreError>;
}

/// Backend selected by an endpoint's scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Neo4j,
    Surreal,
}

impl Backend {
    /// Pick the backend for an endpoint URL.
    pub fn for_endpoint(endpoint: &str) -> Result<Self, StoreError> {
        let scheme = endpoint
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .ok_or_else(|| StoreError::UnsupportedEndpoint(endpoint.to_string()))?;

        match scheme.as_str() {
            "bolt" | "bolt+s" | "bolt+ssc" | "neo4j" | "neo4j+s" | "neo4j+ssc" => Ok(Backend::Neo4j),
            "ws" | "wss" | "http" | "https" | "mem" => Ok(Backend::Surreal),
            _ => Err(StoreError::UnsupportedEndpoint(endpoint.to_string())),
        }
    }
}

/// Connect to the store named by the settings.
pub async fn connect(settings: &ConnectionSettings) -> Result<Box<dyn GraphStore>, StoreError> {
    match Backend::for_endpoint(&settings.endpoint)? {
        Backend::Neo4j => Ok(Box::new(Neo4jStore::connect(settings).await?)),
        Backend::Surreal => Ok(Box::new(SurrealStore::connect(settings).await?)),
    }
}

/// Row for an identity-only entity.
pub fn name_row(name: &str) -> Row {
    Row::from([(NATURAL_KEY.to_string(), name.to_string())])
}

/// Row for a disease and its attributes.
pub fn disease_row(disease: &DiseaseRecord) -> Row {
    let mut row = name_row(&disease.name);
    for (attr, value) in DiseaseRecord::ATTRIBUTES.iter().zip(disease.attributes()) {
        row.insert(attr.to_string(), value.to_string());
    }
    row
}

/// Row for one edge of a relation group.
pub fn pair_row(pair: &NamePair) -> Row {
    Row::from([
        ("source".to_string(), pair.source.clone()),
        ("target".to_string(), pair.target.clone()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_for_endpoint() {
        assert_eq!(Backend::for_endpoint("bolt://localhost:7687").unwrap(), Backend::Neo4j);
        assert_eq!(Backend::for_endpoint("neo4j+s://db.example.com").unwrap(), Backend::Neo4j);
        assert_eq!(Backend::for_endpoint("ws://localhost:8000").unwrap(), Backend::Surreal);
        assert_eq!(Backend::for_endpoint("HTTP://localhost:8000").unwrap(), Backend::Surreal);
        assert_eq!(Backend::for_endpoint("mem://").unwrap(), Backend::Surreal);
    }

    #[test]
    fn test_backend_rejects_unknown_scheme() {
        assert!(matches!(
            Backend::for_endpoint("ftp://example.com"),
            Err(StoreError::UnsupportedEndpoint(_))
        ));
        assert!(matches!(
            Backend::for_endpoint("localhost:7687"),
            Err(StoreError::UnsupportedEndpoint(_))
        ));
    }

    #[test]
    fn test_disease_row_has_every_attribute() {
        let mut flu = DiseaseRecord::named("Flu");
        flu.cure_probability = "90%".into();
        let row = disease_row(&flu);

        assert_eq!(row.len(), 1 + DiseaseRecord::ATTRIBUTES.len());
        assert_eq!(row["name"], "Flu");
        assert_eq!(row["cure_probability"], "90%");
        assert_eq!(row["summary"], "");
    }
}
