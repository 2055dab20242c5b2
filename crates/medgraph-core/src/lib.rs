//! Bulk importer turning a medical record corpus into a typed property graph.
//!
//! The pipeline is strictly sequential:
//!
//! 1. [`parser`] decodes one JSON record per line into [`model::Fact`]s
//! 2. [`aggregate`] deduplicates entities and relations
//! 3. [`group`] partitions relations by signature
//! 4. [`loader`] writes everything to a [`store::GraphStore`] in fixed-width batches
//!
//! [`pipeline::Importer`] ties the stages together.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod group;
pub mod loader;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod progress;
pub mod store;

pub use aggregate::{Aggregate, Aggregator};
pub use config::{Config, ConfigError, ConfigOverrides, ConnectionSettings};
pub use error::ImportError;
pub use group::{group_relations, RelationGroups};
pub use loader::{BulkLoader, LoadError, LoadReport, RetryPolicy};
pub use model::{Category, DiseaseRecord, Entity, Fact, Relation, RelationKind, Signature};
pub use parser::{ParseStats, RecordParser};
pub use pipeline::{ImportReport, Importer, PreparedImport};
pub use progress::{NoProgress, ProgressSink};
pub use store::{connect, GraphStore, StoreError};
