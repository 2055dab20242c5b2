//! Batched loading of aggregated entities and relations into a graph store.
//!
//! Loading runs in three strictly ordered steps:
//!
//! 1. a uniqueness constraint on the natural key for every populated category
//! 2. entity upserts, one statement per chunk of at most `batch_width` rows
//! 3. relation merges, one statement per chunk of each signature group
//!
//! All entity chunks complete before the first relation chunk is submitted,
//! since relation statements match their endpoints by name.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

use crate::aggregate::Aggregate;
use crate::group::RelationGroups;
use crate::model::{Category, Signature, NATURAL_KEY};
use crate::progress::{NoProgress, ProgressSink};
use crate::store::{disease_row, name_row, pair_row, GraphStore, Row, StoreError};

/// Errors raised while loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A chunk was rejected by the store.
    #[error("Batch {batch} of {target} failed: {source}")]
    Batch {
        /// Category or relation signature being loaded.
        target: String,
        /// Zero-based chunk index within the target.
        batch: usize,
        #[source]
        source: StoreError,
    },
}

/// How often a failed chunk is resubmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total submissions per chunk, including the first.
    pub attempts: u32,
    /// Wait before the first retry; doubles after each further failure.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Submit each chunk exactly once.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self { attempts, backoff }
    }

    fn delay(&self, failed_attempts: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(failed_attempts.saturating_sub(1)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// What a load wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entities submitted per category.
    pub entities: BTreeMap<Category, usize>,
    /// Relation pairs submitted per signature.
    pub relations: BTreeMap<Signature, usize>,
    /// Statements submitted successfully, entity and relation chunks combined.
    pub batches: usize,
    /// Constraint failures that were tolerated.
    pub constraint_warnings: Vec<String>,
}

impl LoadReport {
    pub fn total_entities(&self) -> usize {
        self.entities.values().sum()
    }

    pub fn total_relations(&self) -> usize {
        self.relations.values().sum()
    }
}

/// Loads an [`Aggregate`] and its relation groups into a [`GraphStore`].
pub struct BulkLoader<'a, S: GraphStore + ?Sized> {
    store: &'a S,
    batch_width: usize,
    retry: RetryPolicy,
    progress: &'a dyn ProgressSink,
}

impl<'a, S: GraphStore + ?Sized> BulkLoader<'a, S> {
    /// Create a loader submitting at most `batch_width` rows per statement.
    ///
    /// A width of zero is treated as one.
    pub fn new(store: &'a S, batch_width: usize) -> Self {
        Self {
            store,
            batch_width: batch_width.max(1),
            retry: RetryPolicy::default(),
            progress: &NoProgress,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = progress;
        self
    }

    pub fn store(&self) -> &'a S {
        self.store
    }

    pub fn batch_width(&self) -> usize {
        self.batch_width
    }

    /// Run all three load steps.
    pub async fn load(&self, aggregate: &Aggregate, groups: &RelationGroups) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::default();

        self.ensure_constraints(&aggregate.categories(), &mut report).await;
        self.load_entities(aggregate, &mut report).await?;
        self.load_relations(groups, &mut report).await?;

        tracing::info!(
            entities = report.total_entities(),
            relations = report.total_relations(),
            batches = report.batches,
            "load complete"
        );
        Ok(report)
    }

    /// Create a natural-key uniqueness constraint per category.
    ///
    /// Failures are logged and recorded, never fatal: upserts stay correct
    /// without the index, only slower.
    pub async fn ensure_constraints(&self, categories: &[Category], report: &mut LoadReport) {
        self.progress.stage_started("constraints", categories.len() as u64);
        for &category in categories {
            if let Err(e) = self.store.ensure_unique_constraint(category, NATURAL_KEY).await {
                tracing::warn!(%category, error = %e, "could not create uniqueness constraint");
                report
                    .constraint_warnings
                    .push(format!("{}: {}", category, e));
            }
            self.progress.advance(1);
        }
        self.progress.stage_finished();
    }

    /// Upsert every entity, diseases first.
    pub async fn load_entities(&self, aggregate: &Aggregate, report: &mut LoadReport) -> Result<(), LoadError> {
        let dialect = self.store.dialect();

        for category in aggregate.categories() {
            let (statement, rows): (String, Vec<Row>) = match category {
                Category::Disease => (
                    dialect.disease_upsert(),
                    aggregate.diseases.iter().map(disease_row).collect(),
                ),
                other => (
                    dialect.entity_upsert(other),
                    aggregate.names(other).iter().map(|n| name_row(n)).collect(),
                ),
            };

            let target = category.to_string();
            self.submit_all(&target, &statement, &rows, report).await?;
            report.entities.insert(category, rows.len());
            tracing::info!(%category, count = rows.len(), "entities loaded");
        }
        Ok(())
    }

    /// Merge every relation group.
    pub async fn load_relations(&self, groups: &RelationGroups, report: &mut LoadReport) -> Result<(), LoadError> {
        let dialect = self.store.dialect();

        for (signature, pairs) in groups {
            if pairs.is_empty() {
                continue;
            }
            let statement = dialect.relation_merge(signature);
            let rows: Vec<Row> = pairs.iter().map(pair_row).collect();

            let target = signature.to_string();
            self.submit_all(&target, &statement, &rows, report).await?;
            report.relations.insert(*signature, rows.len());
            tracing::info!(%signature, count = rows.len(), "relations loaded");
        }
        Ok(())
    }

    async fn submit_all(
        &self,
        target: &str,
        statement: &str,
        rows: &[Row],
        report: &mut LoadReport,
    ) -> Result<(), LoadError> {
        self.progress.stage_started(target, rows.len() as u64);

        for (index, chunk) in rows.chunks(self.batch_width).enumerate() {
            self.submit_chunk(statement, chunk)
                .await
                .map_err(|source| LoadError::Batch {
                    target: target.to_string(),
                    batch: index,
                    source,
                })?;
            report.batches += 1;
            tracing::debug!(stage = %target, batch = index, rows = chunk.len(), "batch submitted");
            self.progress.advance(chunk.len() as u64);
        }

        self.progress.stage_finished();
        Ok(())
    }

    async fn submit_chunk(&self, statement: &str, chunk: &[Row]) -> Result<(), StoreError> {
        let attempts = self.retry.attempts.max(1);
        let mut failed = 0;
        loop {
            match self.store.run(statement, chunk).await {
                Ok(()) => return Ok(()),
                Err(e) if failed + 1 < attempts => {
                    failed += 1;
                    let delay = self.retry.delay(failed);
                    tracing::warn!(attempt = failed, error = %e, ?delay, "batch failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
