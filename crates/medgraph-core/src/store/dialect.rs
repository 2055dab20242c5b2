//! Statement templates per query language.
//!
//! Labels, tables and edge types cannot be bound as parameters, so they are
//! written into the statement text. Every such identifier comes from the
//! closed [`Category`] and [`RelationKind`] enumerations; row values always
//! travel through the `$batch` parameter.

use crate::model::{Category, DiseaseRecord, RelationKind, Signature, NATURAL_KEY};

use super::StoreError;

/// Name of the parameter holding a batch of rows.
pub const BATCH_PARAM: &str = "batch";

/// Query language spoken by a store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Neo4j / openCypher.
    Cypher,
    /// SurrealDB's SurrealQL.
    SurrealQl,
}

impl Dialect {
    /// Upsert identity-only entities of one category; rows carry `name`.
    pub fn entity_upsert(&self, category: Category) -> String {
        match self {
            Dialect::Cypher => format!(
                "UNWIND ${batch} AS row\nMERGE (n:`{label}` {{{key}: row.{key}}})",
                batch = BATCH_PARAM,
                label = category.label(),
                key = NATURAL_KEY,
            ),
            Dialect::SurrealQl => format!(
                "FOR $row IN ${batch} {{\n    UPSERT type::thing('{table}', $row.{key}) SET {key} = $row.{key};\n}};",
                batch = BATCH_PARAM,
                table = category.table(),
                key = NATURAL_KEY,
            ),
        }
    }

    /// Upsert diseases, overwriting all six attributes; rows carry `name` and every attribute.
    pub fn disease_upsert(&self) -> String {
        let category = Category::Disease;
        match self {
            Dialect::Cypher => {
                let assignments = DiseaseRecord::ATTRIBUTES
                    .iter()
                    .map(|a| format!("{a}: row.{a}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "UNWIND ${batch} AS row\nMERGE (n:`{label}` {{{key}: row.{key}}})\nSET n += {{{assignments}}}",
                    batch = BATCH_PARAM,
                    label = category.label(),
                    key = NATURAL_KEY,
                )
            }
            Dialect::SurrealQl => {
                let assignments = std::iter::once(NATURAL_KEY)
                    .chain(DiseaseRecord::ATTRIBUTES)
                    .map(|a| format!("{a} = $row.{a}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "FOR $row IN ${batch} {{\n    UPSERT type::thing('{table}', $row.{key}) SET {assignments};\n}};",
                    batch = BATCH_PARAM,
                    table = category.table(),
                    key = NATURAL_KEY,
                )
            }
        }
    }

    /// Merge edges of one signature; rows carry `source` and `target` names.
    ///
    /// Both endpoints must already exist; rows whose endpoints are missing
    /// create nothing. Re-running never duplicates an edge.
    pub fn relation_merge(&self, signature: &Signature) -> String {
        match self {
            Dialect::Cypher => format!(
                "UNWIND ${batch} AS row\n\
                 MATCH (a:`{source}` {{{key}: row.source}})\n\
                 MATCH (b:`{target}` {{{key}: row.target}})\n\
                 MERGE (a)-[:`{edge}`]->(b)",
                batch = BATCH_PARAM,
                source = signature.source.label(),
                target = signature.target.label(),
                edge = signature.kind.label(),
                key = NATURAL_KEY,
            ),
            Dialect::SurrealQl => format!(
                "FOR $row IN ${batch} {{\n\
                 \x20   LET $a = type::thing('{source}', $row.source);\n\
                 \x20   LET $b = type::thing('{target}', $row.target);\n\
                 \x20   IF record::exists($a) AND record::exists($b) AND array::len((SELECT id FROM {edge} WHERE in = $a AND out = $b)) = 0 {{\n\
                 \x20       RELATE $a->{edge}->$b;\n\
                 \x20   }};\n\
                 }};",
                batch = BATCH_PARAM,
                source = signature.source.table(),
                target = signature.target.table(),
                edge = signature.kind.table(),
            ),
        }
    }

    /// Idempotently declare `key` unique within a category.
    pub fn unique_constraint(&self, category: Category, key: &str) -> Result<String, StoreError> {
        if !is_identifier(key) {
            return Err(StoreError::Database(format!(
                "invalid key attribute '{key}' for {category}"
            )));
        }
        Ok(match self {
            Dialect::Cypher => format!(
                "CREATE CONSTRAINT `{name}` IF NOT EXISTS FOR (n:`{label}`) REQUIRE n.`{key}` IS UNIQUE",
                name = constraint_name(category, key),
                label = category.label(),
            ),
            Dialect::SurrealQl => format!(
                "DEFINE INDEX IF NOT EXISTS {name} ON TABLE {table} FIELDS {key} UNIQUE;",
                name = constraint_name(category, key),
                table = category.table(),
            ),
        })
    }

    /// Remove every node and edge of the graph.
    pub fn delete_all(&self) -> String {
        match self {
            Dialect::Cypher => "MATCH (n) DETACH DELETE n".to_string(),
            // Edges first so no dangling in/out pointers remain mid-statement.
            Dialect::SurrealQl => RelationKind::ALL
                .iter()
                .map(|k| k.table())
                .chain(Category::ALL.iter().map(|c| c.table()))
                .map(|table| format!("DELETE {table};"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Count the nodes of one category; yields a single `count` column.
    pub fn count_nodes(&self, category: Category) -> String {
        match self {
            Dialect::Cypher => format!("MATCH (n:`{}`) RETURN count(n) AS count", category.label()),
            Dialect::SurrealQl => format!("SELECT count() FROM {} GROUP ALL", category.table()),
        }
    }

    /// Count the edges of one relation kind; yields a single `count` column.
    pub fn count_edges(&self, kind: RelationKind) -> String {
        match self {
            Dialect::Cypher => format!("MATCH ()-[r:`{}`]->() RETURN count(r) AS count", kind.label()),
            Dialect::SurrealQl => format!("SELECT count() FROM {} GROUP ALL", kind.table()),
        }
    }
}

fn constraint_name(category: Category, key: &str) -> String {
    format!("{}_{}_unique", category.table(), key)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
