//! Default values for medgraph configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file name.
pub const DEFAULT_CONFIG_FILE: &str = "medgraph.json";

/// Directory under the user config dir holding `config.json`.
pub const USER_CONFIG_DIR: &str = "medgraph";

/// File name of the user-level config.
pub const USER_CONFIG_FILE: &str = "config.json";

// ============================================================================
// Connection Defaults
// ============================================================================

/// Default database name.
pub const DEFAULT_DATABASE: &str = "neo4j";

/// Default namespace (SurrealDB only).
pub const DEFAULT_NAMESPACE: &str = "medgraph";

// ============================================================================
// Import Defaults
// ============================================================================

/// Default input record file.
pub const DEFAULT_INPUT: &str = "data/medical.json";

/// Default number of rows per submitted batch.
pub const DEFAULT_BATCH_SIZE: usize = 3000;

// ============================================================================
// Environment Variables
// ============================================================================

pub const ENV_ENDPOINT: &str = "MEDGRAPH_ENDPOINT";
pub const ENV_USER: &str = "MEDGRAPH_USER";
pub const ENV_PASSWORD: &str = "MEDGRAPH_PASSWORD";
pub const ENV_DATABASE: &str = "MEDGRAPH_DATABASE";
pub const ENV_INPUT: &str = "MEDGRAPH_INPUT";
pub const ENV_BATCH_SIZE: &str = "MEDGRAPH_BATCH_SIZE";
