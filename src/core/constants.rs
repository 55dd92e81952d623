// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "DataflowEngine";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "dataflow-engine";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".dataflow-engine";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "dataflow-engine.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "DATAFLOW_ENGINE_CONFIG";

/// Subdirectory under the data dir where every accepted configuration load
/// is persisted as its own file, named by the caller or, when no name is
/// supplied, generated from the current UTC timestamp.
pub const CONFIG_FILES_SUBDIR: &str = "config_files";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "DATAFLOW_ENGINE_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "DATAFLOW_ENGINE_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "DATAFLOW_ENGINE_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "DATAFLOW_ENGINE_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5388;

/// Default body limit for API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "DATAFLOW_ENGINE_DATA_DIR";

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds (5 minutes)
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 300;
