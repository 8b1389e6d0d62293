//! Engine-wide constants.

/// Chunk size used when streaming a buffer into a storage entry: 1 MiB.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Upper bound on `name (n).ext` candidates probed by auto-rename.
pub const MAX_RENAME_ATTEMPTS: u32 = 1000;

/// Platform version assumed when none is configured.
pub const DEFAULT_PLATFORM_VERSION: u32 = 34;

/// Extension used for custom files that arrive without one.
pub const DEFAULT_EXTENSION: &str = "bin";

/// Mime type used for custom files that arrive without one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Prefix of on-disk files that have been created but not finalized.
pub const PENDING_PREFIX: &str = ".pending-";
