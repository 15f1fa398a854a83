//! Configuration for the persisted backend and for a migration pass.
//!
//! Both types use the builder pattern via `typed-builder`.

use crate::error::{PrefsError, PrefsResult};
use std::path::PathBuf;
use typed_builder::TypedBuilder;

/// Configuration for the sled-backed preference database.
///
/// # Examples
///
/// ```
/// use pref_migrator::config::SledConfig;
///
/// // Create with defaults
/// let config = SledConfig::builder()
///     .path("settings.db")
///     .build();
/// assert!(config.create_if_missing);
///
/// // Customize options
/// let config = SledConfig::builder()
///     .path("/data/settings.db")
///     .cache_capacity_bytes(1024 * 1024)
///     .flush_every_ms(None)
///     .build();
/// assert_eq!(config.cache_capacity_bytes, 1024 * 1024);
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct SledConfig {
    /// Directory holding the sled database
    #[builder(setter(into))]
    pub path: PathBuf,

    /// Delete the database when it is dropped
    #[builder(default = false)]
    pub temporary: bool,

    /// Page cache size in bytes
    #[builder(default = 8 * 1024 * 1024)]
    pub cache_capacity_bytes: u64,

    /// Whether to create the database if it doesn't exist
    #[builder(default = true)]
    pub create_if_missing: bool,

    /// Background flush interval; `None` leaves durability to explicit flushes
    #[builder(default = Some(500))]
    pub flush_every_ms: Option<u64>,
}

impl SledConfig {
    /// Create a basic configuration with just a path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self::builder().path(path).build()
    }

    /// Configuration for a database that disappears when dropped
    pub fn temp() -> Self {
        Self::builder()
            .path(PathBuf::new())
            .temporary(true)
            .build()
    }

    pub fn validate(&self) -> PrefsResult<()> {
        if self.temporary {
            return Ok(());
        }
        if self.path.as_os_str().is_empty() {
            return Err(PrefsError::InvalidConfig(
                "a persistent database needs a path".to_string(),
            ));
        }
        if !self.create_if_missing && !self.path.exists() {
            return Err(PrefsError::InvalidConfig(format!(
                "{} does not exist and create_if_missing is false",
                self.path.display()
            )));
        }
        Ok(())
    }
}

/// Options for one migration pass.
///
/// # Examples
///
/// ```
/// use pref_migrator::config::MigrationOptions;
///
/// let options = MigrationOptions::default();
/// assert!(!options.dry_run);
/// assert!(options.flush);
///
/// let preview = MigrationOptions::builder().dry_run(true).build();
/// assert!(preview.dry_run);
/// ```
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct MigrationOptions {
    /// Plan and report every change without touching the stores
    #[builder(default = false)]
    pub dry_run: bool,

    /// Flush all three stores once the pass completes
    #[builder(default = true)]
    pub flush: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}
