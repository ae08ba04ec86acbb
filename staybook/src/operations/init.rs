//! Data directory initialization.
//!
//! Creates the data directory and the reservation store, and optionally a
//! commented configuration file.

use std::fs;
use std::path::PathBuf;

use crate::config::CONFIG_FILE_NAME;
use crate::database::DATABASE_FILE_NAME;
use crate::error::{Error, Result};
use crate::{Database, DatabaseConfig};

/// Options for initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing store.
    pub overwrite: bool,
    /// Write a default configuration file.
    pub create_config: bool,
}

impl InitOptions {
    /// Creates options for `data_dir` with nothing overwritten and no
    /// config file.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
        }
    }

    /// Sets whether an existing store is replaced.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether a default configuration file is written.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }
}

/// What initialization did.
#[derive(Debug)]
pub struct InitResult {
    /// The data directory did not exist and was created.
    pub data_dir_created: bool,
    /// The store was created or recreated.
    pub database_created: bool,
    /// A configuration file was written.
    pub config_created: bool,
    /// The data directory.
    pub data_dir: PathBuf,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r"# staybook configuration

# Pending reservations older than this are cancelled by the expiry sweep.
# expiry:
#   hold_ttl_hours: 24
#   sweep_interval_minutes: 60

# How long to wait for a locked store, in seconds (default: 5)
# maximum_lock_wait_seconds: 5

# Default output format for list commands: table, json or csv
# output_format: table
";

/// Initializes the data directory and reservation store.
///
/// # Errors
///
/// Returns an error if the directory or store cannot be created, the
/// config file cannot be written, or a store already exists and
/// `overwrite` is not set.
///
/// # Examples
///
/// ```no_run
/// use staybook::operations::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/staybook")).with_create_config(true);
/// let result = init_database(&options).unwrap();
/// assert!(result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::Validation {
                field: "database".into(),
                message: format!(
                    "store already exists at {}; use --overwrite to replace it",
                    db_path.display()
                ),
            });
        }
        fs::remove_file(&db_path)?;
        // WAL sidecars belong to the old store
        for suffix in ["-wal", "-shm"] {
            let sidecar = options
                .data_dir
                .join(format!("{DATABASE_FILE_NAME}{suffix}"));
            if sidecar.exists() {
                fs::remove_file(sidecar)?;
            }
        }
    }

    Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;
    log::info!("initialized store at {}", db_path.display());

    if options.create_config {
        let config_path = options.data_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use tempfile::TempDir;

    #[test]
    fn test_init_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("staybook");

        let result = init_database(&InitOptions::new(data_dir.clone())).unwrap();

        assert!(result.data_dir_created);
        assert!(result.database_created);
        assert!(!result.config_created);
        assert!(data_dir.join(DATABASE_FILE_NAME).exists());
    }

    #[test]
    fn test_init_existing_store_requires_overwrite() {
        let temp = TempDir::new().unwrap();
        let options = InitOptions::new(temp.path().to_path_buf());
        init_database(&options).unwrap();

        let err = init_database(&options).unwrap_err();
        assert!(format!("{err}").contains("--overwrite"));

        let result = init_database(&options.with_overwrite(true)).unwrap();
        assert!(!result.data_dir_created);
        assert!(result.database_created);
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let options = InitOptions::new(temp.path().to_path_buf()).with_create_config(true);

        let result = init_database(&options).unwrap();
        assert!(result.config_created);

        // The template is all comments, so it loads as an empty config
        let source = ConfigLoader::load_user_config(temp.path()).unwrap().unwrap();
        assert_eq!(source.config, crate::Config::default());
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "disable_autoinit: true\n").unwrap();

        let options = InitOptions::new(temp.path().to_path_buf()).with_create_config(true);
        let result = init_database(&options).unwrap();

        assert!(!result.config_created);
        assert_eq!(
            fs::read_to_string(config_path).unwrap(),
            "disable_autoinit: true\n"
        );
    }
}
