//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - Direct store access for aging reservations

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would leak host configuration into a test.
const STAYBOOK_ENV: &[&str] = &[
    "STAYBOOK_DATA_DIR",
    "STAYBOOK_BUSY_TIMEOUT",
    "STAYBOOK_GUEST",
    "STAYBOOK_LOG_MODE",
    "STAYBOOK_HOLD_TTL_HOURS",
    "STAYBOOK_SWEEP_INTERVAL_MINUTES",
    "STAYBOOK_MAXIMUM_LOCK_WAIT_SECONDS",
    "STAYBOOK_DISABLE_AUTOINIT",
    "STAYBOOK_OUTPUT_FORMAT",
];

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the staybook data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; staybook creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("staybook-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("staybook").expect("Failed to find staybook binary");
        for var in STAYBOOK_ENV {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Path to the store file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("staybook.db")
    }

    /// Add a listing at the given nightly price.
    pub fn add_listing(&self, id: &str, price: u64) {
        self.command()
            .args(["listing", "set", id, "--price", &price.to_string()])
            .assert()
            .success();
    }

    /// Reserve and return the reservation id printed on stdout.
    ///
    /// # Panics
    /// Panics if the reserve command fails.
    pub fn reserve(&self, listing: &str, guest: &str, start: &str, end: &str) -> String {
        let output = self
            .command()
            .args([
                "reserve", "--listing", listing, "--guest", guest, "--start", start, "--end", end,
            ])
            .output()
            .expect("Failed to run reserve command");

        assert!(
            output.status.success(),
            "Reserve failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }

    /// Run a command with the data directory set and return stdout.
    pub fn stdout(&self, args: &[&str]) -> String {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to run command");

        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }

    /// Move a reservation's creation time `hours` into the past.
    pub fn age_reservation(&self, id: &str, hours: i64) {
        let conn = rusqlite::Connection::open(self.db_path()).expect("Failed to open store");
        let changed = conn
            .execute(
                "UPDATE reservations \
                 SET created_at = created_at - ?1, updated_at = updated_at - ?1 \
                 WHERE id = ?2",
                rusqlite::params![hours * 3600, id],
            )
            .expect("Failed to age reservation");
        assert_eq!(changed, 1, "no reservation {id}");
    }

    /// Delete a reservation's invoice behind the engine's back.
    pub fn drop_invoice(&self, id: &str) {
        let conn = rusqlite::Connection::open(self.db_path()).expect("Failed to open store");
        conn.execute(
            "DELETE FROM invoices WHERE reservation_id = ?1",
            rusqlite::params![id],
        )
        .expect("Failed to delete invoice");
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
