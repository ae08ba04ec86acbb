//! Transaction management utilities.
//!
//! This module provides transaction helpers for multi-statement operations.

use rusqlite::{Transaction, TransactionBehavior};

use crate::error::Result;

use super::connection::Database;

impl Database {
    /// Runs `f` inside an IMMEDIATE transaction and commits if it succeeds.
    ///
    /// IMMEDIATE takes the write lock up front, so reads made inside `f`
    /// cannot be invalidated by another writer before the commit. If `f`
    /// returns an error the transaction is rolled back.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a store error if the transaction cannot
    /// be started (including [`crate::Error::StoreUnavailable`] after the
    /// busy timeout) or committed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use staybook::database::{Database, DatabaseConfig};
    /// use staybook::ReservationId;
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/staybook.db")).unwrap();
    /// let found = db
    ///     .immediate(|tx| Database::get_reservation(tx, ReservationId::new()))
    ///     .unwrap();
    /// assert!(found.is_none());
    /// ```
    pub fn immediate<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
