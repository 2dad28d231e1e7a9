// ABOUTME: RAII transaction guard for multi-statement SQLite writes
// ABOUTME: Rolls back automatically unless commit() is reached
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Online Academy

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Owns an open transaction; dropping it without `commit` rolls back
pub struct SqliteTransactionGuard {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqliteTransactionGuard {
    /// Wrap a freshly begun transaction
    #[must_use]
    pub const fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Connection to run statements on
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction was already committed
    pub fn executor(&mut self) -> AppResult<&mut SqliteConnection> {
        self.tx
            .as_mut()
            .map(|tx| &mut **tx)
            .ok_or_else(|| AppError::internal("Transaction already finished"))
    }

    /// Commit all statements
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails or the transaction already finished
    pub async fn commit(mut self) -> AppResult<()> {
        let tx = self
            .tx
            .take()
            .ok_or_else(|| AppError::internal("Transaction already finished"))?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {e}")))
    }
}

impl Drop for SqliteTransactionGuard {
    fn drop(&mut self) {
        if self.tx.is_some() {
            // sqlx queues the ROLLBACK when the transaction is dropped
            debug!("Transaction dropped without commit, rolling back");
        }
    }
}
