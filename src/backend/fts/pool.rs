// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Read-only connection pool.
//!
//! A call checks a connection out, uses it, and puts it back. Concurrent
//! calls never share one; when the pool is empty a fresh connection is opened.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::Connection;

use crate::store;

pub(crate) struct ReadPool {
    path: PathBuf,
    idle: Mutex<Vec<Connection>>,
    max_idle: usize,
}

impl ReadPool {
    /// Opens one connection up front so a bad path fails here, not on first query.
    pub fn open(path: &Path, max_idle: usize) -> rusqlite::Result<Self> {
        let first = store::open_reader(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            idle: Mutex::new(vec![first]),
            max_idle: max_idle.max(1),
        })
    }

    pub fn with<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> rusqlite::Result<T> {
        let conn = self.checkout()?;
        let result = f(&conn);
        self.checkin(conn);
        result
    }

    #[cfg(test)]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn checkout(&self) -> rusqlite::Result<Connection> {
        let pooled = self.idle.lock().pop();
        match pooled {
            Some(conn) => Ok(conn),
            None => store::open_reader(&self.path),
        }
    }

    fn checkin(&self, conn: Connection) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(conn);
        }
    }
}
