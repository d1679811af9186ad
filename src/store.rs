// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! On-disk layout of the persistent index.
//!
//! One SQLite file, two tables kept in lockstep: `documents` holds metadata
//! and `documents_fts` holds the text, with `rowid = documents.id`.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

pub const SCHEMA: &str = "
    DROP TABLE IF EXISTS documents_fts;
    DROP TABLE IF EXISTS documents;
    CREATE TABLE documents (
        id INTEGER PRIMARY KEY,
        dataset INTEGER NOT NULL,
        filename TEXT NOT NULL,
        filepath TEXT NOT NULL,
        pages INTEGER NOT NULL,
        page_offsets TEXT
    );
    CREATE VIRTUAL TABLE documents_fts USING fts5(
        text,
        tokenize='porter unicode61'
    );
";

pub const SECONDARY_INDEXES: &str = "
    CREATE INDEX idx_documents_dataset ON documents(dataset);
    CREATE INDEX idx_documents_filename ON documents(filename);
";

pub const OPTIMIZE: &str = "INSERT INTO documents_fts(documents_fts) VALUES('optimize')";

pub const INSERT_DOCUMENT: &str = "INSERT INTO documents (id, dataset, filename, filepath, pages, page_offsets)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

pub const INSERT_TEXT: &str = "INSERT INTO documents_fts (rowid, text) VALUES (?1, ?2)";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open (creating if needed) a connection tuned for bulk loading.
pub fn open_writer(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA cache_size = -64000;",
    )?;
    Ok(conn)
}

/// Open an existing index for reading only.
pub fn open_reader(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// `path` with `suffix` appended to the file name (`search.db` -> `search.db-wal`).
pub fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Remove a database file and its WAL/shared-memory companions.
pub fn remove_database(path: &Path) -> io::Result<()> {
    for file in [path.to_path_buf(), sibling(path, "-wal"), sibling(path, "-shm")] {
        match fs::remove_file(&file) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
