//! # Tabula Engine
//!
//! Record-to-column projection and a forward-only cursor over schemaless,
//! nested records as returned by a remote tabular-data API.
//!
//! The remote client and the outer data-access surface live elsewhere. This
//! crate takes a fully fetched list of records and turns it into something a
//! relational caller can walk row by row and read column by column.
//!
//! ## Design Principles
//!
//! - **No IO**: records arrive fully materialized; nothing here fetches
//! - **Read-only**: every mutation entry point reports [`Error::Unsupported`]
//! - **Stable schema**: columns are discovered once, from the first record
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! Upstream records arrive shaped as `{id, createdTime, fields: {...}}`. A
//! [`Record`] keeps the fields in arrival order, each holding a tagged
//! [`FieldValue`].
//!
//! ### Schema Discovery
//!
//! The [`SchemaDiscoverer`] walks the first record and assigns dense, 1-based
//! column positions. The reserved wrapper field (`fields`) is flattened so its
//! inner keys become columns; other nested mappings stay opaque.
//!
//! ### Cursor
//!
//! The [`Cursor`] starts before the first row and moves with
//! [`Cursor::advance`]. Columns are read by position or by name, untyped via
//! [`Cursor::get_value`] or through the loose and strict typed accessors.
//!
//! ## Quick Start
//!
//! ```rust
//! use tabula_engine::{records_from_json, Config, Cursor, StatementHandle};
//! use serde_json::json;
//!
//! // 1. Parse a fetched list response
//! let response = json!({
//!     "records": [
//!         {"id": "rec1", "createdTime": "2024-02-01T10:00:00.000Z",
//!          "fields": {"Name": "Ada", "Age": 36}},
//!         {"id": "rec2", "createdTime": "2024-02-02T10:00:00.000Z",
//!          "fields": {"Name": "Grace", "Age": 45}}
//!     ]
//! });
//! let config = Config::default();
//! let records = records_from_json(response, &config).unwrap();
//!
//! // 2. Open a cursor
//! let mut cursor = Cursor::with_config(records, StatementHandle::new(), config);
//! assert_eq!(cursor.metadata().column_count(), 4);
//!
//! // 3. Walk the rows
//! let mut names = Vec::new();
//! while cursor.advance() {
//!     names.push(cursor.get_string("Name").unwrap().unwrap_or_default());
//! }
//! assert_eq!(names, vec!["Ada", "Grace"]);
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod metadata;
pub mod record;
pub mod schema;
pub mod statement;
pub mod value;

// Re-export main types at crate root
pub use config::{Config, ConfigError};
pub use cursor::{AdvancedType, ColumnRef, Concurrency, Cursor, CursorType, FetchDirection};
pub use error::Error;
pub use metadata::{Nullability, ResultMetadata};
pub use record::{records_from_json, Record};
pub use schema::{Column, DiscoveryObserver, Schema, SchemaDiscoverer, TracingObserver};
pub use statement::{Statement, StatementHandle};
pub use value::{FieldValue, FromFieldValue, ValueType};

/// Type aliases for clarity
pub type ColumnName = String;
pub type ColumnPosition = usize;
