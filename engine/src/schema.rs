//! Column schema discovery.
//!
//! Records carry no declared schema, so columns are discovered from the first
//! record of a result set. The upstream API wraps the logical row under a
//! reserved key (`fields` by default); that wrapper is flattened so its inner
//! keys become columns, while any other nested mapping stays a single opaque
//! column.

use crate::{ColumnName, ColumnPosition, Config, FieldValue, Record, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A discovered column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// 1-based position, dense across the schema
    pub position: ColumnPosition,
    /// Field name the column reads from
    pub name: ColumnName,
    /// Type observed in the sample record
    pub value_type: ValueType,
}

/// Ordered column schema with a reverse name index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
    /// Last-write-wins: a repeated name maps to its highest position
    by_name: HashMap<ColumnName, ColumnPosition>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: &str, value_type: ValueType) -> &Column {
        let position = self.columns.len() + 1;
        self.by_name.insert(name.to_string(), position);
        self.columns.push(Column {
            position,
            name: name.to_string(),
            value_type,
        });
        &self.columns[position - 1]
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// All columns in position order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get a column by 1-based position.
    pub fn column(&self, position: ColumnPosition) -> Option<&Column> {
        position
            .checked_sub(1)
            .and_then(|index| self.columns.get(index))
    }

    /// Resolve a name to its position.
    pub fn position_of(&self, name: &str) -> Option<ColumnPosition> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, position: ColumnPosition) -> Option<&str> {
        self.column(position).map(|c| c.name.as_str())
    }

    pub fn type_of(&self, position: ColumnPosition) -> Option<ValueType> {
        self.column(position).map(|c| c.value_type)
    }
}

/// Hook notified while a schema is being discovered.
pub trait DiscoveryObserver {
    /// A column was assigned. `depth` is 0 for top-level fields.
    fn column_assigned(&self, _column: &Column, _depth: usize) {}

    /// A wrapper mapping was found at the depth limit and kept opaque.
    fn depth_limit_reached(&self, _key: &str, _depth: usize) {}
}

/// Observer that reports discovery through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DiscoveryObserver for TracingObserver {
    fn column_assigned(&self, column: &Column, depth: usize) {
        tracing::debug!(
            position = column.position,
            name = %column.name,
            value_type = %column.value_type,
            depth,
            "discovered column"
        );
    }

    fn depth_limit_reached(&self, key: &str, depth: usize) {
        tracing::warn!(key, depth, "wrapper nesting too deep, keeping mapping opaque");
    }
}

/// Walks a sample record and produces its column schema.
pub struct SchemaDiscoverer<'a> {
    wrapper_field: &'a str,
    max_depth: usize,
    observer: &'a dyn DiscoveryObserver,
}

impl<'a> SchemaDiscoverer<'a> {
    /// Create a discoverer using the config's wrapper name and depth bound.
    pub fn new(config: &'a Config) -> Self {
        Self {
            wrapper_field: &config.wrapper_field,
            max_depth: config.max_depth,
            observer: &TracingObserver,
        }
    }

    /// Replace the default tracing observer.
    pub fn with_observer(mut self, observer: &'a dyn DiscoveryObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Discover the schema of a result set from its first record.
    ///
    /// `None` (an empty result set) yields an empty schema.
    pub fn discover(&self, sample: Option<&Record>) -> Schema {
        let mut schema = Schema::new();
        if let Some(record) = sample {
            self.walk(record, 0, &mut schema);
        }
        schema
    }

    fn walk(&self, record: &Record, depth: usize, schema: &mut Schema) {
        for (key, value) in record.iter() {
            if key == self.wrapper_field {
                if let FieldValue::Map(inner) = value {
                    if depth < self.max_depth {
                        self.walk(inner, depth + 1, schema);
                        continue;
                    }
                    self.observer.depth_limit_reached(key, depth);
                }
            }

            let column = schema.push(key, value.value_type());
            self.observer.column_assigned(column, depth);
        }
    }
}
