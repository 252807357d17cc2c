//! Result metadata view over a discovered schema.

use crate::{error::Result, Column, ColumnPosition, Error, Schema, ValueType};
use serde::{Deserialize, Serialize};

/// Whether a column may hold nulls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nullability {
    NoNulls,
    Nullable,
    /// Nothing is declared upstream, so this is what every column reports
    Unknown,
}

/// Per-column metadata for a result set.
#[derive(Debug, Clone, Copy)]
pub struct ResultMetadata<'a> {
    schema: &'a Schema,
}

impl<'a> ResultMetadata<'a> {
    /// Wrap a schema.
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Number of discovered columns.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// All columns in position order.
    pub fn columns(&self) -> impl Iterator<Item = &'a Column> {
        self.schema.columns().iter()
    }

    /// Name of the column at a 1-based position.
    pub fn column_name(&self, position: ColumnPosition) -> Result<&'a str> {
        self.column(position).map(|c| c.name.as_str())
    }

    /// Display label; records carry no aliases, so this is the name.
    pub fn column_label(&self, position: ColumnPosition) -> Result<&'a str> {
        self.column_name(position)
    }

    /// Type observed in the sample record.
    pub fn column_type(&self, position: ColumnPosition) -> Result<ValueType> {
        self.column(position).map(|c| c.value_type)
    }

    /// Relational type name, e.g. `VARCHAR` or `BIGINT`.
    pub fn column_type_name(&self, position: ColumnPosition) -> Result<&'static str> {
        self.column_type(position).map(ValueType::sql_type_name)
    }

    /// Always [`Nullability::Unknown`].
    pub fn is_nullable(&self, position: ColumnPosition) -> Result<Nullability> {
        self.column(position).map(|_| Nullability::Unknown)
    }

    /// Always `true`; nothing is written back upstream.
    pub fn is_read_only(&self, position: ColumnPosition) -> Result<bool> {
        self.column(position).map(|_| true)
    }

    fn column(&self, position: ColumnPosition) -> Result<&'a Column> {
        self.schema.column(position).ok_or_else(|| {
            Error::InvalidColumn(format!(
                "position {} of {}",
                position,
                self.schema.len()
            ))
        })
    }
}
