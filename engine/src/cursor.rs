//! Forward-only cursor over a materialized result set.
//!
//! The cursor owns the fetched records, the schema discovered from the first
//! of them, and the statement that produced them. Its position is a signed
//! row index: `-1` is before the first row, `len()` is after the last, and
//! everything in between addresses a record.
//!
//! Two accessor families exist on purpose. The loose getters (`get_string`,
//! `get_int`, [`Cursor::try_get`], ...) return a zero value when the stored
//! value has a different type. The strict family ([`Cursor::must_get`])
//! reports a [`Error::TypeMismatch`] instead. Callers may depend on either.

use crate::{
    error::Result, ColumnName, ColumnPosition, Config, DiscoveryObserver, Error, FieldValue,
    FromFieldValue, Record, ResultMetadata, Schema, SchemaDiscoverer, Statement, StatementHandle,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::cell::Cell;
use std::io::Read;

/// A column addressed by 1-based position or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    Position(ColumnPosition),
    Name(&'a str),
}

impl From<ColumnPosition> for ColumnRef<'_> {
    fn from(position: ColumnPosition) -> Self {
        ColumnRef::Position(position)
    }
}

/// Integer literals default to `i32`; negative positions never resolve.
impl From<i32> for ColumnRef<'_> {
    fn from(position: i32) -> Self {
        ColumnRef::Position(usize::try_from(position).unwrap_or(0))
    }
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnRef<'a> {
    fn from(name: &'a String) -> Self {
        ColumnRef::Name(name)
    }
}

/// Scrollability of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorType {
    ForwardOnly,
    ScrollInsensitive,
    ScrollSensitive,
}

/// Whether rows can be changed through a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    ReadOnly,
    Updatable,
}

/// Direction hint for row processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchDirection {
    Forward,
    Reverse,
    Unknown,
}

/// Relational types with no counterpart in upstream records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancedType {
    Array,
    Blob,
    Clob,
    NClob,
    Ref,
    RowId,
    SqlXml,
    Url,
}

impl AdvancedType {
    fn unsupported(self) -> Error {
        Error::Unsupported(match self {
            AdvancedType::Array => "array values",
            AdvancedType::Blob => "blob values",
            AdvancedType::Clob => "clob values",
            AdvancedType::NClob => "nclob values",
            AdvancedType::Ref => "ref values",
            AdvancedType::RowId => "row ids",
            AdvancedType::SqlXml => "sqlxml values",
            AdvancedType::Url => "url values",
        })
    }
}

const IN_PLACE_UPDATES: &str = "in place updates";

/// Forward-only, read-only cursor over fetched records.
pub struct Cursor<S: Statement = StatementHandle> {
    records: Vec<Record>,
    schema: Schema,
    config: Config,
    statement: S,
    row: isize,
    last_was_null: Cell<bool>,
}

impl<S: Statement> Cursor<S> {
    /// Create a cursor with the default configuration.
    pub fn new(records: Vec<Record>, statement: S) -> Self {
        Self::with_config(records, statement, Config::default())
    }

    /// Create a cursor, discovering the schema with the given configuration.
    pub fn with_config(records: Vec<Record>, statement: S, config: Config) -> Self {
        let schema = SchemaDiscoverer::new(&config).discover(records.first());
        Self::from_parts(records, statement, config, schema)
    }

    /// Create a cursor whose schema discovery reports to `observer`.
    pub fn with_observer(
        records: Vec<Record>,
        statement: S,
        config: Config,
        observer: &dyn DiscoveryObserver,
    ) -> Self {
        let schema = SchemaDiscoverer::new(&config)
            .with_observer(observer)
            .discover(records.first());
        Self::from_parts(records, statement, config, schema)
    }

    fn from_parts(records: Vec<Record>, statement: S, config: Config, schema: Schema) -> Self {
        tracing::debug!(
            rows = records.len(),
            columns = schema.len(),
            "opened cursor"
        );
        Self {
            records,
            schema,
            config,
            statement,
            row: -1,
            last_was_null: Cell::new(false),
        }
    }

    fn size(&self) -> isize {
        self.records.len() as isize
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Move to the next row.
    ///
    /// Returns `false` once the cursor moves past the last row, and on every
    /// call after that without moving further.
    pub fn advance(&mut self) -> bool {
        if self.row >= self.size() {
            return false;
        }
        self.row += 1;
        tracing::trace!(row = self.row, "advanced");
        self.row < self.size()
    }

    /// Jump to row 0. Succeeds even when there are no rows.
    pub fn move_to_first(&mut self) -> bool {
        self.row = 0;
        true
    }

    /// Jump to the last row. On an empty set this is before the first row.
    pub fn move_to_last(&mut self) -> bool {
        self.row = self.size() - 1;
        true
    }

    /// Rewind to before the first row.
    pub fn move_before_first(&mut self) {
        self.row = -1;
    }

    /// Move past the last row.
    pub fn move_after_last(&mut self) {
        self.row = self.size();
    }

    /// Jump to a row index. Not available on a forward-only cursor.
    pub fn absolute(&mut self, _row: isize) -> Result<bool> {
        Err(Error::Unsupported("absolute positioning"))
    }

    /// Move by an offset. Not available on a forward-only cursor.
    pub fn relative(&mut self, _rows: isize) -> Result<bool> {
        Err(Error::Unsupported("relative positioning"))
    }

    /// Step back one row. Not available on a forward-only cursor.
    pub fn previous(&mut self) -> Result<bool> {
        Err(Error::Unsupported("backward movement"))
    }

    /// Current row index.
    pub fn row(&self) -> isize {
        self.row
    }

    /// Whether no row has been reached yet. Always true for an empty set.
    pub fn is_before_first(&self) -> bool {
        self.records.is_empty() || self.row < 0
    }

    /// Whether the cursor has moved past the last row. Always true for an empty set.
    pub fn is_after_last(&self) -> bool {
        self.records.is_empty() || self.row >= self.size()
    }

    /// Whether the cursor is on row 0.
    pub fn is_first(&self) -> bool {
        self.row == 0 && !self.records.is_empty()
    }

    /// Whether the cursor is on the final row.
    pub fn is_last(&self) -> bool {
        !self.records.is_empty() && self.row == self.size() - 1
    }

    fn current_record(&self) -> Result<&Record> {
        usize::try_from(self.row)
            .ok()
            .and_then(|index| self.records.get(index))
            .ok_or(Error::NoCurrentRow)
    }

    // ------------------------------------------------------------------
    // Column resolution
    // ------------------------------------------------------------------

    /// Resolve a column name to its position.
    pub fn find_column(&self, name: &str) -> Result<ColumnPosition> {
        self.schema
            .position_of(name)
            .ok_or_else(|| Error::NoSuchColumn(name.to_string()))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.statement.is_closed() {
            return Err(Error::ResourceClosed);
        }
        Ok(())
    }

    fn column_name(&self, column: ColumnRef<'_>) -> ColumnName {
        match column {
            ColumnRef::Position(position) => self
                .schema
                .name_of(position)
                .unwrap_or_default()
                .to_string(),
            ColumnRef::Name(name) => name.to_string(),
        }
    }

    /// Look a name up on the record, then down its chain of wrapper mappings.
    ///
    /// Follows the same path as schema discovery: a wrapper above the depth
    /// limit is descended into, the one at the limit is read as a value.
    fn lookup<'r>(&self, record: &'r Record, name: &str) -> Option<&'r FieldValue> {
        let wrapper = self.config.wrapper_field.as_str();
        let mut current = record;
        let mut depth = 0;
        loop {
            let value = current.get(name);
            let descends = name == wrapper
                && depth < self.config.max_depth
                && value.and_then(FieldValue::as_map).is_some();
            if value.is_some() && !descends {
                return value;
            }
            if depth >= self.config.max_depth {
                return None;
            }
            current = current.get(wrapper).and_then(FieldValue::as_map)?;
            depth += 1;
        }
    }

    // ------------------------------------------------------------------
    // Untyped access
    // ------------------------------------------------------------------

    /// Read a column of the current row.
    ///
    /// `Ok(None)` means the record has no such field, which is not an error.
    pub fn get_value<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<Option<&FieldValue>> {
        let value = match column.into() {
            ColumnRef::Position(position) => {
                let record = self.current_record()?;
                let name = self.schema.name_of(position).ok_or_else(|| {
                    Error::InvalidColumn(format!(
                        "position {} of {}",
                        position,
                        self.schema.len()
                    ))
                })?;
                self.ensure_open()?;
                self.lookup(record, name)
            }
            ColumnRef::Name(name) => {
                if name.is_empty() {
                    return Err(Error::InvalidColumn("empty column name".into()));
                }
                self.ensure_open()?;
                let record = self.current_record()?;
                self.lookup(record, name)
            }
        };
        self.last_was_null.set(value.map_or(true, FieldValue::is_null));
        Ok(value)
    }

    /// Whether the last value read was null or absent.
    pub fn was_null(&self) -> bool {
        self.last_was_null.get()
    }

    // ------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------

    fn loose<'c, T: FromFieldValue>(&self, column: impl Into<ColumnRef<'c>>) -> Result<Option<T>> {
        Ok(self.get_value(column)?.and_then(T::from_field))
    }

    /// Read a column as `T`, or `T::default()` when absent or of another type.
    pub fn try_get<'c, T>(&self, column: impl Into<ColumnRef<'c>>) -> Result<T>
    where
        T: FromFieldValue + Default,
    {
        Ok(self.loose(column)?.unwrap_or_default())
    }

    /// Read a column as `T`, failing when the stored value has another type.
    ///
    /// Null and absent values are `Ok(None)`.
    pub fn must_get<'c, T: FromFieldValue>(
        &self,
        column: impl Into<ColumnRef<'c>>,
    ) -> Result<Option<T>> {
        let column = column.into();
        match self.get_value(column)? {
            None | Some(FieldValue::Null) => Ok(None),
            Some(value) => match T::from_field(value) {
                Some(v) => Ok(Some(v)),
                None => Err(Error::TypeMismatch {
                    column: self.column_name(column),
                    expected: T::TYPE_NAME.to_string(),
                    got: value.value_type().to_string(),
                }),
            },
        }
    }

    /// Read a text column.
    pub fn get_string<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<Option<String>> {
        self.loose(column)
    }

    /// Read a boolean column; `false` when absent or of another type.
    pub fn get_bool<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<bool> {
        self.try_get(column)
    }

    /// Read an integer column that fits `i8`; `0` otherwise.
    pub fn get_byte<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<i8> {
        self.try_get(column)
    }

    /// Read an integer column that fits `i16`; `0` otherwise.
    pub fn get_short<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<i16> {
        self.try_get(column)
    }

    /// Read an integer column that fits `i32`; `0` otherwise.
    pub fn get_int<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<i32> {
        self.try_get(column)
    }

    /// Read an integer column; `0` otherwise.
    pub fn get_long<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<i64> {
        self.try_get(column)
    }

    /// Read a float column that fits `f32`; `0.0` otherwise.
    pub fn get_float<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<f32> {
        self.try_get(column)
    }

    /// Read a float column; `0.0` otherwise.
    pub fn get_double<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<f64> {
        self.try_get(column)
    }

    /// Read a date column.
    pub fn get_date<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<Option<NaiveDate>> {
        self.loose(column)
    }

    /// Read a time-of-day column.
    pub fn get_time<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<Option<NaiveTime>> {
        self.loose(column)
    }

    /// Read a timestamp column.
    pub fn get_timestamp<'c>(
        &self,
        column: impl Into<ColumnRef<'c>>,
    ) -> Result<Option<DateTime<Utc>>> {
        self.loose(column)
    }

    /// Read a list column; empty when absent or of another type.
    pub fn get_list<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<Vec<FieldValue>> {
        self.try_get(column)
    }

    /// Read an opaque nested mapping column.
    pub fn get_map<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<Option<Record>> {
        self.loose(column)
    }

    // ------------------------------------------------------------------
    // Unsupported reads
    // ------------------------------------------------------------------

    /// Streams are not offered; values are already in memory.
    pub fn ascii_stream<'c>(&self, _column: impl Into<ColumnRef<'c>>) -> Result<Box<dyn Read>> {
        Err(Error::Unsupported("ascii streams"))
    }

    /// See [`Cursor::ascii_stream`].
    pub fn binary_stream<'c>(&self, _column: impl Into<ColumnRef<'c>>) -> Result<Box<dyn Read>> {
        Err(Error::Unsupported("binary streams"))
    }

    /// See [`Cursor::ascii_stream`].
    pub fn character_stream<'c>(
        &self,
        _column: impl Into<ColumnRef<'c>>,
    ) -> Result<Box<dyn Read>> {
        Err(Error::Unsupported("character streams"))
    }

    /// Read a column as one of the relational types records cannot carry.
    pub fn get_advanced<'c>(
        &self,
        _column: impl Into<ColumnRef<'c>>,
        kind: AdvancedType,
    ) -> Result<FieldValue> {
        Err(kind.unsupported())
    }

    /// Named cursors do not exist upstream.
    pub fn cursor_name(&self) -> Result<String> {
        Err(Error::Unsupported("named cursors"))
    }

    // ------------------------------------------------------------------
    // Mutations (the source is read-only)
    // ------------------------------------------------------------------

    /// Change a column of the current row. Always rejected.
    pub fn update<'c>(
        &mut self,
        _column: impl Into<ColumnRef<'c>>,
        _value: impl Into<FieldValue>,
    ) -> Result<()> {
        Err(Error::Unsupported(IN_PLACE_UPDATES))
    }

    /// Set a column of the current row to null. Always rejected.
    pub fn update_null<'c>(&mut self, _column: impl Into<ColumnRef<'c>>) -> Result<()> {
        Err(Error::Unsupported(IN_PLACE_UPDATES))
    }

    /// Insert the staged row. Always rejected.
    pub fn insert_row(&mut self) -> Result<()> {
        Err(Error::Unsupported(IN_PLACE_UPDATES))
    }

    /// Write back the current row. Always rejected.
    pub fn update_row(&mut self) -> Result<()> {
        Err(Error::Unsupported(IN_PLACE_UPDATES))
    }

    /// Delete the current row. Always rejected.
    pub fn delete_row(&mut self) -> Result<()> {
        Err(Error::Unsupported(IN_PLACE_UPDATES))
    }

    /// Re-fetch the current row. Always rejected.
    pub fn refresh_row(&mut self) -> Result<()> {
        Err(Error::Unsupported(IN_PLACE_UPDATES))
    }

    /// Discard staged changes. Always rejected.
    pub fn cancel_row_updates(&mut self) -> Result<()> {
        Err(Error::Unsupported(IN_PLACE_UPDATES))
    }

    /// Move to the staging row. Always rejected.
    pub fn move_to_insert_row(&mut self) -> Result<()> {
        Err(Error::Unsupported(IN_PLACE_UPDATES))
    }

    /// Leave the staging row. Always rejected.
    pub fn move_to_current_row(&mut self) -> Result<()> {
        Err(Error::Unsupported(IN_PLACE_UPDATES))
    }

    /// Rows are never changed through the cursor.
    pub fn row_updated(&self) -> bool {
        false
    }

    /// Always `false`.
    pub fn row_inserted(&self) -> bool {
        false
    }

    /// Always `false`.
    pub fn row_deleted(&self) -> bool {
        false
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Always [`CursorType::ForwardOnly`].
    pub fn cursor_type(&self) -> CursorType {
        CursorType::ForwardOnly
    }

    /// Always [`Concurrency::ReadOnly`].
    pub fn concurrency(&self) -> Concurrency {
        Concurrency::ReadOnly
    }

    /// Always [`FetchDirection::Forward`].
    pub fn fetch_direction(&self) -> FetchDirection {
        FetchDirection::Forward
    }

    /// Accept a direction hint; only forward is possible.
    pub fn set_fetch_direction(&mut self, direction: FetchDirection) -> Result<()> {
        match direction {
            FetchDirection::Forward => Ok(()),
            _ => Err(Error::Unsupported("non-forward fetch direction")),
        }
    }

    /// Rows fetched per round trip; the whole set is already materialized.
    pub fn fetch_size(&self) -> usize {
        self.records.len()
    }

    /// Accepted and ignored.
    pub fn set_fetch_size(&mut self, _rows: usize) {}

    /// Number of materialized rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no rows at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The schema discovered from the first record.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Column metadata view over the schema.
    pub fn metadata(&self) -> ResultMetadata<'_> {
        ResultMetadata::new(&self.schema)
    }

    /// The statement that produced this cursor.
    pub fn statement(&self) -> &S {
        &self.statement
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Close the owning statement. The records stay with the cursor.
    pub fn close(&mut self) -> Result<()> {
        self.statement.close()
    }

    /// Whether the owning statement has been closed.
    pub fn is_closed(&self) -> bool {
        self.statement.is_closed()
    }
}
