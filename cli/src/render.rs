//! Tab-separated rendering of a cursor.

use crate::error::Result;
use std::io::Write;
use tabula_engine::{Cursor, Statement};

/// Write the header and every remaining row, up to `limit` rows.
///
/// Returns the number of rows written.
pub fn write_table<S, W>(
    cursor: &mut Cursor<S>,
    out: &mut W,
    limit: Option<usize>,
) -> Result<usize>
where
    S: Statement,
    W: Write,
{
    let header: Vec<String> = cursor
        .metadata()
        .columns()
        .map(|c| format!("{}:{}", escape(&c.name), c.value_type))
        .collect();
    writeln!(out, "{}", header.join("\t"))?;

    let columns = cursor.metadata().column_count();
    let mut written = 0;
    while limit.map_or(true, |max| written < max) && cursor.advance() {
        let mut cells = Vec::with_capacity(columns);
        for position in 1..=columns {
            let cell = cursor
                .get_value(position)?
                .map(|v| escape(&v.to_string()))
                .unwrap_or_default();
            cells.push(cell);
        }
        writeln!(out, "{}", cells.join("\t"))?;
        written += 1;
    }

    tracing::debug!(rows = written, columns, "rendered table");
    Ok(written)
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
}
