//! Shared result-set printer.
//!
//! Renders any forward-only cursor: determine the column count, then fetch
//! rows one at a time and retrieve every column by position as text. The
//! pass is single-shot; once a cursor has been rendered it cannot be
//! replayed.

use crate::error::{ProbeError, Result};
use odbc_api::{Cursor, ResultSetMetadata};
use std::io::Write;

/// What a rendering pass produced, for logging by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Number of rows fetched.
    pub rows: usize,
    /// Number of columns in the result set.
    pub columns: u16,
}

/// Prints a result set, one `Row N` header per row and one line per column.
///
/// Columns are retrieved in order as text; a null indicator from the driver
/// prints the literal `NULL`. Row numbering starts at 0, column numbering
/// at 1, matching the positional retrieval order.
///
/// # Errors
/// Returns [`ProbeError::Query`] if a fetch or get-data call fails and
/// [`ProbeError::Io`] if the output stream rejects a write.
pub fn print_result_set<C>(mut cursor: C, out: &mut impl Write) -> Result<RenderSummary>
where
    C: Cursor + ResultSetMetadata,
{
    let columns = cursor
        .num_result_cols()
        .map_err(|source| ProbeError::query_failed("column count retrieval", source))?;
    let columns = u16::try_from(columns).unwrap_or(0);

    let mut rows = 0;
    let mut buffer = Vec::new();

    while let Some(mut row) = cursor
        .next_row()
        .map_err(|source| ProbeError::query_failed("row fetch", source))?
    {
        write_line(out, &row_header(rows))?;
        for column in 1..=columns {
            buffer.clear();
            let is_present = row
                .get_text(column, &mut buffer)
                .map_err(|source| {
                    ProbeError::query_failed(format!("column {column} retrieval"), source)
                })?;
            let line = if is_present {
                column_line(column, Some(&String::from_utf8_lossy(&buffer)))
            } else {
                column_line(column, None)
            };
            write_line(out, &line)?;
        }
        rows += 1;
    }

    write_line(out, "")?;
    Ok(RenderSummary { rows, columns })
}

fn write_line(out: &mut impl Write, line: &str) -> Result<()> {
    writeln!(out, "{line}")
        .map_err(|source| ProbeError::io_failed("result output stream", source))
}

/// Header line for one row; numbering starts at 0.
fn row_header(index: usize) -> String {
    format!("Row {index}")
}

/// One column line; `None` denotes the driver's null indicator.
fn column_line(index: u16, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("  Column {index} : {value}"),
        None => format!("  Column {index} : NULL"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_numbering_starts_at_zero() {
        assert_eq!(row_header(0), "Row 0");
        assert_eq!(row_header(7), "Row 7");
    }

    #[test]
    fn test_column_line_with_value() {
        assert_eq!(column_line(1, Some("42")), "  Column 1 : 42");
    }

    #[test]
    fn test_null_indicator_prints_literal() {
        assert_eq!(column_line(2, None), "  Column 2 : NULL");
    }

    #[test]
    fn test_empty_value_is_not_null() {
        assert_eq!(column_line(3, Some("")), "  Column 3 : ");
    }
}
