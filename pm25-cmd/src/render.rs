//! Plain-text table and JSON output.

use crate::OutputFormat;
use pm25_utils::format::pad;
use serde::Serialize;
use std::io::Write;

/// A table of pre-formatted cells printed with aligned columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Table {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let widths = self.widths();
        let line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad(cell, *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        writeln!(out, "{}", line(&self.headers))?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(out, "{}", rule.join("  "))?;
        for row in &self.rows {
            writeln!(out, "{}", line(row))?;
        }
        Ok(())
    }
}

/// Print `value` as JSON, or the table built by `table` otherwise.
pub fn emit<T, W, F>(value: &T, format: OutputFormat, out: &mut W, table: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
    F: FnOnce() -> Table,
{
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Table => table().write_to(out)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{emit, Table};
    use crate::OutputFormat;

    #[test]
    fn test_table_alignment() {
        let mut table = Table::new(["park", "mean"]);
        table.push_row(["ParkLonger", "1.0"]);
        table.push_row(["P", "22.5"]);
        let mut out = Vec::new();
        table.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "park        mean");
        assert_eq!(lines[1], "----------  ----");
        assert_eq!(lines[2], "ParkLonger  1.0");
        assert_eq!(lines[3], "P           22.5");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_emit_json() {
        let mut out = Vec::new();
        emit(&vec![1, 2], OutputFormat::Json, &mut out, Table::default).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));
    }
}
