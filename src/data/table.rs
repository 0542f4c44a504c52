//! Untyped tabular report data, as returned by the fetchers.
//!
//! Each network answers in its own shape (CSV text, a JSON `data` array, a bare
//! JSON array). `RawTable` is the one representation they all land in before
//! normalization:
//!
//! - ordered column names (CSV header order, or first-seen JSON key order)
//! - rows of `serde_json::Value` cells (CSV cells are always strings)
//!
//! Cell coercion is lenient in the same way for every source: `null` and empty
//! cells read as zero / empty text, and numeric strings are accepted wherever a
//! number is expected.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        let mut table = Self {
            columns,
            index: HashMap::new(),
            rows: Vec::new(),
        };
        table.rebuild_index();
        table
    }

    /// Parse a CSV report body (header row required).
    pub fn from_csv(body: &str) -> Result<Self, AppError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::Fetch(format!("failed to read CSV header: {e}")))?
            .iter()
            .map(normalize_header_name)
            .collect();

        let mut table = Self::new(headers);
        for (idx, result) in reader.records().enumerate() {
            // +2: records start after the header and CSV lines are 1-based.
            let record = result
                .map_err(|e| AppError::Fetch(format!("malformed CSV at line {}: {e}", idx + 2)))?;
            table
                .rows
                .push(record.iter().map(|cell| Value::String(cell.to_string())).collect());
        }
        Ok(table)
    }

    /// Build a table from JSON objects.
    ///
    /// Columns are the union of all keys in first-seen order; a key missing
    /// from a record becomes a `null` cell.
    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        let mut table = Self::default();
        for record in &records {
            for key in record.keys() {
                if !table.index.contains_key(key) {
                    table.index.insert(key.clone(), table.columns.len());
                    table.columns.push(key.clone());
                }
            }
        }

        for mut record in records {
            let row = table
                .columns
                .iter()
                .map(|c| record.remove(c).unwrap_or(Value::Null))
                .collect();
            table.rows.push(row);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Append `other` below `self`, aligning cells by column name.
    ///
    /// Columns only present in one side are added and padded with `null`.
    pub fn append(&mut self, other: RawTable) {
        if self.columns.is_empty() && self.rows.is_empty() {
            *self = other;
            return;
        }

        for column in &other.columns {
            if !self.index.contains_key(column) {
                self.index.insert(column.clone(), self.columns.len());
                self.columns.push(column.clone());
                for row in &mut self.rows {
                    row.push(Value::Null);
                }
            }
        }

        for mut row in other.rows {
            let mut aligned = vec![Value::Null; self.columns.len()];
            for (src_idx, column) in other.columns.iter().enumerate() {
                let dst_idx = self.index[column];
                aligned[dst_idx] = std::mem::take(&mut row[src_idx]);
            }
            self.rows.push(aligned);
        }
    }

    /// Remove columns that are not part of the common schema.
    ///
    /// Every listed column must exist: a missing one means the network changed
    /// its report format and we would rather stop than guess.
    pub fn drop_columns(&mut self, names: &[&str]) -> Result<(), AppError> {
        let missing: Vec<&str> = names.iter().copied().filter(|n| !self.has_column(n)).collect();
        if !missing.is_empty() {
            return Err(AppError::Schema(format!(
                "expected column(s) not found: {}",
                missing.join(", ")
            )));
        }

        let keep: Vec<bool> = self.columns.iter().map(|c| !names.contains(&c.as_str())).collect();
        self.columns = retain_flagged(std::mem::take(&mut self.columns), &keep);
        self.rows = std::mem::take(&mut self.rows)
            .into_iter()
            .map(|row| retain_flagged(row, &keep))
            .collect();
        self.rebuild_index();
        Ok(())
    }

    /// Rename columns; entries whose source column is absent are ignored.
    pub fn rename_columns(&mut self, renames: &[(&str, &str)]) {
        for column in &mut self.columns {
            if let Some((_, to)) = renames.iter().find(|(from, _)| *from == column.as_str()) {
                *column = (*to).to_string();
            }
        }
        self.rebuild_index();
    }

    /// Fail with a schema error listing every required column that is absent.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), AppError> {
        let missing: Vec<&str> = names.iter().copied().filter(|n| !self.has_column(n)).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Schema(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )))
        }
    }

    /// Replace every `null` cell with `0` (the video report leaves gaps).
    pub fn fill_nulls_with_zero(&mut self) {
        for cell in self.rows.iter_mut().flatten() {
            if cell.is_null() {
                *cell = Value::from(0);
            }
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows.iter().enumerate().map(move |(position, cells)| RawRow {
            table: self,
            position,
            cells,
        })
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
    }
}

fn retain_flagged<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, &k)| k.then_some(item))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

/// Borrowed view of a single row with typed accessors.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    table: &'a RawTable,
    position: usize,
    cells: &'a [Value],
}

impl<'a> RawRow<'a> {
    /// Zero-based row position in the table (for error messages).
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let idx = *self.table.index.get(column)?;
        self.cells.get(idx)
    }

    /// Cell as text; `null` reads as an empty string and numbers are formatted.
    pub fn text(&self, column: &str) -> Result<String, AppError> {
        match self.cell(column)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(self.bad_value(column, other, "text")),
        }
    }

    /// Non-negative integer measure (requests, impressions, clicks).
    ///
    /// Fractional values are truncated toward zero.
    pub fn count(&self, column: &str) -> Result<u64, AppError> {
        let value = self.cell(column)?;
        if let Some(n) = value.as_u64() {
            return Ok(n);
        }
        if let Some(Ok(n)) = value.as_str().map(|s| s.trim().parse::<u64>()) {
            return Ok(n);
        }
        let as_float = match value {
            Value::Null => Some(0.0),
            Value::String(s) if s.trim().is_empty() => Some(0.0),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        match as_float {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(v.trunc() as u64),
            _ => Err(self.bad_value(column, value, "a non-negative integer")),
        }
    }

    /// Non-negative currency amount.
    pub fn amount(&self, column: &str) -> Result<f64, AppError> {
        let value = self.cell(column)?;
        let parsed = match value {
            Value::Null => Some(0.0),
            Value::String(s) if s.trim().is_empty() => Some(0.0),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        match parsed {
            Some(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => Err(self.bad_value(column, value, "a non-negative amount")),
        }
    }

    /// Unix timestamp in seconds (number or numeric string).
    pub fn timestamp(&self, column: &str) -> Result<i64, AppError> {
        let value = self.cell(column)?;
        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.bad_value(column, value, "a Unix timestamp"))
    }

    fn cell(&self, column: &str) -> Result<&'a Value, AppError> {
        self.get(column)
            .ok_or_else(|| AppError::Schema(format!("missing required column: {column}")))
    }

    fn bad_value(&self, column: &str, value: &Value, expected: &str) -> AppError {
        AppError::Schema(format!(
            "row {}: `{column}` should be {expected}, got {value}",
            self.position + 1
        ))
    }
}
