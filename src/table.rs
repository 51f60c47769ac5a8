//! Tabular structure — named columns of equal length.
//!
//! DESIGN
//! ======
//! `DataTable` is the in-memory table produced by the cleaning request:
//! an ordered sequence of named columns, each an equal-length sequence of
//! scalar cells. It is built from the CSV text the model returns and
//! replaced wholesale on the next successful clean. Cells are typed at
//! parse time: a field that parses as `f64` becomes a number, everything
//! else stays text.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The CSV text could not be read (ragged rows, bad quoting, etc.).
    #[error("invalid CSV: {0}")]
    Csv(String),

    /// The CSV text contained no header row at all.
    #[error("CSV text is empty")]
    Empty,

    /// Two header fields share the same name.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A named column does not exist in the table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A cell expected to be numeric was not.
    #[error("column {column:?} has non-numeric value {value:?} at row {row}")]
    NonNumeric { column: String, row: usize, value: String },
}

// =============================================================================
// CELL
// =============================================================================

/// A single table cell. Serializes untagged: numbers as JSON numbers,
/// text as JSON strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    fn parse(field: &str) -> Self {
        let trimmed = field.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(field.to_string()),
        }
    }

    /// Numeric view of the cell, if it has one.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Display form used for axis labels and the text dump.
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Text(s) => s.clone(),
        }
    }
}

// =============================================================================
// TABLE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

/// Ordered named columns, all the same length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<Column>,
}

impl DataTable {
    /// Parse CSV text into a table. The first record is the header row.
    ///
    /// A header with zero data rows is a valid (degenerate) table; ragged
    /// rows or an entirely empty input are errors.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Empty`] when there is no header row,
    /// [`TableError::DuplicateColumn`] when two headers share a name, and
    /// [`TableError::Csv`] when the reader rejects the input.
    pub fn from_csv(text: &str) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers().map_err(|e| TableError::Csv(e.to_string()))?;
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(TableError::Empty);
        }
        // Columns are addressed by name, so duplicates would shadow each
        // other silently.
        for (index, name) in headers.iter().enumerate() {
            if headers.iter().take(index).any(|earlier| earlier == name) {
                return Err(TableError::DuplicateColumn(name.to_string()));
            }
        }

        let mut columns: Vec<Column> = headers
            .iter()
            .map(|name| Column { name: name.to_string(), values: Vec::new() })
            .collect();

        for record in reader.records() {
            let record = record.map_err(|e| TableError::Csv(e.to_string()))?;
            for (index, field) in record.iter().enumerate() {
                columns[index].values.push(Cell::parse(field));
            }
        }

        Ok(Self { columns })
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Row count. Uniform across columns by construction.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All values of a column as numbers.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] for a missing column and
    /// [`TableError::NonNumeric`] for the first cell without a numeric view.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let column = self
            .column(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        column
            .values
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.as_number().ok_or_else(|| TableError::NonNumeric {
                    column: name.to_string(),
                    row,
                    value: cell.display(),
                })
            })
            .collect()
    }

    /// Flat aligned text dump: header row plus data rows, each column
    /// padded to its widest value. Used as the insight prompt payload.
    #[must_use]
    pub fn to_text(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| {
                c.values
                    .iter()
                    .map(|v| v.display().len())
                    .chain(std::iter::once(c.name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, &width)| format!("{:width$}", c.name))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        for row in 0..self.row_count() {
            let cells: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(c, &width)| format!("{:width$}", c.values[row].display()))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
