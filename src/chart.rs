//! Chart kinds, configuration defaults, and server-side chart layout.
//!
//! DESIGN
//! ======
//! The chart is laid out server-side into a `ChartSpec` the page can draw
//! directly: xy charts get points plus a y-axis range, pie charts get
//! slices with precomputed angles. The mapping is pure — no aggregation,
//! no sorting, no coercion beyond requiring numeric y values.

use serde::{Deserialize, Serialize};

use crate::table::{DataTable, TableError};

// =============================================================================
// CHART KIND
// =============================================================================

/// The fixed set of chart families, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
    Pie,
    Area,
}

impl ChartKind {
    pub const ALL: [Self; 5] = [Self::Bar, Self::Line, Self::Scatter, Self::Pie, Self::Area];

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "bar" => Some(Self::Bar),
            "line" => Some(Self::Line),
            "scatter" => Some(Self::Scatter),
            "pie" => Some(Self::Pie),
            "area" => Some(Self::Area),
            _ => None,
        }
    }

    /// Parse a model-suggested tag, falling back to the first kind in
    /// [`ChartKind::ALL`] when the tag is unrecognized.
    #[must_use]
    pub fn parse_or_default(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(Self::ALL[0])
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Pie => "pie",
            Self::Area => "area",
        }
    }
}

impl Default for ChartKind {
    fn default() -> Self {
        Self::Bar
    }
}

// =============================================================================
// CONFIG
// =============================================================================

/// A concrete chart request: kind, axis columns, title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub x: String,
    pub y: String,
    pub title: String,
}

impl ChartConfig {
    /// Default configuration for a freshly cleaned table: suggested kind,
    /// x = first column, y = second column, title `"{y} by {x}"`.
    ///
    /// Returns `None` when the table has fewer than two columns — no 2D
    /// chart can be built and configuration is disabled.
    #[must_use]
    pub fn defaults(table: &DataTable, suggested: ChartKind) -> Option<Self> {
        let names = table.column_names();
        if names.len() < 2 {
            return None;
        }
        let x = names[0].to_string();
        let y = names[1].to_string();
        let title = format!("{y} by {x}");
        Some(Self { kind: suggested, x, y, title })
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("table has {0} column(s); at least 2 are required for a chart")]
    TooFewColumns(usize),

    #[error("table has no rows to plot")]
    EmptyTable,

    #[error("{0}")]
    Table(#[from] TableError),

    #[error("pie chart requires a positive magnitude total, got {0}")]
    NonPositivePieTotal(f64),

    #[error("pie chart magnitudes must be non-negative, got {value} for {label:?}")]
    NegativePieMagnitude { label: String, value: f64 },
}

// =============================================================================
// CHART SPEC
// =============================================================================

/// A point on an xy chart. `x` is the numeric x value when the whole x
/// column is numeric, otherwise the row index; `label` is the display
/// form of the x cell either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XyPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// One pie slice with its precomputed angular span (radians, clockwise
/// from twelve o'clock).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub fraction: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Renderable chart object handed to the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ChartSpec {
    Xy {
        kind: ChartKind,
        title: String,
        x_label: String,
        y_label: String,
        points: Vec<XyPoint>,
        y_min: f64,
        y_max: f64,
    },
    Pie {
        title: String,
        total: f64,
        slices: Vec<PieSlice>,
    },
}

/// Build a renderable chart from a table and configuration.
///
/// Pure mapping: bar/line/scatter/area plot x against y; pie uses the x
/// column as category labels and the y column as magnitudes. Column data
/// is validated here, not earlier — a bad column choice is a render
/// error and never disturbs session state.
///
/// # Errors
///
/// Returns a [`ChartError`] when the table is too small, a column is
/// missing, y values are non-numeric, a pie magnitude is negative, or
/// pie magnitudes sum to zero or less.
pub fn build_chart(table: &DataTable, config: &ChartConfig) -> Result<ChartSpec, ChartError> {
    if table.column_count() < 2 {
        return Err(ChartError::TooFewColumns(table.column_count()));
    }
    if table.row_count() == 0 {
        return Err(ChartError::EmptyTable);
    }

    let x_column = table
        .column(&config.x)
        .ok_or_else(|| TableError::UnknownColumn(config.x.clone()))?;
    let y_values = table.numeric_column(&config.y)?;

    match config.kind {
        ChartKind::Pie => {
            // A negative magnitude would produce a backwards arc, so it
            // is a render error rather than a slice.
            if let Some((cell, &value)) = x_column
                .values
                .iter()
                .zip(&y_values)
                .find(|&(_, &value)| value < 0.0)
            {
                return Err(ChartError::NegativePieMagnitude { label: cell.display(), value });
            }
            let total: f64 = y_values.iter().sum();
            if total <= 0.0 {
                return Err(ChartError::NonPositivePieTotal(total));
            }
            let mut angle = 0.0_f64;
            let slices = x_column
                .values
                .iter()
                .zip(&y_values)
                .map(|(cell, &value)| {
                    let fraction = value / total;
                    let start_angle = angle;
                    angle += fraction * std::f64::consts::TAU;
                    PieSlice {
                        label: cell.display(),
                        value,
                        fraction,
                        start_angle,
                        end_angle: angle,
                    }
                })
                .collect();
            Ok(ChartSpec::Pie { title: config.title.clone(), total, slices })
        }
        kind => {
            let numeric_x = x_column.values.iter().all(|c| c.as_number().is_some());
            let points: Vec<XyPoint> = x_column
                .values
                .iter()
                .zip(&y_values)
                .enumerate()
                .map(|(index, (cell, &y))| XyPoint {
                    label: cell.display(),
                    x: if numeric_x {
                        cell.as_number().unwrap_or_default()
                    } else {
                        index as f64
                    },
                    y,
                })
                .collect();

            let mut y_min = y_values.iter().copied().fold(f64::INFINITY, f64::min);
            let mut y_max = y_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            // Bars and areas are drawn from a zero baseline.
            if matches!(kind, ChartKind::Bar | ChartKind::Area) {
                y_min = y_min.min(0.0);
                y_max = y_max.max(0.0);
            }

            Ok(ChartSpec::Xy {
                kind,
                title: config.title.clone(),
                x_label: config.x.clone(),
                y_label: config.y.clone(),
                points,
                y_min,
                y_max,
            })
        }
    }
}

#[cfg(test)]
#[path = "chart_test.rs"]
mod tests;
