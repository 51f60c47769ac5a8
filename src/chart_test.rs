use super::*;
use crate::table::DataTable;

fn sales_table() -> DataTable {
    DataTable::from_csv("Category,Value\nA,1\nB,2\nC,3\n").unwrap()
}

// =========================================================================
// ChartKind
// =========================================================================

#[test]
fn kind_parse_known_tags() {
    for kind in ChartKind::ALL {
        assert_eq!(ChartKind::parse(kind.as_str()), Some(kind));
    }
}

#[test]
fn kind_parse_unknown_tag_falls_back_to_bar() {
    assert_eq!(ChartKind::parse("histogram"), None);
    assert_eq!(ChartKind::parse_or_default("histogram"), ChartKind::Bar);
    assert_eq!(ChartKind::parse_or_default(""), ChartKind::Bar);
}

#[test]
fn kind_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&ChartKind::Scatter).unwrap(), "\"scatter\"");
    assert_eq!(serde_json::from_str::<ChartKind>("\"area\"").unwrap(), ChartKind::Area);
}

// =========================================================================
// ChartConfig::defaults
// =========================================================================

#[test]
fn defaults_use_first_two_columns_and_title_template() {
    let config = ChartConfig::defaults(&sales_table(), ChartKind::Bar).unwrap();
    assert_eq!(config.x, "Category");
    assert_eq!(config.y, "Value");
    assert_eq!(config.title, "Value by Category");
    assert_eq!(config.kind, ChartKind::Bar);
}

#[test]
fn defaults_none_for_single_column() {
    let table = DataTable::from_csv("Only\n1\n2\n").unwrap();
    assert!(ChartConfig::defaults(&table, ChartKind::Line).is_none());
}

// =========================================================================
// build_chart — xy
// =========================================================================

#[test]
fn bar_chart_from_three_categories() {
    let config = ChartConfig {
        kind: ChartKind::Bar,
        x: "Category".into(),
        y: "Value".into(),
        title: "Value by Category".into(),
    };
    let spec = build_chart(&sales_table(), &config).unwrap();
    match spec {
        ChartSpec::Xy { kind, title, points, y_min, y_max, .. } => {
            assert_eq!(kind, ChartKind::Bar);
            assert_eq!(title, "Value by Category");
            assert_eq!(points.len(), 3);
            assert_eq!(points[0].label, "A");
            // Categorical x column maps to row indices.
            assert!((points[2].x - 2.0).abs() < f64::EPSILON);
            assert!((points[2].y - 3.0).abs() < f64::EPSILON);
            // Bar baseline includes zero.
            assert!((y_min - 0.0).abs() < f64::EPSILON);
            assert!((y_max - 3.0).abs() < f64::EPSILON);
        }
        ChartSpec::Pie { .. } => panic!("expected xy spec"),
    }
}

#[test]
fn scatter_uses_numeric_x_values() {
    let table = DataTable::from_csv("Day,Hits\n10,5\n20,7\n").unwrap();
    let config = ChartConfig { kind: ChartKind::Scatter, x: "Day".into(), y: "Hits".into(), title: "t".into() };
    let spec = build_chart(&table, &config).unwrap();
    match spec {
        ChartSpec::Xy { points, y_min, y_max, .. } => {
            assert!((points[1].x - 20.0).abs() < f64::EPSILON);
            // Scatter range hugs the data, no zero baseline.
            assert!((y_min - 5.0).abs() < f64::EPSILON);
            assert!((y_max - 7.0).abs() < f64::EPSILON);
        }
        ChartSpec::Pie { .. } => panic!("expected xy spec"),
    }
}

#[test]
fn non_numeric_y_is_a_render_error() {
    let table = DataTable::from_csv("Category,Note\nA,hello\n").unwrap();
    let config = ChartConfig { kind: ChartKind::Bar, x: "Category".into(), y: "Note".into(), title: "t".into() };
    assert!(matches!(build_chart(&table, &config), Err(ChartError::Table(_))));
}

#[test]
fn unknown_column_is_a_render_error() {
    let config = ChartConfig { kind: ChartKind::Line, x: "Nope".into(), y: "Value".into(), title: "t".into() };
    assert!(matches!(build_chart(&sales_table(), &config), Err(ChartError::Table(_))));
}

#[test]
fn single_column_table_cannot_chart() {
    let table = DataTable::from_csv("Only\n1\n").unwrap();
    let config = ChartConfig { kind: ChartKind::Bar, x: "Only".into(), y: "Only".into(), title: "t".into() };
    assert!(matches!(build_chart(&table, &config), Err(ChartError::TooFewColumns(1))));
}

#[test]
fn zero_row_table_cannot_chart() {
    let table = DataTable::from_csv("A,B\n").unwrap();
    let config = ChartConfig { kind: ChartKind::Line, x: "A".into(), y: "B".into(), title: "t".into() };
    assert!(matches!(build_chart(&table, &config), Err(ChartError::EmptyTable)));
}

// =========================================================================
// build_chart — pie
// =========================================================================

#[test]
fn pie_uses_x_labels_and_y_magnitudes() {
    let config =
        ChartConfig { kind: ChartKind::Pie, x: "Category".into(), y: "Value".into(), title: "split".into() };
    let spec = build_chart(&sales_table(), &config).unwrap();
    match spec {
        ChartSpec::Pie { total, slices, .. } => {
            assert!((total - 6.0).abs() < f64::EPSILON);
            assert_eq!(slices.len(), 3);
            assert_eq!(slices[0].label, "A");
            assert!((slices[0].fraction - 1.0 / 6.0).abs() < 1e-12);
            // Slices tile the full circle in order.
            assert!((slices[0].start_angle - 0.0).abs() < 1e-12);
            assert!((slices[1].start_angle - slices[0].end_angle).abs() < 1e-12);
            assert!((slices[2].end_angle - std::f64::consts::TAU).abs() < 1e-9);
        }
        ChartSpec::Xy { .. } => panic!("expected pie spec"),
    }
}

#[test]
fn pie_with_zero_total_errors() {
    let table = DataTable::from_csv("K,V\na,0\nb,0\n").unwrap();
    let config = ChartConfig { kind: ChartKind::Pie, x: "K".into(), y: "V".into(), title: "t".into() };
    assert!(matches!(build_chart(&table, &config), Err(ChartError::NonPositivePieTotal(_))));
}

#[test]
fn pie_with_negative_magnitude_errors() {
    let table = DataTable::from_csv("K,V\na,5\nb,-2\nc,3\n").unwrap();
    let config = ChartConfig { kind: ChartKind::Pie, x: "K".into(), y: "V".into(), title: "t".into() };
    let err = build_chart(&table, &config).unwrap_err();
    assert!(matches!(
        err,
        ChartError::NegativePieMagnitude { ref label, value } if label == "b" && (value + 2.0).abs() < f64::EPSILON
    ));
}

#[test]
fn pie_with_non_numeric_magnitude_errors() {
    let table = DataTable::from_csv("K,V\na,uno\n").unwrap();
    let config = ChartConfig { kind: ChartKind::Pie, x: "K".into(), y: "V".into(), title: "t".into() };
    assert!(matches!(build_chart(&table, &config), Err(ChartError::Table(_))));
}
