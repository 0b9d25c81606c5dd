//! Plain-text tables of aligned series, printed by `--table`.

use std::fmt::Write as _;

use unicode_width::UnicodeWidthStr;

/// One value column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub header: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(header: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            header: header.into(),
            values,
        }
    }
}

const SEPARATOR: &str = "  ";

/// Render a titled table: one row per tick, one column per series.
///
/// Missing values print as `-`.
pub fn render(title: &str, x_header: &str, ticks: &[String], columns: &[Column]) -> String {
    let cells: Vec<Vec<String>> = columns
        .iter()
        .map(|c| c.values.iter().map(|v| format_value(*v)).collect())
        .collect();

    let first_width = ticks
        .iter()
        .map(|t| t.width())
        .chain(std::iter::once(x_header.width()))
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = columns
        .iter()
        .zip(&cells)
        .map(|(column, cells)| {
            cells
                .iter()
                .map(|c| c.width())
                .chain(std::iter::once(column.header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.width()));

    let mut line = pad_right(x_header, first_width);
    for (column, width) in columns.iter().zip(&widths) {
        line.push_str(SEPARATOR);
        line.push_str(&pad_left(&column.header, *width));
    }
    let _ = writeln!(out, "{}", line.trim_end());

    for (row, tick) in ticks.iter().enumerate() {
        let mut line = pad_right(tick, first_width);
        for (cells, width) in cells.iter().zip(&widths) {
            line.push_str(SEPARATOR);
            let cell = cells.get(row).map(String::as_str).unwrap_or("-");
            line.push_str(&pad_left(cell, *width));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "-".to_string()
    } else {
        format!("{v:.2}")
    }
}

// `format!("{:>w$}")` pads by char count, which is off for wide glyphs
fn pad_left(s: &str, width: usize) -> String {
    format!("{}{s}", " ".repeat(width.saturating_sub(s.width())))
}

fn pad_right(s: &str, width: usize) -> String {
    format!("{s}{}", " ".repeat(width.saturating_sub(s.width())))
}
