//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

/// Formats and prints rows based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
        OutputFormat::Minimal => print_minimal(data),
    }
}

/// Prints a single serializable report as pretty JSON.
pub fn print_json_report<T: Serialize>(report: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
fn print_json<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints minimal output (last row only).
fn print_minimal<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    if let Some(last) = data.last() {
        println!("{}", serde_json::to_string(last)?);
    }
    Ok(())
}

/// Formats a point as comma-separated fixed-precision coordinates.
pub fn format_point(point: &[f64]) -> String {
    point
        .iter()
        .map(|x| format!("{:.6}", x))
        .collect::<Vec<_>>()
        .join(",")
}

/// Indices of at most `rows` evenly spaced entries out of `len`, always
/// keeping the first and the last.
pub fn thin(len: usize, rows: usize) -> Vec<usize> {
    if len <= rows {
        return (0..len).collect();
    }
    match rows {
        0 => Vec::new(),
        1 => vec![len - 1],
        _ => {
            let stride = (len - 1) as f64 / (rows - 1) as f64;
            let mut picked: Vec<usize> = (0..rows).map(|i| (i as f64 * stride).round() as usize).collect();
            picked.dedup();
            picked
        }
    }
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair from a float with fixed precision.
    pub fn from_f64(key: impl Into<String>, value: f64, precision: usize) -> Self {
        Self {
            key: key.into(),
            value: format!("{:.prec$}", value, prec = precision),
        }
    }
}

/// One iterate of a trajectory.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct TrajectoryRow {
    #[tabled(rename = "Iteration")]
    pub iteration: usize,
    #[tabled(rename = "Point")]
    pub point: String,
    #[tabled(rename = "Value")]
    pub value: f64,
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thin_keeps_ends() {
        assert_eq!(thin(5, 10), vec![0, 1, 2, 3, 4]);
        assert_eq!(thin(101, 3), vec![0, 50, 100]);
        assert_eq!(thin(10, 1), vec![9]);
        assert!(thin(10, 0).is_empty());

        let picked = thin(1000, 20);
        assert_eq!(picked.len(), 20);
        assert_eq!(picked.first(), Some(&0));
        assert_eq!(picked.last(), Some(&999));
    }

    #[test]
    fn test_format_point() {
        assert_eq!(format_point(&[1.0, -0.5]), "1.000000,-0.500000");
        assert_eq!(format_point(&[]), "");
    }
}
