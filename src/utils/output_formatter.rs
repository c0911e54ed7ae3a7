/// Output formatter for dataset statistics
///
/// This module handles rendering statistics as a console table and exporting
/// them as JSON or CSV.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::stats::PpiStats;

/// One line of the statistics table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsRow {
    /// File name as shown in the report
    pub file: String,
    /// Number of distinct proteins
    pub proteins: usize,
    /// Number of interactions
    pub interactions: usize,
}

impl StatsRow {
    pub fn new(file: impl Into<String>, stats: PpiStats) -> Self {
        Self {
            file: file.into(),
            proteins: stats.proteins,
            interactions: stats.interactions,
        }
    }
}

/// Format a single row: name right-aligned in 20 columns, proteins in 4,
/// interactions in 5.
pub fn format_stats_row(row: &StatsRow) -> String {
    format!("{:>20} {:>4} {:>5}", row.file, row.proteins, row.interactions)
}

/// Format statistics for console output
///
/// # Arguments
///
/// * `rows` - One row per dataset file
/// * `use_markdown` - Whether to wrap the table in markdown triple backticks
///
/// # Returns
///
/// Formatted table, one line per row
pub fn format_stats_table(rows: &[StatsRow], use_markdown: bool) -> String {
    let mut output = String::new();

    if use_markdown {
        output.push_str("```\n");
    }

    for row in rows {
        output.push_str(&format_stats_row(row));
        output.push('\n');
    }

    if use_markdown {
        output.push_str("```\n");
    }

    output
}

/// Export statistics to a JSON file
pub fn export_stats_json(rows: &[StatsRow], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .context(format!("Failed to create JSON output file: {}", output_path.display()))?;

    serde_json::to_writer_pretty(file, rows).context("Failed to write JSON data")?;

    Ok(())
}

/// Export statistics to a CSV file with a `file,proteins,interactions` header
pub fn export_stats_csv(rows: &[StatsRow], output_path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)
        .context(format!("Failed to create CSV output file: {}", output_path.display()))?;

    for row in rows {
        writer.serialize(row).context("Failed to write CSV record")?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<StatsRow> {
        vec![
            StatsRow::new("hs_ppi.txt", PpiStats { proteins: 12, interactions: 340 }),
            StatsRow::new("sc_ppi.txt", PpiStats { proteins: 5, interactions: 7 }),
        ]
    }

    #[test]
    fn test_row_layout() {
        let row = &rows()[0];
        assert_eq!(format_stats_row(row), "          hs_ppi.txt   12   340");
    }

    #[test]
    fn test_wide_values_not_truncated() {
        let row = StatsRow::new(
            "a_very_long_dataset_name.txt",
            PpiStats { proteins: 123456, interactions: 1234567 },
        );
        assert_eq!(format_stats_row(&row), "a_very_long_dataset_name.txt 123456 1234567");
    }

    #[test]
    fn test_markdown_table() {
        let table = format_stats_table(&rows(), true);
        assert!(table.starts_with("```\n"));
        assert!(table.ends_with("```\n"));
        assert_eq!(table.lines().count(), 4);

        assert_eq!(format_stats_table(&[], false), "");
    }

    #[test]
    fn test_exports() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("stats.json");
        export_stats_json(&rows(), &json_path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json[1]["file"], "sc_ppi.txt");
        assert_eq!(json[0]["interactions"], 340);

        let csv_path = dir.path().join("stats.csv");
        export_stats_csv(&rows(), &csv_path).unwrap();
        let csv = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(
            csv,
            "file,proteins,interactions\nhs_ppi.txt,12,340\nsc_ppi.txt,5,7\n"
        );
    }
}
