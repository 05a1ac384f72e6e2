//! Stock report: a derived, read-only view of the stock table.
//!
//! Rendered as UTF-8 CSV with the legacy columns. Generation is a pure
//! function of the ledger, so repeated runs without intervening mutations
//! produce byte-identical output.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::ledger::Ledger;

/// Default download filename for the stock report.
pub const REPORT_FILENAME: &str = "estoque_quermesse.csv";

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    #[serde(rename = "Item")]
    item: &'a str,
    #[serde(rename = "Quantidade")]
    quantity: u64,
    #[serde(rename = "Unidade")]
    unit: &'a str,
}

/// Write the stock report as CSV to `out`.
///
/// # Errors
///
/// Returns an error if serialization or the underlying writer fails.
pub fn write_csv<W: Write>(ledger: &Ledger, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer
        .write_record(["Item", "Quantidade", "Unidade"])
        .context("write report header")?;
    for item in &ledger.stock {
        writer
            .serialize(ReportRow {
                item: &item.name,
                quantity: item.quantity,
                unit: &item.unit,
            })
            .with_context(|| format!("serialize report row '{}'", item.name))?;
    }
    writer.flush().context("flush report")?;
    Ok(())
}

/// Render the stock report to an in-memory CSV string.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_csv_string(ledger: &Ledger) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(ledger, &mut buf)?;
    String::from_utf8(buf).context("report is not valid UTF-8")
}

/// Write the stock report to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_csv_file(ledger: &Ledger, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create report directory {}", parent.display()))?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("create report file {}", path.display()))?;
    write_csv(ledger, file)
}

#[cfg(test)]
mod tests {
    use super::{to_csv_string, write_csv_file};
    use crate::ledger::Ledger;
    use crate::model::Direction;
    use tempfile::TempDir;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.register_item("Fogaça", "Kg").expect("register");
        ledger.register_item("Gelo", "Kg").expect("register");
        ledger
            .apply_movement("Fogaça", 10, Direction::Increase, None)
            .expect("increase");
        ledger
    }

    #[test]
    fn report_has_legacy_header_and_rows() {
        let csv = to_csv_string(&sample_ledger()).expect("render");
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Item,Quantidade,Unidade"));
        assert_eq!(lines.next(), Some("Fogaça,10,Kg"));
        assert_eq!(lines.next(), Some("Gelo,0,Kg"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn report_generation_is_idempotent() {
        let ledger = sample_ledger();
        let first = to_csv_string(&ledger).expect("first render");
        let second = to_csv_string(&ledger).expect("second render");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_ledger_renders_header_only() {
        let csv = to_csv_string(&Ledger::new()).expect("render");
        assert_eq!(csv.trim(), "Item,Quantidade,Unidade");
    }

    #[test]
    fn report_file_is_created_with_parents() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("exports").join("estoque_quermesse.csv");

        write_csv_file(&sample_ledger(), &path).expect("write");
        let content = std::fs::read_to_string(&path).expect("read back");
        assert!(content.starts_with("Item,Quantidade,Unidade"));
    }
}
