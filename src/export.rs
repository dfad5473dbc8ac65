//! CSV export of the ledger.
//!
//! Produces a UTF-8 CSV with a byte-order mark so spreadsheet applications
//! detect the encoding. Fields containing commas, quotes, or newlines are
//! quoted with doubled inner quotes.

use crate::entities::transaction;
use std::fmt::Write;

const HEADER: &str = "id,date,description,amount,type,category,project_id,card_id,pocket_id";

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn opt_id(id: Option<i64>) -> String {
    id.map(|v| v.to_string()).unwrap_or_default()
}

/// Renders ledger entries as a CSV document, header first, prefixed with the
/// UTF-8 BOM.
#[must_use]
pub fn transactions_csv(entries: &[transaction::Model]) -> String {
    let mut out = String::from("\u{feff}");
    out.push_str(HEADER);
    out.push('\n');
    for entry in entries {
        let _ = writeln!(
            out,
            "{},{},{},{:.2},{},{},{},{},{}",
            entry.id,
            entry.date.format("%Y-%m-%d"),
            escape_csv(&entry.description),
            entry.amount,
            escape_csv(&entry.tx_type),
            escape_csv(&entry.category),
            opt_id(entry.project_id),
            opt_id(entry.card_id),
            opt_id(entry.pocket_id),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::NaiveDate;

    fn entry(description: &str) -> transaction::Model {
        transaction::Model {
            id: 7,
            date: NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
            description: description.to_string(),
            amount: 300_000.0,
            tx_type: "expense".to_string(),
            category: "Crew Fee".to_string(),
            project_id: Some(3),
            card_id: Some(1),
            pocket_id: None,
            ref_id: None,
            vendor_signature: None,
        }
    }

    #[test]
    fn test_csv_starts_with_bom_and_header() {
        let csv = transactions_csv(&[]);
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv[3..].starts_with("id,date,"));
    }

    #[test]
    fn test_plain_row() {
        let csv = transactions_csv(&[entry("Crew payout")]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "7,2026-08-29,Crew payout,300000.00,expense,Crew Fee,3,1,");
    }

    #[test]
    fn test_quotes_and_commas_escaped() {
        let csv = transactions_csv(&[entry("Lunch, crew \"extra\"")]);
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"Lunch, crew \"\"extra\"\"\""));
    }
}
