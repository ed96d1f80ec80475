//! Ledger and archive reports

use chrono::{DateTime, NaiveDate, Utc};
use discobase_core::{ArchiveSnapshot, Transaction, TrxKind};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::exporters::ReportData;

// ============================================================================
// Ledger Report
// ============================================================================

/// One transaction line of a ledger report
#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TrxKind,
    pub delta: i64,
    pub balance: i64,
    pub entry: String,
}

impl From<&Transaction> for LedgerRow {
    fn from(trx: &Transaction) -> Self {
        Self {
            id: trx.id,
            date: trx.date,
            kind: trx.kind,
            delta: trx.delta,
            balance: trx.balance,
            entry: trx.entry_label.clone().unwrap_or_default(),
        }
    }
}

/// Credit ledger report
#[derive(Debug, Clone)]
pub struct LedgerReport {
    pub title: String,
    pub rows: Vec<LedgerRow>,
    pub generated_at: DateTime<Utc>,
}

impl LedgerReport {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Rows in the given order
    pub fn from_transactions(title: &str, transactions: &[Transaction]) -> Self {
        let mut report = Self::new(title);
        report.rows = transactions.iter().map(LedgerRow::from).collect();
        report
    }

    /// (count, delta total) per kind, in kind order; kinds without rows omitted
    pub fn totals_by_kind(&self) -> Vec<(TrxKind, usize, i64)> {
        TrxKind::all()
            .into_iter()
            .filter_map(|kind| {
                let of_kind: Vec<_> = self.rows.iter().filter(|r| r.kind == kind).collect();
                if of_kind.is_empty() {
                    None
                } else {
                    Some((kind, of_kind.len(), of_kind.iter().map(|r| r.delta).sum()))
                }
            })
            .collect()
    }

    /// Balance after the most recently written transaction in the report
    pub fn final_balance(&self) -> Option<i64> {
        self.rows.iter().max_by_key(|r| r.id).map(|r| r.balance)
    }
}

impl ReportData for LedgerReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        vec![
            "ID".to_string(),
            "Date".to_string(),
            "Type".to_string(),
            "Value".to_string(),
            "Saldo".to_string(),
            "Entry".to_string(),
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.to_string(),
                    r.kind.to_string(),
                    r.delta.to_string(),
                    r.balance.to_string(),
                    r.entry.clone(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        let mut summary = vec![("Transactions".to_string(), self.rows.len().to_string())];
        for (kind, count, total) in self.totals_by_kind() {
            summary.push((format!("{} Total", kind), format!("{} ({} trx)", total, count)));
        }
        summary.push((
            "Final Saldo".to_string(),
            self.final_balance()
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ));
        summary.push(("Generated At".to_string(), self.generated_at.to_rfc3339()));
        summary
    }

    fn json_rows(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.id,
                    "date": r.date,
                    "type": r.kind,
                    "value": r.delta,
                    "saldo": r.balance,
                    "entry": r.entry,
                })
            })
            .collect()
    }
}

// ============================================================================
// Archive Report
// ============================================================================

/// Report over archived (deleted) entries
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub title: String,
    pub snapshots: Vec<ArchiveSnapshot>,
    pub generated_at: DateTime<Utc>,
}

impl ArchiveReport {
    pub fn new(title: &str, snapshots: Vec<ArchiveSnapshot>) -> Self {
        Self {
            title: title.to_string(),
            snapshots,
            generated_at: Utc::now(),
        }
    }

    pub fn total_price(&self) -> Decimal {
        self.snapshots.iter().map(|s| s.price).sum()
    }
}

impl ReportData for ArchiveReport {
    fn title(&self) -> &str {
        &self.title
    }

    fn headers(&self) -> Vec<String> {
        vec![
            "Legacy ID".to_string(),
            "Artists".to_string(),
            "Title".to_string(),
            "Year".to_string(),
            "Genre".to_string(),
            "Labels".to_string(),
            "Purchase Date".to_string(),
            "Price".to_string(),
            "Archived At".to_string(),
        ]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.snapshots
            .iter()
            .map(|s| {
                vec![
                    s.legacy_id.to_string(),
                    s.artists.clone(),
                    s.title.clone(),
                    s.year.to_string(),
                    s.genre.clone(),
                    s.labels.clone(),
                    s.purchase_date.to_string(),
                    s.price.to_string(),
                    s.created_at.to_rfc3339(),
                ]
            })
            .collect()
    }

    fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Archived Entries".to_string(), self.snapshots.len().to_string()),
            ("Total Price".to_string(), self.total_price().to_string()),
            ("Generated At".to_string(), self.generated_at.to_rfc3339()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporters::{CsvExporter, JsonExporter, MarkdownExporter, ReportExporter};
    use rust_decimal_macros::dec;

    fn trx(id: i64, day: u32, kind: TrxKind, delta: i64, balance: i64, label: Option<&str>) -> Transaction {
        Transaction {
            id,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            kind,
            delta,
            balance,
            entry_ref: None,
            entry_label: label.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            trx(1, 1, TrxKind::InitialLoad, 5, 5, None),
            trx(2, 2, TrxKind::Purchase, -1, 4, Some("Raphmadon - Album of Blood (2022)")),
            trx(3, 12, TrxKind::Addition, 1, 5, None),
            trx(4, 20, TrxKind::Removal, 1, 6, Some("Raphmadon - Album of Blood (2022)")),
            trx(5, 22, TrxKind::Addition, 1, 7, None),
        ]
    }

    #[test]
    fn test_totals_and_final_balance() {
        let report = LedgerReport::from_transactions("Ledger", &sample());

        let totals = report.totals_by_kind();
        assert_eq!(totals[0], (TrxKind::Addition, 2, 2));
        assert!(totals.contains(&(TrxKind::Purchase, 1, -1)));
        assert_eq!(report.final_balance(), Some(7));
    }

    #[test]
    fn test_final_balance_ignores_row_order() {
        let mut transactions = sample();
        transactions.reverse();
        let report = LedgerReport::from_transactions("Newest first", &transactions);
        assert_eq!(report.final_balance(), Some(7));
        assert_eq!(LedgerReport::new("Empty").final_balance(), None);
    }

    #[test]
    fn test_ledger_csv() {
        let report = LedgerReport::from_transactions("Ledger", &sample());
        let output = CsvExporter::new().export(&report);

        assert!(output.starts_with("ID,Date,Type,Value,Saldo,Entry\n"));
        assert!(output.contains("1,2024-01-01,Initial Load,5,5,\n"));
        assert!(output.contains("2,2024-01-02,Purchase,-1,4,Raphmadon - Album of Blood (2022)"));
    }

    #[test]
    fn test_ledger_json_has_numbers() {
        let report = LedgerReport::from_transactions("Ledger", &sample());
        let output = JsonExporter::new().export(&report);
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["data"][1]["value"], -1);
        assert_eq!(parsed["data"][1]["type"], "Purchase");
        assert_eq!(parsed["data"][0]["type"], "Initial Load");
        assert_eq!(parsed["summary"]["Final Saldo"], "7");
    }

    #[test]
    fn test_archive_report() {
        let snapshot = ArchiveSnapshot {
            legacy_id: 3,
            title: "Album of Blood".into(),
            year: 2022,
            record_format: "LP".into(),
            color: String::new(),
            remarks: String::new(),
            genre: "Metal of Death".into(),
            artists: "Raphmadon".into(),
            labels: "Capsized Duck Records".into(),
            purchase_date: NaiveDate::from_ymd_opt(1999, 1, 1).unwrap(),
            price: dec!(20.50),
            rating: Some(4),
            review: String::new(),
            created_at: Utc::now(),
        };
        let report = ArchiveReport::new("Archive", vec![snapshot.clone(), snapshot]);

        assert_eq!(report.total_price(), dec!(41.00));
        let output = MarkdownExporter::new().export(&report);
        assert!(output.contains("- **Archived Entries**: 2"));
        assert!(output.contains("| 3 | Raphmadon | Album of Blood | 2022 |"));
    }
}
