//! # Discobase Reports
//!
//! Report generation - CSV, JSON, Markdown ledger reports and chart data.
//!
//! ## Exporters
//!
//! - [`CsvExporter`] - CSV format with proper escaping
//! - [`JsonExporter`] - JSON format (pretty or compact)
//! - [`MarkdownExporter`] - Markdown tables
//!
//! ## Reports
//!
//! - [`LedgerReport`] - credit transactions with per-kind totals and final saldo
//! - [`ArchiveReport`] - snapshots of deleted entries
//! - [`BalanceChart`] - saldo line plus per-kind marker series, as JSON
//!
//! ## Example
//!
//! ```rust,ignore
//! use discobase_reports::{CsvExporter, LedgerReport, ReportExporter};
//!
//! let report = LedgerReport::from_transactions("Credit Ledger", &transactions);
//! let csv_output = CsvExporter::new().export(&report);
//! ```

pub mod chart;
pub mod exporters;
pub mod ledger_report;

// Re-export main types
pub use chart::{kind_color, BalanceChart, ChartPoint, ChartSeries, SeriesMode};
pub use exporters::{CsvExporter, JsonExporter, MarkdownExporter, ReportData, ReportExporter};
pub use ledger_report::{ArchiveReport, LedgerReport, LedgerRow};
