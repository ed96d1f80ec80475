//! Report generation

use anyhow::{Context, Result};
use chrono::NaiveDate;
use discobase_ledger::{DiscobaseConfig, LedgerService};
use discobase_persistence::ArchiveRepo;
use discobase_reports::{
    ArchiveReport, BalanceChart, CsvExporter, JsonExporter, LedgerReport, MarkdownExporter,
    ReportData, ReportExporter,
};
use std::fs;
use std::path::PathBuf;

use super::service_context;
use crate::{ReportFormat, ReportType};

/// Generate a report
pub async fn generate_report(
    config: &DiscobaseConfig,
    report_type: ReportType,
    format: ReportFormat,
    output: Option<PathBuf>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let ctx = service_context(config).await?;

    let content = match report_type {
        ReportType::Ledger => {
            let transactions = LedgerService::new(&ctx).get_ledger_range(from, to).await?;
            let report = LedgerReport::from_transactions("Credit Ledger", &transactions);
            export_report(&report, format)
        }
        ReportType::Archive => {
            let snapshots = ArchiveRepo::get_all(ctx.pool()).await?;
            let report = ArchiveReport::new("Archived Entries", snapshots);
            export_report(&report, format)
        }
        ReportType::Chart => {
            let transactions = LedgerService::new(&ctx).get_ledger_range(from, to).await?;
            BalanceChart::from_transactions(&transactions)
                .to_json(true)
                .context("Failed to serialize chart")?
        }
    };

    ctx.db().close().await;

    match output {
        Some(path) => {
            fs::write(&path, &content).context("Failed to write report file")?;
            println!("✅ Report generated: {:?}", path);
        }
        None => {
            println!("{}", content);
        }
    }

    Ok(())
}

/// Export report to specified format
fn export_report(report: &dyn ReportData, format: ReportFormat) -> String {
    match format {
        ReportFormat::Csv => CsvExporter::new().export(report),
        ReportFormat::Json => JsonExporter::new().export(report),
        ReportFormat::Markdown => MarkdownExporter::new().export(report),
    }
}
