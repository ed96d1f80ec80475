//! Discobase CLI - record catalog and credit ledger from the command line
//!
//! Usage:
//! ```bash
//! discobase init
//! discobase record add --title "Album of Blood" --year 2022 --artist "Raphmadon:Switzerland" \
//!     --purchase-date 1999-01-01 --price 20
//! discobase record artists 1 --artist "Raphmadon:Switzerland" --artist "Gorgor:Norway"
//! discobase record delete 1
//! discobase ledger initial-load --date 2020-01-01 --delta 5
//! discobase ledger list --kind purchase
//! discobase report --type chart --format json --output chart.json
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use discobase_core::{Artist, TrxKind};
use discobase_ledger::{ConfigLoader, DiscobaseConfig};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod db;

use commands::{ledger, record, report};

/// Discobase - personal record catalog with a credit ledger
#[derive(Parser)]
#[command(name = "discobase")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Database file path (overrides the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Config file path (default: ./discobase.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize database with schema
    Init {
        /// Force re-initialization (drops existing data)
        #[arg(long)]
        force: bool,
    },

    /// Show database status
    Status,

    /// Catalog entries
    Record {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Credit ledger
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },

    /// Generate reports
    Report {
        /// Report type
        #[arg(long = "type", default_value = "ledger")]
        report_type: ReportType,
        /// Report format (ignored for charts, which are always JSON)
        #[arg(long, default_value = "markdown")]
        format: ReportFormat,
        /// Output file path
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Add an entry (records a Purchase)
    Add(NewEntryArgs),
    /// Import an entry without touching the ledger
    Import(NewEntryArgs),
    /// List all entries
    List,
    /// Show entry details
    Show {
        /// Entry ID
        id: i64,
    },
    /// Replace the artists of an entry
    Artists {
        /// Entry ID
        id: i64,
        /// Artist as NAME:COUNTRY (repeatable)
        #[arg(long = "artist", required = true, value_parser = parse_artist)]
        artists: Vec<Artist>,
    },
    /// Replace the labels of an entry
    Labels {
        /// Entry ID
        id: i64,
        /// Label name (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Edit scalar fields of an entry (no ledger effect)
    Update {
        /// Entry ID
        id: i64,
        #[command(flatten)]
        patch: EntryPatchArgs,
    },
    /// Delete an entry (archives it and records a Removal)
    Delete {
        /// Entry ID
        id: i64,
    },
}

#[derive(Args)]
pub struct NewEntryArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub year: i32,
    /// Artist as NAME:COUNTRY (repeatable)
    #[arg(long = "artist", required = true, value_parser = parse_artist)]
    pub artists: Vec<Artist>,
    /// Label name (repeatable)
    #[arg(long = "label")]
    pub labels: Vec<String>,
    /// Purchase date (YYYY-MM-DD)
    #[arg(long)]
    pub purchase_date: NaiveDate,
    #[arg(long, default_value = "0")]
    pub price: Decimal,
    #[arg(long, default_value = "LP")]
    pub format: String,
    #[arg(long, default_value = "Unknown")]
    pub genre: String,
    #[arg(long, default_value = "")]
    pub color: String,
    #[arg(long, default_value = "")]
    pub remarks: String,
    /// Credit cost (0 or 1)
    #[arg(long, default_value_t = 1)]
    pub credit: i64,
    /// Rating (0-5)
    #[arg(long, default_value_t = 0)]
    pub rating: i64,
    #[arg(long, default_value = "")]
    pub review: String,
    #[arg(long)]
    pub digitized: bool,
    #[arg(long)]
    pub discogs_id: Option<i64>,
}

#[derive(Args)]
pub struct EntryPatchArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    #[arg(long)]
    pub purchase_date: Option<NaiveDate>,
    #[arg(long)]
    pub price: Option<Decimal>,
    #[arg(long)]
    pub format: Option<String>,
    #[arg(long)]
    pub genre: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub remarks: Option<String>,
    #[arg(long)]
    pub credit: Option<i64>,
    #[arg(long)]
    pub rating: Option<i64>,
    #[arg(long)]
    pub review: Option<String>,
    #[arg(long)]
    pub digitized: Option<bool>,
    #[arg(long)]
    pub discogs_id: Option<i64>,
}

#[derive(Subcommand)]
pub enum LedgerAction {
    /// List transactions, newest first (runs the addition catch-up first)
    List {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only this kind
        #[arg(long)]
        kind: Option<KindArg>,
        /// Oldest first
        #[arg(long)]
        ascending: bool,
    },
    /// Credit all Additions due by today
    Catchup,
    /// Replay the ledger and check every stored balance
    Verify,
    /// Record a saldo carried over from elsewhere
    InitialLoad {
        /// Effective date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Signed credit change
        #[arg(long, allow_hyphen_values = true)]
        delta: i64,
    },
    /// Show the current balance
    Balance,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Addition,
    Purchase,
    Removal,
    InitialLoad,
}

impl KindArg {
    pub fn to_core_kind(&self) -> TrxKind {
        match self {
            KindArg::Addition => TrxKind::Addition,
            KindArg::Purchase => TrxKind::Purchase,
            KindArg::Removal => TrxKind::Removal,
            KindArg::InitialLoad => TrxKind::InitialLoad,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Csv,
    Json,
    Markdown,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportType {
    Ledger,
    Archive,
    Chart,
}

/// Parse `NAME:COUNTRY`; the country defaults to "Unknown"
fn parse_artist(raw: &str) -> Result<Artist, String> {
    let (name, country) = match raw.rsplit_once(':') {
        Some((name, country)) => (name.trim(), country.trim()),
        None => (raw.trim(), "Unknown"),
    };
    if name.is_empty() {
        return Err(format!("artist name missing in '{}'", raw));
    }
    let country = if country.is_empty() { "Unknown" } else { country };
    Ok(Artist::new(name, country))
}

fn init_tracing(config: &DiscobaseConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        ConfigLoader::load_or_default(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }
    init_tracing(&config);
    tracing::debug!(db_path = ?config.database.path, "Using database");

    match cli.command {
        Commands::Init { force } => {
            db::init_database(&config.database, force).await?;
            println!("✅ Database initialized at {:?}", config.database.path);
        }

        Commands::Status => {
            db::show_status(&config.database).await?;
        }

        Commands::Record { action } => {
            record::handle(&config, action).await?;
        }

        Commands::Ledger { action } => {
            ledger::handle(&config, action).await?;
        }

        Commands::Report {
            report_type,
            format,
            output,
            from,
            to,
        } => {
            report::generate_report(&config, report_type, format, output, from, to).await?;
        }
    }

    Ok(())
}
