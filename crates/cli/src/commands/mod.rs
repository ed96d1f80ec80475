//! CLI subcommand handlers

pub mod ledger;
pub mod record;
pub mod report;

use anyhow::Result;
use discobase_ledger::{DiscobaseConfig, ServiceContext};

use crate::db;

/// Open the database and build the service context for this run
pub async fn service_context(config: &DiscobaseConfig) -> Result<ServiceContext> {
    let db = db::connect(&config.database).await?;
    Ok(ServiceContext::new(db, config.ledger.clone()))
}

/// Truncate string for display
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
