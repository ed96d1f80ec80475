//! Database initialization and status

use anyhow::{bail, Context, Result};
use discobase_ledger::DatabaseConfig;
use discobase_persistence::{ArchiveRepo, Database, EntryRepo, TransactionRepo};

/// Initialize the database with schema
pub async fn init_database(config: &DatabaseConfig, force: bool) -> Result<()> {
    let db_path = config.path.as_path();
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    println!("📦 Running migrations...");
    let db = Database::init_with_migrations(&config.url())
        .await
        .context("Failed to initialize database")?;
    db.close().await;

    Ok(())
}

/// Show database status
pub async fn show_status(config: &DatabaseConfig) -> Result<()> {
    let db_path = config.path.as_path();
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'discobase init' to create the database");
        return Ok(());
    }

    let db = connect(config).await?;
    let pool = db.pool();

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();

    let entries = EntryRepo::count(pool).await?;
    let transactions = TransactionRepo::count(pool).await?;
    let archived = ArchiveRepo::count(pool).await?;
    let balance = db.ledger().latest_balance().await;

    println!("   Entries:      {}", entries);
    println!("   Transactions: {}", transactions);
    println!("   Archived:     {}", archived);
    println!("   Saldo:        {}", balance);

    db.close().await;
    Ok(())
}

/// Open an initialized database
pub async fn connect(config: &DatabaseConfig) -> Result<Database> {
    let db_path = config.path.as_path();
    if !db_path.exists() {
        bail!(
            "Database not found at {:?}. Run 'discobase init' first.",
            db_path
        );
    }
    Database::new(&config.url())
        .await
        .context("Failed to connect to database. Run 'discobase init' first.")
}
