//! # Discobase Persistence
//!
//! Persistence layer cho Discobase - SQLite catalog + append-only credit ledger.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Database                               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────────┐ │
//! │  │   SQLite    │    │ LedgerStore │    │     Repos       │ │
//! │  │  (catalog)  │    │  (ledger)   │    │   (queries)     │ │
//! │  └─────────────┘    └─────────────┘    └─────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use discobase_persistence::{Database, EntryRepo};
//!
//! let db = Database::init_with_migrations("sqlite:discobase.db").await?;
//!
//! // Ghi vào ledger
//! db.ledger().append(NewTransaction::initial_load(today, 5)).await?;
//!
//! // Query qua repos
//! let count = EntryRepo::count(db.pool()).await?;
//! ```

pub mod error;
pub mod ledger;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use ledger::{LedgerStore, LedgerTx};
pub use sqlite::schema::{ArchiveRow, ArtistRow, RecordRow, TransactionRow};
pub use sqlite::{
    init_database, ArchiveRepo, EntryRepo, LookupRepo, TransactionRepo, TrxFilter,
};

use sqlx::SqlitePool;

/// Database facade - catalog tables + ledger
pub struct Database {
    ledger: LedgerStore,
}

impl Database {
    /// Mở database đã có schema
    ///
    /// # Arguments
    /// * `db_url` - SQLite database URL (e.g., "sqlite:discobase.db")
    pub async fn new(db_url: &str) -> PersistenceResult<Self> {
        let pool = sqlite::create_pool(db_url).await?;
        Self::from_pool(pool).await
    }

    /// Mở database và chạy migrations
    pub async fn init_with_migrations(db_url: &str) -> PersistenceResult<Self> {
        let pool = init_database(db_url).await?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> PersistenceResult<Self> {
        let ledger = LedgerStore::open(pool).await?;
        Ok(Self { ledger })
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        self.ledger.pool()
    }

    /// Get ledger store
    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Đóng pool
    pub async fn close(&self) {
        self.pool().close().await;
    }
}
