//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    create_pool, init_database, run_migrations, ArchiveRepo, EntryRepo, LookupRepo,
    TransactionRepo, TrxFilter,
};
pub use schema::{ArchiveRow, ArtistRow, RecordRow, TransactionRow};
