//! Database schema definitions
//!
//! Row types cho sqlx mapping từ SQLite tables.
//! Schema được định nghĩa trong migrations/20260301000000_init.sql

use crate::error::{PersistenceError, PersistenceResult};
use chrono::{DateTime, NaiveDate, Utc};
use discobase_core::{
    ArchiveSnapshot, Artist, CatalogEntry, CreditCost, EntryDetails, Rating, Transaction, TrxKind,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Row type cho bảng `transactions`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: i64,
    pub trx_date: NaiveDate,
    pub trx_type: String,
    pub trx_value: i64,
    pub credit_saldo: i64,
    pub record_id: Option<i64>,
    pub record_string: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row type cho bảng `records` (đã join format và genre)
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: i64,
    pub title: String,
    pub year: i32,
    pub record_format: String,
    pub color: String,
    pub remarks: String,
    pub genre: String,
    pub purchase_date: NaiveDate,
    pub price: String, // Decimal stored as TEXT
    pub is_digitized: bool,
    pub credit_value: i64,
    pub rating: i64,
    pub review: String,
    pub discogs_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row type cho join `record_artists` → `artists` → `countries`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ArtistRow {
    pub artist_name: String,
    pub country_name: String,
}

/// Row type cho bảng `archive_snapshots`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ArchiveRow {
    pub id: i64,
    pub legacy_id: i64,
    pub title: String,
    pub year: i32,
    pub record_format: String,
    pub color: String,
    pub remarks: String,
    pub genre: String,
    pub artists: String,
    pub labels: String,
    pub purchase_date: NaiveDate,
    pub price: String, // Decimal stored as TEXT
    pub rating: Option<i64>,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

// === Conversion implementations ===

fn parse_price(raw: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(raw).map_err(|e| PersistenceError::InvalidDecimal(format!("{}: {}", raw, e)))
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = PersistenceError;

    fn try_from(row: TransactionRow) -> PersistenceResult<Self> {
        let kind = TrxKind::from_str(&row.trx_type)
            .map_err(|_| PersistenceError::invalid_enum("trx_type", &row.trx_type))?;

        Ok(Transaction {
            id: row.id,
            date: row.trx_date,
            kind,
            delta: row.trx_value,
            balance: row.credit_saldo,
            entry_ref: row.record_id,
            entry_label: row.record_string,
            created_at: row.created_at,
        })
    }
}

impl From<ArtistRow> for Artist {
    fn from(row: ArtistRow) -> Self {
        Artist::new(&row.artist_name, &row.country_name)
    }
}

impl RecordRow {
    /// Ghép row với các relations thành `CatalogEntry`
    pub fn into_entry(self, artists: Vec<Artist>, labels: Vec<String>) -> PersistenceResult<CatalogEntry> {
        let credit_cost = CreditCost::new(self.credit_value)
            .map_err(|_| PersistenceError::invalid_enum("credit_value", self.credit_value))?;
        let rating = Rating::new(self.rating)
            .map_err(|_| PersistenceError::invalid_enum("rating", self.rating))?;

        let details = EntryDetails {
            title: self.title,
            year: self.year,
            record_format: self.record_format,
            color: self.color,
            remarks: self.remarks,
            genre: self.genre,
            purchase_date: self.purchase_date,
            price: parse_price(&self.price)?,
            is_digitized: self.is_digitized,
            credit_cost,
            rating,
            review: self.review,
            discogs_id: self.discogs_id,
        };

        Ok(CatalogEntry {
            id: self.id,
            details,
            artists,
            labels,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TryFrom<ArchiveRow> for ArchiveSnapshot {
    type Error = PersistenceError;

    fn try_from(row: ArchiveRow) -> PersistenceResult<Self> {
        Ok(ArchiveSnapshot {
            legacy_id: row.legacy_id,
            title: row.title,
            year: row.year,
            record_format: row.record_format,
            color: row.color,
            remarks: row.remarks,
            genre: row.genre,
            artists: row.artists,
            labels: row.labels,
            purchase_date: row.purchase_date,
            price: parse_price(&row.price)?,
            rating: row.rating,
            review: row.review,
            created_at: row.created_at,
        })
    }
}
