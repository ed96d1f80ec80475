//! # Archive Module
//!
//! Snapshot nông ("dump") của một record, được tạo đúng một lần ngay trước khi xóa.
//! Ledger không bao giờ đọc lại snapshot - đây chỉ là nơi lưu trữ cho audit/recovery.

use crate::entry::CatalogEntry;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bản sao các trường hiển thị của record tại thời điểm xóa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveSnapshot {
    /// ID của record gốc
    pub legacy_id: i64,
    pub title: String,
    pub year: i32,
    pub record_format: String,
    pub color: String,
    pub remarks: String,
    pub genre: String,
    /// Tên các nghệ sĩ, nối bằng " / "
    pub artists: String,
    pub labels: String,
    pub purchase_date: NaiveDate,
    pub price: Decimal,
    pub rating: Option<i64>,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

impl ArchiveSnapshot {
    /// Chụp snapshot từ record hiện tại
    pub fn snapshot(entry: &CatalogEntry) -> Self {
        let details = &entry.details;
        Self {
            legacy_id: entry.id,
            title: details.title.clone(),
            year: details.year,
            record_format: details.record_format.clone(),
            color: details.color.clone(),
            remarks: details.remarks.clone(),
            genre: details.genre.clone(),
            artists: entry.artists_str(),
            labels: entry.labels_str(),
            purchase_date: details.purchase_date,
            price: details.price,
            rating: Some(details.rating.value()),
            review: details.review.clone(),
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for ArchiveSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.artists, self.title, self.year)
    }
}
