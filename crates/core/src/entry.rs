//! # Catalog Entry Module
//!
//! Định nghĩa record trong catalog và API tạo record hai pha:
//! `EntryDraft::new` → `attach_relations` → `finalize` (ở tầng service).
//! Display label chỉ được tính sau khi tất cả relations đã được gắn.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Giá tối đa (DECIMAL(6,2))
const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 2);

/// Số credit mà một record tiêu tốn khi mua. Chỉ cho phép 0 hoặc 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CreditCost(u8);

impl CreditCost {
    pub const FREE: CreditCost = CreditCost(0);
    pub const ONE: CreditCost = CreditCost(1);

    pub fn new(value: i64) -> CoreResult<Self> {
        match value {
            0 => Ok(Self::FREE),
            1 => Ok(Self::ONE),
            other => Err(CoreError::InvalidCreditCost(other)),
        }
    }

    pub fn value(&self) -> i64 {
        self.0 as i64
    }
}

impl Default for CreditCost {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<i64> for CreditCost {
    type Error = CoreError;

    fn try_from(value: i64) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<CreditCost> for i64 {
    fn from(cost: CreditCost) -> Self {
        cost.value()
    }
}

/// Đánh giá record, từ 0 đến 5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> CoreResult<Self> {
        if (0..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoreError::InvalidRating(value))
        }
    }

    pub fn value(&self) -> i64 {
        self.0 as i64
    }
}

impl TryFrom<i64> for Rating {
    type Error = CoreError;

    fn try_from(value: i64) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

/// Nghệ sĩ, unique theo (name, country).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub country: String,
}

impl Artist {
    pub fn new(name: &str, country: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            country: country.trim().to_string(),
        }
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.country)
    }
}

/// Các trường scalar của record.
///
/// Ledger chỉ quan tâm đến `purchase_date` và `credit_cost`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDetails {
    pub title: String,
    pub year: i32,
    pub record_format: String,
    pub color: String,
    pub remarks: String,
    pub genre: String,
    pub purchase_date: NaiveDate,
    pub price: Decimal,
    pub is_digitized: bool,
    pub credit_cost: CreditCost,
    pub rating: Rating,
    pub review: String,
    /// ID trên catalog service bên ngoài (Discogs), None nếu chưa có
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discogs_id: Option<i64>,
}

impl EntryDetails {
    /// Tạo details với các giá trị mặc định (LP, credit cost 1, rating 0)
    pub fn new(title: &str, year: i32, purchase_date: NaiveDate, price: Decimal) -> Self {
        Self {
            title: title.trim().to_string(),
            year,
            record_format: "LP".to_string(),
            color: String::new(),
            remarks: String::new(),
            genre: "Unknown".to_string(),
            purchase_date,
            price,
            is_digitized: false,
            credit_cost: CreditCost::default(),
            rating: Rating::default(),
            review: String::new(),
            discogs_id: None,
        }
    }

    // === Builder methods ===

    pub fn with_format(mut self, record_format: &str) -> Self {
        self.record_format = record_format.to_string();
        self
    }

    pub fn with_genre(mut self, genre: &str) -> Self {
        self.genre = genre.to_string();
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_remarks(mut self, remarks: &str) -> Self {
        self.remarks = remarks.to_string();
        self
    }

    pub fn with_credit_cost(mut self, credit_cost: CreditCost) -> Self {
        self.credit_cost = credit_cost;
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_review(mut self, review: &str) -> Self {
        self.review = review.to_string();
        self
    }

    pub fn digitized(mut self) -> Self {
        self.is_digitized = true;
        self
    }

    pub fn with_discogs_id(mut self, discogs_id: i64) -> Self {
        self.discogs_id = Some(discogs_id);
        self
    }

    /// Validate các trường không được kiểm tra bởi kiểu dữ liệu
    pub fn validate(&self) -> CoreResult<()> {
        if self.title.is_empty() {
            return Err(CoreError::ValidationError("title must not be empty".into()));
        }
        if !(1..=9999).contains(&self.year) {
            return Err(CoreError::InvalidYear(self.year as i64));
        }
        if self.price.is_sign_negative() || self.price >= MAX_PRICE {
            return Err(CoreError::InvalidPrice(self.price.to_string()));
        }
        Ok(())
    }
}

/// Record chưa được lưu - pha 1 của API tạo record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub details: EntryDetails,
    pub artists: Vec<Artist>,
    pub labels: Vec<String>,
}

impl EntryDraft {
    pub fn new(details: EntryDetails) -> Self {
        Self {
            details,
            artists: Vec::new(),
            labels: Vec::new(),
        }
    }

    /// Pha 2: gắn các relations many-to-many
    pub fn attach_relations(mut self, artists: Vec<Artist>, labels: Vec<String>) -> Self {
        self.artists = artists;
        self.labels = labels;
        self
    }

    /// Kiểm tra draft đã đủ điều kiện finalize chưa
    pub fn validate(&self) -> CoreResult<()> {
        self.details.validate()?;
        if self.artists.is_empty() {
            return Err(CoreError::MissingArtists(self.details.title.clone()));
        }
        Ok(())
    }

    /// Display label sẽ được ghi vào Purchase transaction
    pub fn display_label(&self) -> String {
        display_label(&self.artists, &self.details.title, self.details.year)
    }
}

/// Record đã lưu trong catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i64,
    #[serde(flatten)]
    pub details: EntryDetails,
    pub artists: Vec<Artist>,
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntry {
    pub fn title(&self) -> &str {
        &self.details.title
    }

    pub fn credit_cost(&self) -> CreditCost {
        self.details.credit_cost
    }

    pub fn purchase_date(&self) -> NaiveDate {
        self.details.purchase_date
    }

    /// "Artist A / Artist B"
    pub fn artists_str(&self) -> String {
        join_names(self.artists.iter().map(|a| a.name.as_str()))
    }

    pub fn labels_str(&self) -> String {
        join_names(self.labels.iter().map(String::as_str))
    }

    /// "Artist A / Artist B - Title (Year)"
    pub fn display_label(&self) -> String {
        display_label(&self.artists, &self.details.title, self.details.year)
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

fn join_names<'a, I>(names: I) -> String
where
    I: Iterator<Item = &'a str>,
{
    names.collect::<Vec<_>>().join(" / ")
}

fn display_label(artists: &[Artist], title: &str, year: i32) -> String {
    format!(
        "{} - {} ({})",
        join_names(artists.iter().map(|a| a.name.as_str())),
        title,
        year
    )
}
