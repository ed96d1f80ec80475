//! # Transaction Module
//!
//! Định nghĩa credit Transaction - một dòng trong sổ cái credit.
//! Mỗi transaction mang theo `balance` (credit saldo) sau khi áp dụng `delta`.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Loại giao dịch credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrxKind {
    /// Credit định kỳ (mỗi `interval_days` ngày)
    Addition,
    /// Mua record mới - trừ credit
    Purchase,
    /// Xóa record - hoàn lại credit
    Removal,
    /// Số dư ban đầu khi migrate dữ liệu cũ
    #[serde(rename = "Initial Load")]
    InitialLoad,
}

impl TrxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrxKind::Addition => "Addition",
            TrxKind::Purchase => "Purchase",
            TrxKind::Removal => "Removal",
            TrxKind::InitialLoad => "Initial Load",
        }
    }

    /// Tất cả các loại, theo thứ tự hiển thị
    pub fn all() -> [TrxKind; 4] {
        [
            TrxKind::Addition,
            TrxKind::Purchase,
            TrxKind::Removal,
            TrxKind::InitialLoad,
        ]
    }
}

impl FromStr for TrxKind {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "Addition" => Ok(TrxKind::Addition),
            "Purchase" => Ok(TrxKind::Purchase),
            "Removal" => Ok(TrxKind::Removal),
            "Initial Load" => Ok(TrxKind::InitialLoad),
            other => Err(CoreError::InvalidTrxKind(other.to_string())),
        }
    }
}

impl fmt::Display for TrxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Giao dịch sắp được ghi vào ledger (chưa có id và balance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub kind: TrxKind,
    pub date: NaiveDate,
    pub delta: i64,
    pub entry_ref: Option<i64>,
    pub entry_label: Option<String>,
}

impl NewTransaction {
    pub fn new(kind: TrxKind, date: NaiveDate, delta: i64) -> Self {
        Self {
            kind,
            date,
            delta,
            entry_ref: None,
            entry_label: None,
        }
    }

    // === Factory methods ===

    /// Addition credit, luôn là +`value`
    pub fn addition(date: NaiveDate, value: i64) -> Self {
        Self::new(TrxKind::Addition, date, value)
    }

    /// Purchase: debit `credit_cost` cho entry vừa tạo
    pub fn purchase(date: NaiveDate, credit_cost: i64, entry_id: i64) -> Self {
        Self::new(TrxKind::Purchase, date, -credit_cost).with_entry(entry_id)
    }

    /// Removal: hoàn lại `credit_cost`, entry đã bị xóa nên không có entry_ref
    pub fn removal(date: NaiveDate, credit_cost: i64, label: &str) -> Self {
        Self::new(TrxKind::Removal, date, credit_cost).with_label(label)
    }

    pub fn initial_load(date: NaiveDate, delta: i64) -> Self {
        Self::new(TrxKind::InitialLoad, date, delta)
    }

    // === Builder methods ===

    pub fn with_entry(mut self, entry_id: i64) -> Self {
        self.entry_ref = Some(entry_id);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.entry_label = Some(label.to_string());
        self
    }
}

/// Một dòng trong credit ledger.
///
/// Immutable sau khi ghi, ngoại trừ `entry_label` (denormalized).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// ID tăng dần theo thứ tự insert, không tái sử dụng
    pub id: i64,
    /// Ngày hiệu lực (không nhất thiết là ngày ghi)
    pub date: NaiveDate,
    pub kind: TrxKind,
    /// Thay đổi có dấu
    pub delta: i64,
    /// Credit saldo sau khi áp dụng delta
    pub balance: i64,
    /// Record gây ra transaction này (NULL sau khi record bị xóa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_ref: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_label: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Kiểm tra transaction có tăng credit không
    pub fn is_credit(&self) -> bool {
        self.delta > 0
    }

    pub fn is_debit(&self) -> bool {
        self.delta < 0
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (value={}, saldo={}, date={})",
            self.kind, self.delta, self.balance, self.date
        )
    }
}
