//! # Discobase Core
//!
//! Domain types cho record catalog và credit ledger.
//!
//! - [`Transaction`] - một dòng trong credit ledger, mang theo running balance
//! - [`CatalogEntry`] / [`EntryDraft`] - record trong catalog, tạo theo hai pha
//! - [`ArchiveSnapshot`] - bản sao record tại thời điểm xóa
//! - [`balance`] - quy tắc tính balance, thuần túy, không I/O

pub mod archive;
pub mod balance;
pub mod clock;
pub mod entry;
pub mod error;
pub mod transaction;

pub use archive::ArchiveSnapshot;
pub use balance::{next_balance, replay, verify_chain};
pub use clock::{Clock, FixedClock, SystemClock};
pub use entry::{Artist, CatalogEntry, CreditCost, EntryDetails, EntryDraft, Rating};
pub use error::{CoreError, CoreResult};
pub use transaction::{NewTransaction, Transaction, TrxKind};
