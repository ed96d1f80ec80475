//! # Ledger Store
//!
//! Append-only store cho credit ledger.
//!
//! Mọi thao tác ghi đi qua [`LedgerTx`], giữ lock trên running balance trong suốt
//! transaction: balance của dòng mới luôn bằng balance của dòng trước cộng delta,
//! kể cả khi nhiều task cùng ghi.
//!
//! Pool chỉ có một connection, nên không được dùng pool (hoặc gọi các method khác
//! của [`LedgerStore`]) khi đang giữ một [`LedgerTx`] - dùng [`LedgerTx::conn`].
//!
//! Mutex chỉ serialize các writer trong cùng process. [`LedgerStore::begin`] đọc
//! lại balance cuối cùng bên trong SQLite transaction, nên một process khác ghi
//! xen giữa không làm đứt chain; nhưng hai process ghi *đồng thời* vào cùng file
//! không được hỗ trợ.

use crate::error::PersistenceResult;
use crate::sqlite::repos::{TransactionRepo, TrxFilter};
use chrono::Utc;
use discobase_core::balance::checked_next_balance;
use discobase_core::{verify_chain, NewTransaction, Transaction, TrxKind};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Credit ledger trên SQLite
pub struct LedgerStore {
    pool: SqlitePool,
    /// Balance của transaction cuối cùng đã commit
    head: Mutex<i64>,
}

impl LedgerStore {
    /// Mở ledger, đọc balance hiện tại từ transaction cuối cùng
    pub async fn open(pool: SqlitePool) -> PersistenceResult<Self> {
        let head = TransactionRepo::latest(&pool)
            .await?
            .map(|row| row.credit_saldo)
            .unwrap_or(0);

        debug!(balance = head, "Ledger opened");
        Ok(Self {
            pool,
            head: Mutex::new(head),
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bắt đầu một unit of work. Các writer khác chờ đến khi commit hoặc drop.
    ///
    /// Balance được đọc lại từ database, không lấy từ cache.
    pub async fn begin(&self) -> PersistenceResult<LedgerTx<'_>> {
        let head = self.head.lock().await;
        let mut tx = self.pool.begin().await?;
        let balance = TransactionRepo::latest(&mut *tx)
            .await?
            .map(|row| row.credit_saldo)
            .unwrap_or(0);
        if balance != *head {
            warn!(
                cached = *head,
                stored = balance,
                "Ledger written outside this store, using stored balance"
            );
        }
        Ok(LedgerTx { head, tx, balance })
    }

    /// Ghi một transaction trong unit of work riêng
    pub async fn append(&self, trx: NewTransaction) -> PersistenceResult<Transaction> {
        let mut tx = self.begin().await?;
        let written = tx.append(trx).await?;
        tx.commit().await?;
        Ok(written)
    }

    /// Balance hiện tại (0 nếu ledger rỗng)
    pub async fn latest_balance(&self) -> i64 {
        *self.head.lock().await
    }

    /// Transaction mới nhất của một loại
    pub async fn latest(&self, kind: TrxKind) -> PersistenceResult<Option<Transaction>> {
        TransactionRepo::latest_of_kind(&self.pool, kind)
            .await?
            .map(Transaction::try_from)
            .transpose()
    }

    /// Liệt kê transactions theo filter, sắp xếp theo (date, id)
    pub async fn list(&self, filter: &TrxFilter) -> PersistenceResult<Vec<Transaction>> {
        TransactionRepo::list(&self.pool, filter)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Tất cả transactions theo thứ tự ghi
    pub async fn all(&self) -> PersistenceResult<Vec<Transaction>> {
        TransactionRepo::get_all(&self.pool)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Replay toàn bộ ledger, trả về balance cuối cùng.
    ///
    /// Lỗi `BalanceMismatch` chỉ ra transaction đầu tiên bị lệch.
    pub async fn verify(&self) -> PersistenceResult<i64> {
        let _guard = self.head.lock().await;
        let transactions: Vec<Transaction> = TransactionRepo::get_all(&self.pool)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<PersistenceResult<_>>()?;

        let balance = verify_chain(&transactions)?;
        info!(count = transactions.len(), balance, "Ledger verified");
        Ok(balance)
    }
}

/// Một unit of work trên ledger.
///
/// Drop mà không `commit` sẽ rollback mọi thay đổi (kể cả thay đổi catalog
/// thực hiện qua [`LedgerTx::conn`]).
pub struct LedgerTx<'a> {
    head: MutexGuard<'a, i64>,
    tx: sqlx::Transaction<'static, Sqlite>,
    balance: i64,
}

impl LedgerTx<'_> {
    /// Balance sau các append trong unit of work này
    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Connection của transaction, cho các repo khác
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// Ghi transaction với balance = balance trước + delta
    pub async fn append(&mut self, trx: NewTransaction) -> PersistenceResult<Transaction> {
        let balance = checked_next_balance(self.balance, trx.delta)?;
        let row = TransactionRepo::insert(&mut *self.tx, &trx, balance, Utc::now()).await?;
        self.balance = balance;

        debug!(
            id = row.id,
            kind = %trx.kind,
            delta = trx.delta,
            balance,
            "Transaction appended"
        );
        Transaction::try_from(row)
    }

    /// Commit, trả về balance mới
    pub async fn commit(self) -> PersistenceResult<i64> {
        let LedgerTx {
            mut head,
            tx,
            balance,
        } = self;
        tx.commit().await?;
        *head = balance;
        Ok(balance)
    }
}
