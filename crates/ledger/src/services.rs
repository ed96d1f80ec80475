//! Service context and ledger operations
//!
//! `ServiceContext` bundles the database, clock, config and hook registry that
//! the catalog and ledger services share.

use crate::config::LedgerConfig;
use crate::error::LedgerResult;
use crate::hooks::{HookContext, HookRegistry};
use crate::scheduler::AdditionScheduler;
use chrono::NaiveDate;
use discobase_core::{Clock, NewTransaction, SystemClock, Transaction};
use discobase_persistence::{Database, LedgerStore, TrxFilter};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

/// Context for catalog and ledger operations
pub struct ServiceContext {
    db: Database,
    clock: Arc<dyn Clock>,
    config: LedgerConfig,
    hooks: HookRegistry,
}

impl ServiceContext {
    /// Create context with the system clock and the standard handlers
    pub fn new(db: Database, config: LedgerConfig) -> Self {
        Self {
            db,
            clock: Arc::new(SystemClock),
            config,
            hooks: HookRegistry::standard(),
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the hook registry
    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn ledger(&self) -> &LedgerStore {
        self.db.ledger()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Hook context for a dispatch happening now
    pub fn hook_context(&self) -> HookContext {
        HookContext::new(self.clock.today())
    }
}

/// Ledger Service - catch-up, listing, initial load, verification
pub struct LedgerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LedgerService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Credit every Addition due by today
    pub async fn run_addition_catchup(&self) -> LedgerResult<Vec<Transaction>> {
        AdditionScheduler::new(self.ctx.ledger(), self.ctx.clock(), self.ctx.config())?
            .run()
            .await
    }

    /// Transactions ordered by (date, id), after running the catch-up.
    ///
    /// `filter` narrows by date range and kind.
    pub async fn get_ledger(&self, filter: &TrxFilter) -> LedgerResult<Vec<Transaction>> {
        self.run_addition_catchup().await?;
        Ok(self.ctx.ledger().list(filter).await?)
    }

    /// Transactions between two dates (inclusive), after running the catch-up
    pub async fn get_ledger_range(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<Vec<Transaction>> {
        let filter = TrxFilter {
            from,
            to,
            ..TrxFilter::default()
        };
        self.get_ledger(&filter).await
    }

    /// Record an existing saldo carried over from elsewhere
    pub async fn initial_load(&self, date: NaiveDate, delta: i64) -> LedgerResult<Transaction> {
        let trx = self
            .ctx
            .ledger()
            .append(NewTransaction::initial_load(date, delta))
            .await?;

        info!(
            trx_id = trx.id,
            %date,
            delta,
            balance = trx.balance,
            "Initial load recorded"
        );
        Ok(trx)
    }

    /// Current balance (0 on an empty ledger)
    pub async fn latest_balance(&self) -> i64 {
        self.ctx.ledger().latest_balance().await
    }

    /// Replay the ledger; fails with the first transaction whose stored balance
    /// disagrees with the replayed one
    pub async fn verify(&self) -> LedgerResult<i64> {
        Ok(self.ctx.ledger().verify().await?)
    }
}
