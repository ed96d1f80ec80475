//! Addition scheduler
//!
//! Catch-up loop that credits one Addition per elapsed interval since the last
//! Addition, each dated retroactively on its interval boundary.

use chrono::{Days, NaiveDate};
use discobase_core::{Clock, NewTransaction, Transaction, TrxKind};
use discobase_persistence::{LedgerStore, TransactionRepo};
use tracing::{debug, info};

use crate::config::LedgerConfig;
use crate::error::LedgerResult;

/// Addition catch-up
pub struct AdditionScheduler<'a> {
    ledger: &'a LedgerStore,
    clock: &'a dyn Clock,
    interval_days: u32,
    addition_value: i64,
}

impl<'a> AdditionScheduler<'a> {
    /// Fails with `LedgerError::Config` on a zero interval or a non-positive
    /// addition value
    pub fn new(
        ledger: &'a LedgerStore,
        clock: &'a dyn Clock,
        config: &LedgerConfig,
    ) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self {
            ledger,
            clock,
            interval_days: config.interval_days,
            addition_value: config.addition_value,
        })
    }

    /// Date of the next Addition after `last`, if it is due by `today`
    fn next_due(&self, last: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
        let elapsed = today.signed_duration_since(last).num_days();
        if elapsed < i64::from(self.interval_days) {
            return None;
        }
        last.checked_add_days(Days::new(u64::from(self.interval_days)))
    }

    /// Credit every Addition due by today.
    ///
    /// Each Addition commits in its own unit of work. With no prior Addition,
    /// exactly one Addition dated today is seeded. Returns the new transactions.
    pub async fn run(&self) -> LedgerResult<Vec<Transaction>> {
        let today = self.clock.today();
        let mut inserted = Vec::new();

        loop {
            let mut tx = self.ledger.begin().await?;

            let last = match TransactionRepo::latest_of_kind(tx.conn(), TrxKind::Addition).await? {
                Some(row) => row.trx_date,
                None => today
                    .checked_sub_days(Days::new(u64::from(self.interval_days)))
                    .unwrap_or(today),
            };

            let Some(due) = self.next_due(last, today) else {
                break;
            };

            let trx = tx
                .append(NewTransaction::addition(due, self.addition_value))
                .await?;
            tx.commit().await?;
            inserted.push(trx);
        }

        if inserted.is_empty() {
            debug!(%today, "No Addition due");
        } else {
            info!(
                count = inserted.len(),
                %today,
                balance = inserted.last().map(|t| t.balance),
                "Additions credited"
            );
        }
        Ok(inserted)
    }
}
