//! Built-in lifecycle handlers that keep the ledger in step with the catalog

use async_trait::async_trait;
use discobase_core::{ArchiveSnapshot, NewTransaction};
use discobase_persistence::{ArchiveRepo, LedgerTx, TransactionRepo};
use tracing::{debug, info, warn};

use super::traits::{CatalogEvent, HookContext, LifecycleHandler, LifecycleStage};
use crate::error::LedgerResult;

/// Appends a Purchase when an entry is created.
///
/// Dated on the entry's purchase date, `delta = -credit_cost`, referencing the
/// entry and carrying its full display label.
pub struct PurchaseHandler;

#[async_trait]
impl LifecycleHandler for PurchaseHandler {
    fn name(&self) -> &str {
        "purchase"
    }

    fn stage(&self) -> LifecycleStage {
        LifecycleStage::Created
    }

    async fn handle(
        &self,
        event: &CatalogEvent<'_>,
        _ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<()> {
        let entry = event.entry();
        let trx = NewTransaction::purchase(
            entry.purchase_date(),
            entry.credit_cost().value(),
            entry.id,
        )
        .with_label(&entry.display_label());

        let written = tx.append(trx).await?;
        info!(
            entry_id = entry.id,
            trx_id = written.id,
            balance = written.balance,
            "Purchase recorded"
        );
        Ok(())
    }
}

/// Refreshes the label of an entry's Purchase after its artists changed.
///
/// Entries without a Purchase (imported ones) are left alone.
pub struct LabelBackfillHandler;

#[async_trait]
impl LifecycleHandler for LabelBackfillHandler {
    fn name(&self) -> &str {
        "label_backfill"
    }

    fn stage(&self) -> LifecycleStage {
        LifecycleStage::RelationsChanged
    }

    async fn handle(
        &self,
        event: &CatalogEvent<'_>,
        _ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<()> {
        let entry = event.entry();

        match TransactionRepo::purchase_for_entry(tx.conn(), entry.id).await? {
            Some(purchase) => {
                let label = entry.display_label();
                if purchase.record_string.as_deref() == Some(label.as_str()) {
                    debug!(trx_id = purchase.id, "Purchase label already current");
                    return Ok(());
                }
                TransactionRepo::update_label(tx.conn(), purchase.id, &label).await?;
                debug!(trx_id = purchase.id, label = %label, "Purchase label backfilled");
            }
            None => {
                warn!(entry_id = entry.id, "No Purchase for entry, label not backfilled");
            }
        }
        Ok(())
    }
}

/// Stores an archive snapshot of an entry about to be deleted
pub struct ArchiveHandler;

#[async_trait]
impl LifecycleHandler for ArchiveHandler {
    fn name(&self) -> &str {
        "archive"
    }

    fn stage(&self) -> LifecycleStage {
        LifecycleStage::PreDelete
    }

    async fn handle(
        &self,
        event: &CatalogEvent<'_>,
        _ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<()> {
        let entry = event.entry();
        let snapshot = ArchiveSnapshot::snapshot(entry);
        let id = ArchiveRepo::insert(tx.conn(), &snapshot).await?;
        debug!(entry_id = entry.id, snapshot_id = id, "Entry archived");
        Ok(())
    }
}

/// Appends a Removal once an entry is deleted.
///
/// Dated today, `delta = +credit_cost`, no entry reference, label captured
/// before deletion.
pub struct RemovalHandler;

#[async_trait]
impl LifecycleHandler for RemovalHandler {
    fn name(&self) -> &str {
        "removal"
    }

    fn stage(&self) -> LifecycleStage {
        LifecycleStage::PostDelete
    }

    async fn handle(
        &self,
        event: &CatalogEvent<'_>,
        ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<()> {
        let entry = event.entry();
        let trx = NewTransaction::removal(
            ctx.today,
            entry.credit_cost().value(),
            &entry.display_label(),
        );

        let written = tx.append(trx).await?;
        info!(
            entry_id = entry.id,
            trx_id = written.id,
            balance = written.balance,
            "Removal recorded"
        );
        Ok(())
    }
}
