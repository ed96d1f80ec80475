//! Hook Registry - holds lifecycle handlers and dispatches events in order

use std::sync::Arc;

use discobase_core::CatalogEntry;
use discobase_persistence::LedgerTx;

use super::handlers::{ArchiveHandler, LabelBackfillHandler, PurchaseHandler, RemovalHandler};
use super::traits::{CatalogEvent, HookContext, LifecycleHandler, LifecycleStage};
use crate::error::{LedgerError, LedgerResult};

/// Registry for lifecycle handlers
///
/// Handlers run in priority order (lower = first). The first failing handler
/// stops the dispatch and its error is returned to the caller.
pub struct HookRegistry {
    handlers: Vec<Arc<dyn LifecycleHandler>>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registry with the handlers that keep the ledger in step with the catalog
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PurchaseHandler));
        registry.register(Arc::new(LabelBackfillHandler));
        registry.register(Arc::new(ArchiveHandler));
        registry.register(Arc::new(RemovalHandler));
        registry
    }

    /// Register a handler
    pub fn register(&mut self, handler: Arc<dyn LifecycleHandler>) {
        self.handlers.push(handler);
        // Stable sort: equal priorities keep registration order
        self.handlers.sort_by_key(|h| h.priority());
    }

    /// Run all handlers registered for the event's stage
    ///
    /// Returns the number of handlers that ran.
    pub async fn dispatch(
        &self,
        event: CatalogEvent<'_>,
        ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<usize> {
        let stage = event.stage();
        let mut ran = 0;

        for handler in self.handlers.iter().filter(|h| h.stage() == stage) {
            match handler.handle(&event, ctx, tx).await {
                Ok(()) => {
                    tracing::debug!(
                        handler = handler.name(),
                        stage = %stage,
                        entry_id = event.entry().id,
                        "Lifecycle handler completed"
                    );
                    ran += 1;
                }
                Err(e) => {
                    tracing::error!(
                        handler = handler.name(),
                        stage = %stage,
                        error = %e,
                        "Lifecycle handler failed"
                    );
                    return Err(match e {
                        LedgerError::HandlerFailed { .. } => e,
                        other => LedgerError::handler_failed(handler.name(), other),
                    });
                }
            }
        }

        Ok(ran)
    }

    /// Entry persisted for the first time
    pub async fn on_entry_created(
        &self,
        entry: &CatalogEntry,
        ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<usize> {
        self.dispatch(CatalogEvent::Created(entry), ctx, tx).await
    }

    /// Artist relations of an existing entry changed
    pub async fn on_entry_relation_changed(
        &self,
        entry: &CatalogEntry,
        ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<usize> {
        self.dispatch(CatalogEvent::RelationsChanged(entry), ctx, tx)
            .await
    }

    /// Entry about to be deleted
    pub async fn on_entry_pre_delete(
        &self,
        entry: &CatalogEntry,
        ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<usize> {
        self.dispatch(CatalogEvent::PreDelete(entry), ctx, tx).await
    }

    /// Entry deleted
    pub async fn on_entry_post_delete(
        &self,
        entry: &CatalogEntry,
        ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<usize> {
        self.dispatch(CatalogEvent::PostDelete(entry), ctx, tx).await
    }

    /// Number of handlers registered for a stage
    pub fn handler_count(&self, stage: LifecycleStage) -> usize {
        self.handlers.iter().filter(|h| h.stage() == stage).count()
    }

    /// Handler names in execution order
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }
}
