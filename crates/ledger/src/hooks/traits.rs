//! Hook traits - interfaces for lifecycle handlers

use async_trait::async_trait;
use chrono::NaiveDate;
use discobase_core::CatalogEntry;
use discobase_persistence::LedgerTx;
use std::fmt;

use crate::error::LedgerResult;

/// Point in an entry's lifecycle at which handlers run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    /// Entry persisted for the first time, relations included
    Created,
    /// Artist relations edited after creation
    RelationsChanged,
    /// Entry about to be deleted, still present in storage
    PreDelete,
    /// Entry deleted, same unit of work
    PostDelete,
}

impl fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleStage::Created => "created",
            LifecycleStage::RelationsChanged => "relations_changed",
            LifecycleStage::PreDelete => "pre_delete",
            LifecycleStage::PostDelete => "post_delete",
        };
        f.write_str(name)
    }
}

/// Lifecycle event carrying the entry it concerns.
///
/// For `PostDelete` the entry is the copy loaded before deletion.
#[derive(Debug, Clone, Copy)]
pub enum CatalogEvent<'a> {
    Created(&'a CatalogEntry),
    RelationsChanged(&'a CatalogEntry),
    PreDelete(&'a CatalogEntry),
    PostDelete(&'a CatalogEntry),
}

impl<'a> CatalogEvent<'a> {
    pub fn stage(&self) -> LifecycleStage {
        match self {
            CatalogEvent::Created(_) => LifecycleStage::Created,
            CatalogEvent::RelationsChanged(_) => LifecycleStage::RelationsChanged,
            CatalogEvent::PreDelete(_) => LifecycleStage::PreDelete,
            CatalogEvent::PostDelete(_) => LifecycleStage::PostDelete,
        }
    }

    pub fn entry(&self) -> &'a CatalogEntry {
        match self {
            CatalogEvent::Created(entry)
            | CatalogEvent::RelationsChanged(entry)
            | CatalogEvent::PreDelete(entry)
            | CatalogEvent::PostDelete(entry) => entry,
        }
    }
}

/// Context shared by all handlers of one dispatch
#[derive(Debug, Clone, Copy)]
pub struct HookContext {
    /// "Today" according to the service clock
    pub today: NaiveDate,
}

impl HookContext {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

/// Lifecycle handler - reacts to one stage of an entry's lifecycle
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    /// Handler name for logging/debugging
    fn name(&self) -> &str;

    /// Stage this handler runs at
    fn stage(&self) -> LifecycleStage;

    /// Priority (lower = runs first)
    fn priority(&self) -> u32 {
        100
    }

    /// Called inside the caller's unit of work.
    ///
    /// Returning `Err(_)` aborts the operation and rolls back `tx`.
    async fn handle(
        &self,
        event: &CatalogEvent<'_>,
        ctx: &HookContext,
        tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<()>;
}
