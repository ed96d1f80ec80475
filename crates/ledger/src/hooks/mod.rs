//! Catalog-entry lifecycle hooks
//!
//! The catalog service calls the registry explicitly at each lifecycle point;
//! handlers write to the ledger through the caller's [`LedgerTx`], so a failing
//! handler rolls back the whole operation.
//!
//! [`LedgerTx`]: discobase_persistence::LedgerTx

mod handlers;
mod registry;
mod traits;

pub use handlers::{ArchiveHandler, LabelBackfillHandler, PurchaseHandler, RemovalHandler};
pub use registry::HookRegistry;
pub use traits::{CatalogEvent, HookContext, LifecycleHandler, LifecycleStage};
