//! # Discobase Ledger
//!
//! Business layer - catalog lifecycle, credit ledger rules, configuration.
//!
//! - [`CatalogService`] - two-phase create, relation edits, delete, import
//! - [`LedgerService`] - addition catch-up, ledger listing, initial load, verify
//! - [`hooks`] - lifecycle handlers translating catalog events into ledger writes
//! - [`config`] - TOML configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod hooks;
pub mod scheduler;
pub mod services;

pub use catalog::CatalogService;
pub use config::{
    ConfigError, ConfigLoader, DatabaseConfig, DiscobaseConfig, LedgerConfig, LoggingConfig,
};
pub use error::{LedgerError, LedgerResult};
pub use hooks::{CatalogEvent, HookContext, HookRegistry, LifecycleHandler, LifecycleStage};
pub use scheduler::AdditionScheduler;
pub use services::{LedgerService, ServiceContext};
