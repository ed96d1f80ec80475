//! Catalog operations - create, relate, edit, delete, import
//!
//! Creation is two-phase: `create_draft` validates the scalar fields,
//! `attach_relations` adds artists and labels, `finalize` persists everything
//! and dispatches `Created` in the same unit of work.

use crate::error::{LedgerError, LedgerResult};
use crate::services::ServiceContext;
use chrono::Utc;
use discobase_core::{Artist, CatalogEntry, EntryDetails, EntryDraft};
use discobase_persistence::EntryRepo;
use tracing::info;

/// Catalog Service - entry lifecycle with ledger side effects
pub struct CatalogService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CatalogService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Phase 1: validate scalar fields and start a draft
    pub fn create_draft(&self, details: EntryDetails) -> LedgerResult<EntryDraft> {
        details.validate()?;
        Ok(EntryDraft::new(details))
    }

    /// Phase 2: attach artists and labels
    pub fn attach_relations(
        &self,
        draft: EntryDraft,
        artists: Vec<Artist>,
        labels: Vec<String>,
    ) -> EntryDraft {
        draft.attach_relations(artists, labels)
    }

    /// Phase 3: persist the entry with its relations and record the Purchase
    pub async fn finalize(&self, draft: EntryDraft) -> LedgerResult<CatalogEntry> {
        draft.validate()?;

        let mut tx = self.ctx.ledger().begin().await?;
        let id = EntryRepo::insert(tx.conn(), &draft.details, Utc::now()).await?;
        EntryRepo::set_artists(tx.conn(), id, &draft.artists).await?;
        EntryRepo::set_labels(tx.conn(), id, &draft.labels).await?;
        let entry = EntryRepo::get_by_id(tx.conn(), id).await?;

        self.ctx
            .hooks()
            .on_entry_created(&entry, &self.ctx.hook_context(), &mut tx)
            .await?;
        let balance = tx.commit().await?;

        info!(entry_id = id, label = %entry.display_label(), balance, "Entry created");
        Ok(entry)
    }

    /// All three phases in one call
    pub async fn create(
        &self,
        details: EntryDetails,
        artists: Vec<Artist>,
        labels: Vec<String>,
    ) -> LedgerResult<CatalogEntry> {
        let draft = self.create_draft(details)?;
        let draft = self.attach_relations(draft, artists, labels);
        self.finalize(draft).await
    }

    /// Insert an entry without dispatching lifecycle events (bulk import).
    ///
    /// The entry gets no Purchase, so later relation edits leave the ledger alone.
    pub async fn import_entry(&self, draft: EntryDraft) -> LedgerResult<CatalogEntry> {
        draft.validate()?;

        let mut tx = self.ctx.pool().begin().await?;
        let id = EntryRepo::insert(&mut tx, &draft.details, Utc::now()).await?;
        EntryRepo::set_artists(&mut tx, id, &draft.artists).await?;
        EntryRepo::set_labels(&mut tx, id, &draft.labels).await?;
        let entry = EntryRepo::get_by_id(&mut tx, id).await?;
        tx.commit().await?;

        info!(entry_id = id, "Entry imported");
        Ok(entry)
    }

    /// Replace the artists of an entry and backfill its Purchase label
    pub async fn set_artists(&self, id: i64, artists: Vec<Artist>) -> LedgerResult<CatalogEntry> {
        if artists.is_empty() {
            return Err(LedgerError::InvalidEntry(format!(
                "entry {} must keep at least one artist",
                id
            )));
        }

        let mut tx = self.ctx.ledger().begin().await?;
        EntryRepo::get_by_id(tx.conn(), id)
            .await
            .map_err(LedgerError::entry_lookup(id))?;
        EntryRepo::set_artists(tx.conn(), id, &artists).await?;
        let entry = EntryRepo::get_by_id(tx.conn(), id).await?;

        self.ctx
            .hooks()
            .on_entry_relation_changed(&entry, &self.ctx.hook_context(), &mut tx)
            .await?;
        tx.commit().await?;

        info!(entry_id = id, artists = %entry.artists_str(), "Entry artists updated");
        Ok(entry)
    }

    /// Replace the labels of an entry (not part of the display label)
    pub async fn set_labels(&self, id: i64, labels: Vec<String>) -> LedgerResult<CatalogEntry> {
        let mut tx = self.ctx.ledger().begin().await?;
        EntryRepo::get_by_id(tx.conn(), id)
            .await
            .map_err(LedgerError::entry_lookup(id))?;
        EntryRepo::set_labels(tx.conn(), id, &labels).await?;
        let entry = EntryRepo::get_by_id(tx.conn(), id).await?;
        tx.commit().await?;

        Ok(entry)
    }

    /// Edit scalar fields. Never touches the ledger.
    pub async fn update_details(&self, id: i64, details: EntryDetails) -> LedgerResult<CatalogEntry> {
        details.validate()?;

        let mut tx = self.ctx.ledger().begin().await?;
        EntryRepo::update_details(tx.conn(), id, &details)
            .await
            .map_err(LedgerError::entry_lookup(id))?;
        let entry = EntryRepo::get_by_id(tx.conn(), id).await?;
        tx.commit().await?;

        info!(entry_id = id, "Entry updated");
        Ok(entry)
    }

    /// Delete an entry: archive it, remove it, then record the Removal.
    ///
    /// All three steps share one unit of work; any failure keeps the entry.
    /// Returns the entry as it was before deletion.
    pub async fn delete_entry(&self, id: i64) -> LedgerResult<CatalogEntry> {
        let hook_ctx = self.ctx.hook_context();
        let mut tx = self.ctx.ledger().begin().await?;

        let entry = EntryRepo::get_by_id(tx.conn(), id)
            .await
            .map_err(LedgerError::entry_lookup(id))?;

        self.ctx
            .hooks()
            .on_entry_pre_delete(&entry, &hook_ctx, &mut tx)
            .await?;
        EntryRepo::delete(tx.conn(), id).await?;
        self.ctx
            .hooks()
            .on_entry_post_delete(&entry, &hook_ctx, &mut tx)
            .await?;
        let balance = tx.commit().await?;

        info!(entry_id = id, label = %entry.display_label(), balance, "Entry deleted");
        Ok(entry)
    }

    /// Get an entry with its relations
    pub async fn get(&self, id: i64) -> LedgerResult<CatalogEntry> {
        let mut conn = self.acquire().await?;
        EntryRepo::get_by_id(&mut conn, id)
            .await
            .map_err(LedgerError::entry_lookup(id))
    }

    /// All entries ordered by id
    pub async fn list(&self) -> LedgerResult<Vec<CatalogEntry>> {
        let mut conn = self.acquire().await?;
        Ok(EntryRepo::get_all(&mut conn).await?)
    }

    /// Id of the entry after `id`, if any
    pub async fn next_id(&self, id: i64) -> LedgerResult<Option<i64>> {
        Ok(EntryRepo::next_id(self.ctx.pool(), id).await?)
    }

    /// Id of the entry before `id`, if any
    pub async fn previous_id(&self, id: i64) -> LedgerResult<Option<i64>> {
        Ok(EntryRepo::previous_id(self.ctx.pool(), id).await?)
    }

    async fn acquire(&self) -> LedgerResult<sqlx::pool::PoolConnection<sqlx::Sqlite>> {
        Ok(self.ctx.pool().acquire().await?)
    }
}
