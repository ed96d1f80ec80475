//! Integration tests for catalog lifecycle + hooks + ledger

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use discobase_core::{Artist, CoreError, CreditCost, EntryDetails, EntryDraft, FixedClock, TrxKind};
use discobase_ledger::{
    CatalogEvent, CatalogService, HookContext, HookRegistry, LedgerConfig, LedgerError,
    LedgerResult, LedgerService, LifecycleHandler, LifecycleStage, ServiceContext,
};
use discobase_persistence::{ArchiveRepo, Database, EntryRepo, LedgerTx, TransactionRepo, TrxFilter};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2024, 6, 1)
}

async fn context() -> ServiceContext {
    let db = Database::init_with_migrations("sqlite::memory:").await.unwrap();
    ServiceContext::new(db, LedgerConfig::default()).with_clock(Arc::new(FixedClock(today())))
}

fn details(title: &str) -> EntryDetails {
    EntryDetails::new(title, 2022, date(1999, 1, 1), dec!(20)).with_genre("Metal of Death")
}

fn raphmadon() -> Vec<Artist> {
    vec![Artist::new("Raphmadon", "Switzerland")]
}

async fn create(ctx: &ServiceContext, title: &str) -> discobase_core::CatalogEntry {
    CatalogService::new(ctx)
        .create(details(title), raphmadon(), vec!["Capsized Duck Records".into()])
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_records_purchase_on_purchase_date() {
    let ctx = context().await;
    LedgerService::new(&ctx)
        .initial_load(date(1998, 1, 1), 5)
        .await
        .unwrap();

    let entry = create(&ctx, "Album of Blood").await;

    let purchases = ctx
        .ledger()
        .list(&TrxFilter::new().kind(TrxKind::Purchase))
        .await
        .unwrap();
    assert_eq!(purchases.len(), 1);

    let purchase = &purchases[0];
    assert_eq!(purchase.date, date(1999, 1, 1));
    assert_eq!(purchase.delta, -1);
    assert_eq!(purchase.balance, 4);
    assert_eq!(purchase.entry_ref, Some(entry.id));
    assert_eq!(
        purchase.entry_label.as_deref(),
        Some("Raphmadon - Album of Blood (2022)")
    );
}

#[tokio::test]
async fn test_two_phase_create() {
    let ctx = context().await;
    let catalog = CatalogService::new(&ctx);

    let draft = catalog.create_draft(details("Phased")).unwrap();
    assert_eq!(TransactionRepo::count(ctx.pool()).await.unwrap(), 0);

    let draft = catalog.attach_relations(
        draft,
        vec![
            Artist::new("Raphmadon", "Switzerland"),
            Artist::new("Gorgor", "Norway"),
        ],
        vec![],
    );
    let entry = catalog.finalize(draft).await.unwrap();

    let purchase = ctx.ledger().latest(TrxKind::Purchase).await.unwrap().unwrap();
    assert_eq!(purchase.entry_ref, Some(entry.id));
    assert_eq!(
        purchase.entry_label.as_deref(),
        Some("Raphmadon / Gorgor - Phased (2022)")
    );
}

#[tokio::test]
async fn test_free_entry_records_zero_purchase() {
    let ctx = context().await;
    CatalogService::new(&ctx)
        .create(
            details("Gift").with_credit_cost(CreditCost::FREE),
            raphmadon(),
            vec![],
        )
        .await
        .unwrap();

    let purchase = ctx.ledger().latest(TrxKind::Purchase).await.unwrap().unwrap();
    assert_eq!(purchase.delta, 0);
    assert_eq!(ctx.ledger().latest_balance().await, 0);
}

#[tokio::test]
async fn test_finalize_without_artists_writes_nothing() {
    let ctx = context().await;
    let catalog = CatalogService::new(&ctx);

    let draft = catalog.create_draft(details("Orphan")).unwrap();
    let err = catalog.finalize(draft).await.unwrap_err();

    assert!(matches!(err, LedgerError::Core(CoreError::MissingArtists(_))));
    assert!(err.is_validation());
    assert_eq!(EntryRepo::count(ctx.pool()).await.unwrap(), 0);
    assert_eq!(TransactionRepo::count(ctx.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_draft_rejects_invalid_details() {
    let ctx = context().await;
    let err = CatalogService::new(&ctx)
        .create_draft(EntryDetails::new("", 2022, date(1999, 1, 1), dec!(20)))
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_duplicate_entry_leaves_ledger_untouched() {
    let ctx = context().await;
    create(&ctx, "Twice").await;

    let err = CatalogService::new(&ctx)
        .create(details("Twice"), raphmadon(), vec![])
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(TransactionRepo::count(ctx.pool()).await.unwrap(), 1);
    assert_eq!(ctx.ledger().latest_balance().await, -1);
}

#[tokio::test]
async fn test_delete_archives_then_records_removal() {
    let ctx = context().await;
    let entry = create(&ctx, "Album of Blood").await;
    let label = entry.display_label();

    let removed = CatalogService::new(&ctx).delete_entry(entry.id).await.unwrap();
    assert_eq!(removed.id, entry.id);

    let snapshots = ArchiveRepo::get_all(ctx.pool()).await.unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].title, "Album of Blood");
    assert_eq!(snapshots[0].legacy_id, entry.id);

    let removals = ctx
        .ledger()
        .list(&TrxFilter::new().kind(TrxKind::Removal))
        .await
        .unwrap();
    assert_eq!(removals.len(), 1);
    assert_eq!(removals[0].date, today());
    assert_eq!(removals[0].delta, 1);
    assert_eq!(removals[0].entry_ref, None);
    assert_eq!(removals[0].entry_label.as_deref(), Some(label.as_str()));

    let purchase = ctx.ledger().latest(TrxKind::Purchase).await.unwrap().unwrap();
    assert_eq!(purchase.entry_ref, None);
    assert_eq!(purchase.entry_label.as_deref(), Some(label.as_str()));

    assert_eq!(ctx.ledger().latest_balance().await, 0);
    assert_eq!(EntryRepo::count(ctx.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_missing_entry() {
    let ctx = context().await;
    let err = CatalogService::new(&ctx).delete_entry(42).await.unwrap_err();
    assert!(matches!(err, LedgerError::EntryNotFound(42)));
}

struct FailingRemoval;

#[async_trait]
impl LifecycleHandler for FailingRemoval {
    fn name(&self) -> &str {
        "failing_removal"
    }

    fn stage(&self) -> LifecycleStage {
        LifecycleStage::PostDelete
    }

    fn priority(&self) -> u32 {
        50
    }

    async fn handle(
        &self,
        _event: &CatalogEvent<'_>,
        _ctx: &HookContext,
        _tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<()> {
        Err(LedgerError::InvalidEntry("removal refused".into()))
    }
}

#[tokio::test]
async fn test_failed_delete_rolls_back_everything() {
    let mut hooks = HookRegistry::standard();
    hooks.register(Arc::new(FailingRemoval));
    let db = Database::init_with_migrations("sqlite::memory:").await.unwrap();
    let ctx = ServiceContext::new(db, LedgerConfig::default())
        .with_clock(Arc::new(FixedClock(today())))
        .with_hooks(hooks);

    let entry = create(&ctx, "Survivor").await;

    let err = CatalogService::new(&ctx).delete_entry(entry.id).await.unwrap_err();
    assert!(matches!(err, LedgerError::HandlerFailed { .. }));

    assert_eq!(CatalogService::new(&ctx).get(entry.id).await.unwrap().id, entry.id);
    assert_eq!(ArchiveRepo::count(ctx.pool()).await.unwrap(), 0);
    assert_eq!(TransactionRepo::count(ctx.pool()).await.unwrap(), 1);
    assert_eq!(ctx.ledger().latest_balance().await, -1);

    let purchase = ctx.ledger().latest(TrxKind::Purchase).await.unwrap().unwrap();
    assert_eq!(purchase.entry_ref, Some(entry.id));
}

struct FailingArchive {
    priority: u32,
}

#[async_trait]
impl LifecycleHandler for FailingArchive {
    fn name(&self) -> &str {
        "failing_archive"
    }

    fn stage(&self) -> LifecycleStage {
        LifecycleStage::PreDelete
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    async fn handle(
        &self,
        _event: &CatalogEvent<'_>,
        _ctx: &HookContext,
        _tx: &mut LedgerTx<'_>,
    ) -> LedgerResult<()> {
        Err(LedgerError::InvalidEntry("archive refused".into()))
    }
}

async fn context_with(handler: Arc<dyn LifecycleHandler>) -> ServiceContext {
    let mut hooks = HookRegistry::standard();
    hooks.register(handler);
    let db = Database::init_with_migrations("sqlite::memory:").await.unwrap();
    ServiceContext::new(db, LedgerConfig::default())
        .with_clock(Arc::new(FixedClock(today())))
        .with_hooks(hooks)
}

#[tokio::test]
async fn test_failed_pre_delete_skips_removal() {
    // Runs before the archive handler; delete must stop before post-delete
    let ctx = context_with(Arc::new(FailingArchive { priority: 50 })).await;
    let entry = create(&ctx, "Survivor").await;

    let err = CatalogService::new(&ctx).delete_entry(entry.id).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::HandlerFailed { ref handler, .. } if handler == "failing_archive"
    ));

    let removals = ctx
        .ledger()
        .list(&TrxFilter::new().kind(TrxKind::Removal))
        .await
        .unwrap();
    assert!(removals.is_empty());
    assert_eq!(ArchiveRepo::count(ctx.pool()).await.unwrap(), 0);
    assert_eq!(CatalogService::new(&ctx).get(entry.id).await.unwrap().id, entry.id);
    assert_eq!(ctx.ledger().latest_balance().await, -1);
}

#[tokio::test]
async fn test_failed_pre_delete_after_archive_rolls_back_snapshot() {
    let ctx = context_with(Arc::new(FailingArchive { priority: 200 })).await;
    let entry = create(&ctx, "Survivor").await;

    assert!(CatalogService::new(&ctx).delete_entry(entry.id).await.is_err());

    assert_eq!(ArchiveRepo::count(ctx.pool()).await.unwrap(), 0);
    assert_eq!(TransactionRepo::count(ctx.pool()).await.unwrap(), 1);
    assert_eq!(EntryRepo::count(ctx.pool()).await.unwrap(), 1);
    assert_eq!(ctx.ledger().latest_balance().await, -1);
}

#[tokio::test]
async fn test_artist_change_backfills_purchase_label() {
    let ctx = context().await;
    let entry = create(&ctx, "Album of Blood").await;

    let updated = CatalogService::new(&ctx)
        .set_artists(
            entry.id,
            vec![
                Artist::new("Raphmadon", "Switzerland"),
                Artist::new("Gorgor", "Norway"),
            ],
        )
        .await
        .unwrap();

    let purchase = ctx.ledger().latest(TrxKind::Purchase).await.unwrap().unwrap();
    assert_eq!(
        purchase.entry_label.as_deref(),
        Some("Raphmadon / Gorgor - Album of Blood (2022)")
    );
    assert_eq!(purchase.entry_label, Some(updated.display_label()));
    assert_eq!(TransactionRepo::count(ctx.pool()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_imported_entry_has_no_ledger_effect() {
    let ctx = context().await;
    let catalog = CatalogService::new(&ctx);

    let draft = EntryDraft::new(details("Legacy")).attach_relations(raphmadon(), vec![]);
    let entry = catalog.import_entry(draft).await.unwrap();
    catalog
        .set_artists(entry.id, vec![Artist::new("Gorgor", "Norway")])
        .await
        .unwrap();

    assert_eq!(TransactionRepo::count(ctx.pool()).await.unwrap(), 0);
    assert_eq!(catalog.get(entry.id).await.unwrap().artists_str(), "Gorgor");
}

#[tokio::test]
async fn test_update_details_never_touches_ledger() {
    let ctx = context().await;
    let entry = create(&ctx, "Before").await;
    let catalog = CatalogService::new(&ctx);

    let updated = catalog
        .update_details(entry.id, details("After").with_credit_cost(CreditCost::FREE))
        .await
        .unwrap();
    assert_eq!(updated.title(), "After");

    let purchase = ctx.ledger().latest(TrxKind::Purchase).await.unwrap().unwrap();
    assert_eq!(purchase.delta, -1);
    assert_eq!(
        purchase.entry_label.as_deref(),
        Some("Raphmadon - Before (2022)")
    );
    assert_eq!(TransactionRepo::count(ctx.pool()).await.unwrap(), 1);

    let err = catalog.update_details(999, details("Ghost")).await.unwrap_err();
    assert!(matches!(err, LedgerError::EntryNotFound(999)));
}

#[tokio::test]
async fn test_labels_and_navigation() {
    let ctx = context().await;
    let first = create(&ctx, "First").await;
    let second = create(&ctx, "Second").await;
    let catalog = CatalogService::new(&ctx);

    let relabeled = catalog
        .set_labels(second.id, vec!["Nuclear Blast".into(), "Relapse".into()])
        .await
        .unwrap();
    assert_eq!(relabeled.labels_str(), "Nuclear Blast / Relapse");

    assert_eq!(catalog.next_id(first.id).await.unwrap(), Some(second.id));
    assert_eq!(catalog.previous_id(second.id).await.unwrap(), Some(first.id));
    assert_eq!(catalog.next_id(second.id).await.unwrap(), None);
    assert_eq!(catalog.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_ledger_seeds_addition_today() {
    let ctx = context().await;
    let service = LedgerService::new(&ctx);
    assert_eq!(service.latest_balance().await, 0);

    let seeded = service.run_addition_catchup().await.unwrap();
    assert_eq!(seeded.len(), 1);
    assert_eq!(seeded[0].date, today());
    assert_eq!(seeded[0].kind, TrxKind::Addition);

    assert!(service.run_addition_catchup().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_catchup_after_22_days() {
    let ctx = context().await;
    ctx.ledger()
        .append(discobase_core::NewTransaction::addition(date(2024, 5, 10), 1))
        .await
        .unwrap();

    let inserted = LedgerService::new(&ctx).run_addition_catchup().await.unwrap();

    let dates: Vec<_> = inserted.iter().map(|t| t.date).collect();
    assert_eq!(dates, vec![date(2024, 5, 20), date(2024, 5, 30)]);
    assert_eq!(inserted[0].balance, 2);
    assert_eq!(inserted[1].balance, 3);
}

#[tokio::test]
async fn test_balances_are_running_sums() {
    let ctx = context().await;
    let service = LedgerService::new(&ctx);

    service.initial_load(date(2020, 1, 1), 3).await.unwrap();
    let a = create(&ctx, "A").await;
    create(&ctx, "B").await;
    CatalogService::new(&ctx).delete_entry(a.id).await.unwrap();
    service.run_addition_catchup().await.unwrap();

    let rows = TransactionRepo::get_all(ctx.pool()).await.unwrap();
    let mut running = 0;
    for row in &rows {
        running += row.trx_value;
        assert_eq!(row.credit_saldo, running);
    }
    assert_eq!(running, service.latest_balance().await);
    assert_eq!(service.verify().await.unwrap(), running);
}

#[tokio::test]
async fn test_get_ledger_orders_by_date() {
    let ctx = context().await;
    create(&ctx, "Old").await;
    LedgerService::new(&ctx)
        .initial_load(date(1990, 1, 1), 10)
        .await
        .unwrap();

    let ledger = LedgerService::new(&ctx)
        .get_ledger(&TrxFilter::new())
        .await
        .unwrap();

    let kinds: Vec<_> = ledger.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TrxKind::InitialLoad, TrxKind::Purchase, TrxKind::Addition]
    );
}
