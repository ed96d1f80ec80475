//! Catalog entry commands

use anyhow::Result;
use discobase_core::{CatalogEntry, CreditCost, EntryDetails, Rating};
use discobase_ledger::{CatalogService, DiscobaseConfig};

use super::{service_context, truncate};
use crate::{EntryPatchArgs, NewEntryArgs, RecordAction};

/// Handle record subcommands
pub async fn handle(config: &DiscobaseConfig, action: RecordAction) -> Result<()> {
    let ctx = service_context(config).await?;
    let catalog = CatalogService::new(&ctx);

    match action {
        RecordAction::Add(args) => {
            let labels = args.labels.clone();
            let artists = args.artists.clone();
            let entry = catalog.create(details_from_args(&args)?, artists, labels).await?;
            println!("✅ Added entry #{}: {}", entry.id, entry.display_label());
            println!("   Credit cost: {}", entry.credit_cost().value());
            println!("   Saldo:       {}", ctx.ledger().latest_balance().await);
        }
        RecordAction::Import(args) => {
            let draft = catalog
                .create_draft(details_from_args(&args)?)?
                .attach_relations(args.artists.clone(), args.labels.clone());
            let entry = catalog.import_entry(draft).await?;
            println!("✅ Imported entry #{}: {}", entry.id, entry.display_label());
        }
        RecordAction::List => {
            list_entries(&catalog).await?;
        }
        RecordAction::Show { id } => {
            let entry = catalog.get(id).await?;
            print_entry(&entry);
            let previous = catalog.previous_id(id).await?;
            let next = catalog.next_id(id).await?;
            println!(
                "   Navigation:    prev {} / next {}",
                previous.map(|i| format!("#{}", i)).unwrap_or_else(|| "-".into()),
                next.map(|i| format!("#{}", i)).unwrap_or_else(|| "-".into())
            );
        }
        RecordAction::Artists { id, artists } => {
            let entry = catalog.set_artists(id, artists).await?;
            println!("✅ Artists of #{} set to: {}", entry.id, entry.artists_str());
        }
        RecordAction::Labels { id, labels } => {
            let entry = catalog.set_labels(id, labels).await?;
            println!("✅ Labels of #{} set to: {}", entry.id, entry.labels_str());
        }
        RecordAction::Update { id, patch } => {
            let current = catalog.get(id).await?;
            let details = apply_patch(current.details, patch)?;
            let entry = catalog.update_details(id, details).await?;
            println!("✅ Updated entry #{}: {}", entry.id, entry.display_label());
        }
        RecordAction::Delete { id } => {
            let entry = catalog.delete_entry(id).await?;
            println!("🗑️  Deleted entry #{}: {}", entry.id, entry.display_label());
            println!("   Archived and credited back {}", entry.credit_cost().value());
            println!("   Saldo: {}", ctx.ledger().latest_balance().await);
        }
    }

    ctx.db().close().await;
    Ok(())
}

fn details_from_args(args: &NewEntryArgs) -> Result<EntryDetails> {
    let mut details = EntryDetails::new(&args.title, args.year, args.purchase_date, args.price)
        .with_format(&args.format)
        .with_genre(&args.genre)
        .with_color(&args.color)
        .with_remarks(&args.remarks)
        .with_credit_cost(CreditCost::new(args.credit)?)
        .with_rating(Rating::new(args.rating)?)
        .with_review(&args.review);
    if args.digitized {
        details = details.digitized();
    }
    if let Some(discogs_id) = args.discogs_id {
        details = details.with_discogs_id(discogs_id);
    }
    Ok(details)
}

/// Overlay the given fields onto the stored details
fn apply_patch(mut details: EntryDetails, patch: EntryPatchArgs) -> Result<EntryDetails> {
    if let Some(title) = patch.title {
        details.title = title;
    }
    if let Some(year) = patch.year {
        details.year = year;
    }
    if let Some(purchase_date) = patch.purchase_date {
        details.purchase_date = purchase_date;
    }
    if let Some(price) = patch.price {
        details.price = price;
    }
    if let Some(format) = patch.format {
        details.record_format = format;
    }
    if let Some(genre) = patch.genre {
        details.genre = genre;
    }
    if let Some(color) = patch.color {
        details.color = color;
    }
    if let Some(remarks) = patch.remarks {
        details.remarks = remarks;
    }
    if let Some(credit) = patch.credit {
        details.credit_cost = CreditCost::new(credit)?;
    }
    if let Some(rating) = patch.rating {
        details.rating = Rating::new(rating)?;
    }
    if let Some(review) = patch.review {
        details.review = review;
    }
    if let Some(digitized) = patch.digitized {
        details.is_digitized = digitized;
    }
    if patch.discogs_id.is_some() {
        details.discogs_id = patch.discogs_id;
    }
    Ok(details)
}

async fn list_entries(catalog: &CatalogService<'_>) -> Result<()> {
    let entries = catalog.list().await?;

    if entries.is_empty() {
        println!("No entries in the catalog.");
        return Ok(());
    }

    println!(
        "{:<6} {:<28} {:<30} {:<6} {:<10} {:<12} {:>6}",
        "ID", "Artists", "Title", "Year", "Format", "Purchased", "Credit"
    );
    println!("{}", "-".repeat(104));

    for entry in &entries {
        println!(
            "{:<6} {:<28} {:<30} {:<6} {:<10} {:<12} {:>6}",
            entry.id,
            truncate(&entry.artists_str(), 28),
            truncate(entry.title(), 30),
            entry.details.year,
            truncate(&entry.details.record_format, 10),
            entry.purchase_date(),
            entry.credit_cost().value()
        );
    }

    println!("\nTotal: {} entries", entries.len());
    Ok(())
}

fn print_entry(entry: &CatalogEntry) {
    let d = &entry.details;
    println!("💿 Entry #{}", entry.id);
    println!("   Title:         {}", d.title);
    println!("   Artists:       {}", entry.artists_str());
    println!("   Labels:        {}", entry.labels_str());
    println!("   Year:          {}", d.year);
    println!("   Format:        {}", d.record_format);
    println!("   Genre:         {}", d.genre);
    if !d.color.is_empty() {
        println!("   Color:         {}", d.color);
    }
    println!("   Purchase date: {}", d.purchase_date);
    println!("   Price:         {}", d.price);
    println!("   Credit cost:   {}", d.credit_cost.value());
    println!("   Rating:        {}/5", d.rating.value());
    println!("   Digitized:     {}", if d.is_digitized { "yes" } else { "no" });
    if let Some(discogs_id) = d.discogs_id {
        println!("   Discogs:       {}", discogs_id);
    }
    if !d.remarks.is_empty() {
        println!("   Remarks:       {}", d.remarks);
    }
    if !d.review.is_empty() {
        println!("   Review:        {}", d.review);
    }
}
