//! Credit ledger commands

use anyhow::{Context, Result};
use discobase_core::Transaction;
use discobase_ledger::{DiscobaseConfig, LedgerService};
use discobase_persistence::TrxFilter;

use super::{service_context, truncate};
use crate::LedgerAction;

/// Handle ledger subcommands
pub async fn handle(config: &DiscobaseConfig, action: LedgerAction) -> Result<()> {
    let ctx = service_context(config).await?;
    let ledger = LedgerService::new(&ctx);

    match action {
        LedgerAction::List {
            from,
            to,
            kind,
            ascending,
        } => {
            let filter = TrxFilter {
                from,
                to,
                kind: kind.map(|k| k.to_core_kind()),
                descending: !ascending,
            };
            let transactions = ledger.get_ledger(&filter).await?;
            print_transactions(&transactions);
        }
        LedgerAction::Catchup => {
            let added = ledger.run_addition_catchup().await?;
            if added.is_empty() {
                println!("✅ No Addition due");
            } else {
                println!("✅ Credited {} Addition(s)", added.len());
                for trx in &added {
                    println!("   {} {:+} -> {}", trx.date, trx.delta, trx.balance);
                }
            }
        }
        LedgerAction::Verify => {
            let balance = ledger
                .verify()
                .await
                .context("Ledger verification failed")?;
            println!("✅ Ledger consistent, saldo {}", balance);
        }
        LedgerAction::InitialLoad { date, delta } => {
            let trx = ledger.initial_load(date, delta).await?;
            println!("✅ Initial load #{} on {}: {:+}", trx.id, trx.date, trx.delta);
            println!("   Saldo: {}", trx.balance);
        }
        LedgerAction::Balance => {
            ledger.run_addition_catchup().await?;
            println!("💰 Saldo: {}", ledger.latest_balance().await);
        }
    }

    ctx.db().close().await;
    Ok(())
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<6} {:<12} {:<14} {:>6} {:>6}  {}",
        "ID", "Date", "Type", "Value", "Saldo", "Entry"
    );
    println!("{}", "-".repeat(90));

    for trx in transactions {
        println!(
            "{:<6} {:<12} {:<14} {:>6} {:>6}  {}",
            trx.id,
            trx.date,
            trx.kind.as_str(),
            trx.delta,
            trx.balance,
            truncate(trx.entry_label.as_deref().unwrap_or(""), 40)
        );
    }

    println!("\nTotal: {} transactions", transactions.len());
}
