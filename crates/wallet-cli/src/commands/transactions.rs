//! Transaction command implementations

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;
use wallet_core::aggregation::format_money;
use wallet_core::categories::lookup;
use wallet_core::db::Database;
use wallet_core::models::{NewTransaction, TransactionType};
use wallet_core::store::{TransactionQuery, TransactionStore};

use super::truncate;

/// Build a date-bounded query, rejecting inverted ranges
pub fn date_range_query(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<TransactionQuery> {
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            bail!("--from ({}) must not be after --to ({})", f, t);
        }
    }
    Ok(TransactionQuery::new().from(from).to(to))
}

pub fn cmd_add(
    db: &Database,
    kind: TransactionType,
    name: Option<String>,
    amount: Option<Decimal>,
    category: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    let new = NewTransaction {
        name: name.unwrap_or_default(),
        amount: amount.unwrap_or(Decimal::ZERO),
        transaction_type: kind,
        category: category.unwrap_or_default(),
        date: date.unwrap_or_else(|| Local::now().date_naive()),
    };

    let tx = db.insert_transaction(&new)?;
    debug!(id = tx.id, "Recorded transaction");

    let info = lookup(tx.transaction_type, &tx.category);
    if !info.is_known() {
        println!(
            "   ⚠️  '{}' is not a known {} category (see `wallet categories`)",
            tx.category, tx.transaction_type
        );
    }
    println!(
        "✅ Recorded {} [{}] {} {} │ {} {}",
        tx.transaction_type,
        tx.id,
        tx.date,
        format_money(tx.amount),
        info.icon,
        tx.name
    );
    Ok(())
}

pub fn cmd_transactions_list(
    db: &Database,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: i64,
) -> Result<()> {
    let query = date_range_query(from, to)?.limit(Some(limit.max(1)));
    let transactions = db.list_transactions(&query)?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!("  wallet add expense --name Lunch --amount 12.50 --category food");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.transaction_type {
            TransactionType::Expense => {
                format!("\x1b[31m-{}\x1b[0m", format_money(tx.amount)) // Red for expenses
            }
            TransactionType::Income => {
                format!("\x1b[32m+{}\x1b[0m", format_money(tx.amount)) // Green for income
            }
        };
        let info = lookup(tx.transaction_type, &tx.category);

        println!(
            "   {} │ {:>20} │ {} {:<18} │ {}",
            tx.date,
            amount_str,
            info.icon,
            truncate(info.name, 18),
            truncate(&tx.name, 30)
        );
    }

    Ok(())
}
