//! Report command implementations

use anyhow::Result;
use chrono::NaiveDate;
use wallet_core::aggregation::{self, format_money, ChartRange, MonthSelection};
use wallet_core::categories::lookup;
use wallet_core::db::Database;
use wallet_core::models::{CategoryAnalysis, TransactionType};
use wallet_core::store::{TransactionOrder, TransactionQuery, TransactionStore};

use super::date_range_query;

pub fn cmd_balance(db: &Database, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let transactions = db.list_transactions(&date_range_query(from, to)?)?;
    let summary = aggregation::summarize(&transactions);

    println!();
    println!("💰 Balance");
    println!("   ─────────────────────────────");
    println!("   Income:   {:>15}", format_money(summary.income));
    println!("   Expenses: {:>15}", format_money(summary.expenses));
    println!("   Balance:  {:>15}", format_money(summary.balance));

    Ok(())
}

pub fn cmd_analytics(db: &Database, month: Option<MonthSelection>) -> Result<()> {
    let query = TransactionQuery::period(month.map(|m| m.range()));
    let transactions = db.list_transactions(&query)?;
    let breakdown = aggregation::analyze_categories(&transactions);

    println!();
    match month {
        Some(m) => println!("📊 Analytics for {}", m),
        None => println!("📊 Analytics (all time)"),
    }

    print_breakdown("Income", TransactionType::Income, &breakdown.income);
    print_breakdown("Expenses", TransactionType::Expense, &breakdown.expense);

    Ok(())
}

fn print_breakdown(title: &str, transaction_type: TransactionType, rows: &[CategoryAnalysis]) {
    println!();
    println!("   {}", title);
    println!("   ─────────────────────────────────────────────────");
    if rows.is_empty() {
        println!("   (none)");
        return;
    }
    for row in rows {
        let info = lookup(transaction_type, &row.category);
        println!(
            "   {} {:<22} │ {:>12} │ {:>3} tx",
            info.icon,
            info.name,
            format_money(row.total),
            row.count
        );
    }
}

pub fn cmd_chart(
    db: &Database,
    month: Option<MonthSelection>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<()> {
    let (query, range) = match month {
        Some(m) => (TransactionQuery::period(Some(m.range())), ChartRange::Month(m)),
        None => (date_range_query(from, to)?, ChartRange::Observed),
    };
    let transactions = db.list_transactions(&query.order(TransactionOrder::DateAscending))?;
    let series = aggregation::daily_balance_series(&transactions, range);

    if series.is_empty() {
        println!("No transactions in range.");
        return Ok(());
    }

    println!();
    println!("📈 Balance over time");
    println!("   ─────────────────────────────");
    for point in series {
        println!("   {:>7} │ {:>15}", point.label, format_money(point.balance));
    }

    Ok(())
}
