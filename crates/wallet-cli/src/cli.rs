//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use wallet_core::aggregation::MonthSelection;
use wallet_core::models::TransactionType;

/// Cash Wallet - Track income, expenses and a monthly budget
#[derive(Parser)]
#[command(name = "wallet")]
#[command(about = "Personal finance tracker with a needs/wants/savings budget", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "wallet.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record an income or expense
    Add {
        /// income or expense
        kind: TransactionType,

        /// What the transaction was for
        #[arg(short, long)]
        name: Option<String>,

        /// Amount (positive; the sign comes from the kind)
        #[arg(short, long)]
        amount: Option<Decimal>,

        /// Category identifier (see `wallet categories`)
        #[arg(short, long)]
        category: Option<String>,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// List transactions, newest first
    Transactions {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Show income, expenses and balance
    Balance {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Per-category breakdown of income and expenses
    Analytics {
        /// Month (YYYY-MM); all transactions when omitted
        #[arg(short, long)]
        month: Option<MonthSelection>,
    },

    /// Cumulative daily balance
    Chart {
        /// Month (YYYY-MM): plot every day of the month
        #[arg(short, long, conflicts_with_all = ["from", "to"])]
        month: Option<MonthSelection>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// List transaction categories
    Categories,

    /// Show or edit the budget plan
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Show the plan with totals and allocation lines
    Show,

    /// Create the budget
    Init {
        /// Monthly income
        #[arg(short, long)]
        income: Decimal,

        /// Period start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Period end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },

    /// Edit and save the plan (must balance: needs + wants + 20% savings = income)
    Set {
        /// New income
        #[arg(short, long)]
        income: Option<Decimal>,

        /// New period start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// New period end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Need allocation, e.g. --need "Groceries=250" (repeatable)
        #[arg(long = "need", value_parser = parse_allocation)]
        needs: Vec<Allocation>,

        /// Want allocation, e.g. --want "Gym=30" (repeatable)
        #[arg(long = "want", value_parser = parse_allocation)]
        wants: Vec<Allocation>,
    },

    /// Show budget warnings for the budget period
    Warnings,
}

/// A NAME=AMOUNT allocation argument
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub name: String,
    pub amount: Decimal,
}

pub fn parse_allocation(s: &str) -> Result<Allocation, String> {
    let (name, amount) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("Expected NAME=AMOUNT, got: {}", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Missing name in: {}", s));
    }
    let amount = Decimal::from_str(amount.trim())
        .map_err(|_| format!("Invalid amount in: {}", s))?;
    if amount < Decimal::ZERO {
        return Err(format!("Allocation must not be negative: {}", s));
    }
    Ok(Allocation {
        name: name.to_string(),
        amount,
    })
}
