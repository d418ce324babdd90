//! Cash Wallet CLI - Personal finance tracker
//!
//! Usage:
//!   wallet init                                  Initialize database
//!   wallet add expense -n Lunch -a 12.50 -c food Record a transaction
//!   wallet budget init --income 2000             Create the budget
//!   wallet serve --port 3000                     Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Add {
            kind,
            name,
            amount,
            category,
            date,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add(&db, kind, name, amount, category, date)
        }
        Commands::Transactions { from, to, limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_transactions_list(&db, from, to, limit)
        }
        Commands::Balance { from, to } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_balance(&db, from, to)
        }
        Commands::Analytics { month } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_analytics(&db, month)
        }
        Commands::Chart { month, from, to } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_chart(&db, month, from, to)
        }
        Commands::Categories => commands::cmd_categories(),
        Commands::Budget { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(BudgetAction::Show) => commands::cmd_budget_show(&db),
                Some(BudgetAction::Init { income, start, end }) => {
                    commands::cmd_budget_init(&db, income, start, end)
                }
                Some(BudgetAction::Set {
                    income,
                    start,
                    end,
                    needs,
                    wants,
                }) => commands::cmd_budget_set(&db, income, start, end, &needs, &wants),
                Some(BudgetAction::Warnings) => commands::cmd_budget_warnings(&db),
            }
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref()).await,
    }
}
