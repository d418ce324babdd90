//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_categories` - List the category registry

use std::path::Path;

use anyhow::{Context, Result};
use wallet_core::categories::categories_for;
use wallet_core::db::Database;
use wallet_core::models::TransactionType;

/// Open the database, creating the schema if needed
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a budget: wallet budget init --income 2000");
    println!("  2. Record spending: wallet add expense --name Lunch --amount 12.50 --category food");
    println!("  3. Start web UI: wallet serve");

    Ok(())
}

pub fn cmd_categories() -> Result<()> {
    for transaction_type in [TransactionType::Income, TransactionType::Expense] {
        println!();
        println!("{} categories", capitalize(transaction_type.as_str()));
        println!("   ─────────────────────────────────────");
        for info in categories_for(transaction_type) {
            println!("   {} {:<15} │ {}", info.icon, info.id, info.name);
        }
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
