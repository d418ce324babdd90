//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Cash Wallet web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = wallet_server::ServerConfig::from_env();
    if config.allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", config.allowed_origins.join(", "));
    }
    println!();

    let db = open_db(db_path)?;
    let static_dir = static_dir
        .map(|d| d.to_str().context("Static directory path is not valid UTF-8"))
        .transpose()?;

    wallet_server::serve_with_config(db, host, port, static_dir, config).await
}
