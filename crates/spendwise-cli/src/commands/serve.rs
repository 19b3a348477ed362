//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    session_ttl_hours: Option<i64>,
) -> Result<()> {
    let mut config = spendwise_server::ServerConfig::from_env();
    if let Some(hours) = session_ttl_hours {
        if !spendwise_server::is_valid_session_ttl(hours) {
            anyhow::bail!(
                "--session-ttl-hours must be between 1 and {}",
                spendwise_server::MAX_SESSION_TTL_HOURS
            );
        }
        config.session_ttl_hours = hours;
    }

    println!("🚀 Starting Spendwise web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!("   🔒 Sessions expire after {} hour(s)", config.session_ttl_hours);
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} ({})",
            config.allowed_origins.join(", "),
            spendwise_server::ALLOWED_ORIGINS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    spendwise_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
