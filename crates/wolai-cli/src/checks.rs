//! End-to-end checks against a real Wolai workspace.
//!
//! Progress goes to stderr; the final API response goes to stdout.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use serde_json::json;

use wolai_core::config::{ENV_APP_ID, ENV_APP_SECRET, ENV_BLOCK_ID, ENV_DATABASE_ID};
use wolai_core::{BlockCreate, DatabaseRow, Toolkit};

/// Number of characters of an id or secret shown in progress output
const PREVIEW_LEN: usize = 10;

fn preview(value: &str) -> String {
    let shown: String = value.chars().take(PREVIEW_LEN).collect();
    format!("{}...", shown)
}

async fn obtain_token(toolkit: &Toolkit) -> Result<()> {
    let config = toolkit.config();
    let app_id = config
        .app_id
        .as_deref()
        .ok_or_else(|| anyhow!("Set {} and {} first", ENV_APP_ID, ENV_APP_SECRET))?;
    let app_secret = config
        .app_secret
        .as_deref()
        .ok_or_else(|| anyhow!("Set {} and {} first", ENV_APP_ID, ENV_APP_SECRET))?;

    eprintln!("  {}: {}", ENV_APP_ID, preview(app_id));
    eprintln!("  {}: {}", ENV_APP_SECRET, preview(app_secret));

    eprintln!("--- Step 1: obtain token ---");
    toolkit
        .client()
        .get_token(app_id, app_secret)
        .await
        .context("Failed to obtain token")?;
    eprintln!("Token obtained and cached\n");
    Ok(())
}

/// Obtain a token, verify it against `WOLAI_BLOCK_ID`, then append sample blocks
pub async fn check_blocks(toolkit: &Toolkit) -> Result<()> {
    let block_id = toolkit
        .config()
        .block_id
        .clone()
        .ok_or_else(|| anyhow!("Set {} first", ENV_BLOCK_ID))?;

    eprintln!("=== Wolai block check ===");
    obtain_token(toolkit).await?;

    eprintln!("--- Step 2: verify token by reading {} ---", block_id);
    toolkit.client().get_block(&block_id, None).await.context(
        "Failed to read block. The token may be invalid, or the app has not been added \
         to the page in its collaboration settings",
    )?;
    eprintln!("Token accepted\n");

    eprintln!("--- Step 3: create sample blocks ---");
    let blocks = vec![
        BlockCreate::text("Sample content created by the wolai CLI").with_alignment("left"),
        BlockCreate {
            content: Some(json!({ "title": "API check passed", "front_color": "blue" })),
            ..BlockCreate::heading(1, "")
        }
        .with_alignment("left"),
        BlockCreate::text(format!(
            "Created at: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))
        .with_alignment("left"),
    ];

    let urls = toolkit
        .client()
        .create_blocks(&block_id, &blocks, None)
        .await
        .context("Failed to create blocks")?;

    eprintln!("Created {} blocks:", urls.len());
    for (i, url) in urls.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, url);
    }

    println!("{}", serde_json::to_string_pretty(&json!({ "data": urls }))?);
    Ok(())
}

fn sample_row(first: &str, second: &str) -> DatabaseRow {
    let mut row = DatabaseRow::new();
    row.insert("Test column 1".to_string(), json!(first));
    row.insert("Test column 2".to_string(), json!(second));
    row.insert(
        "Created at".to_string(),
        json!(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
    );
    row
}

/// Obtain a token, read `WOLAI_DATABASE_ID`, then insert two sample rows
pub async fn check_database(toolkit: &Toolkit) -> Result<()> {
    let database_id = toolkit.config().database_id.clone().ok_or_else(|| {
        anyhow!(
            "Set {} first. It is the part of the database page URL after wolai.com/",
            ENV_DATABASE_ID
        )
    })?;

    eprintln!("=== Wolai database check ===");
    eprintln!("  {}: {}", ENV_DATABASE_ID, database_id);
    obtain_token(toolkit).await?;

    eprintln!("--- Step 2: read database ---");
    let database = toolkit
        .client()
        .get_database(&database_id, None)
        .await
        .context("Failed to read database")?;
    let structure = serde_json::to_string_pretty(&database)?;
    let shown: String = structure.chars().take(500).collect();
    eprintln!("Database structure: {}...\n", shown);

    eprintln!("--- Step 3: insert sample rows ---");
    let rows = vec![sample_row("Sample 1", "Sample 2"), sample_row("Sample 3", "Sample 4")];
    let result = toolkit
        .client()
        .create_database_rows(&database_id, &rows, None)
        .await
        .context("Failed to insert rows. Row keys must match the database's column names")?;

    eprintln!("Rows inserted");
    println!("{}", serde_json::to_string_pretty(&json!({ "data": result }))?);
    Ok(())
}
