//! wolai - run Wolai API tools from the command line.
//!
//! One process owns one token cache, so a token obtained with `get_token`
//! is reused by later calls within the same `session`.

mod checks;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wolai_core::{tools, Config, TokenCache, Toolkit, WolaiClient};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every tool definition as JSON
    Tools,

    /// Run a single tool and print its result
    Call {
        /// Tool name, e.g. get_token
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Run tool calls read as JSON lines from stdin, sharing one token cache
    Session,

    /// Obtain a token, read WOLAI_BLOCK_ID and append sample blocks to it
    CheckBlocks,

    /// Obtain a token, read WOLAI_DATABASE_ID and insert sample rows
    CheckDatabase,
}

/// One line of `session` input
#[derive(Debug, Deserialize)]
struct SessionRequest {
    tool: String,
    #[serde(default)]
    arguments: Value,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let args = Args::parse();

    let config = Config::from_env().context("Failed to read configuration")?;
    debug!(?config, "Configuration loaded");

    let client = WolaiClient::from_config(&config, Arc::new(TokenCache::new()))?;
    let toolkit = Toolkit::new(client, config);

    match args.command {
        Command::Tools => print_json(&serde_json::to_value(tools::definitions())?),
        Command::Call { tool, args } => {
            let arguments: Value =
                serde_json::from_str(&args).context("--args must be a JSON object")?;
            let result = toolkit.execute_or_error_object(&tool, arguments).await;
            print_json(&result)
        }
        Command::Session => run_session(&toolkit).await,
        Command::CheckBlocks => checks::check_blocks(&toolkit).await,
        Command::CheckDatabase => checks::check_database(&toolkit).await,
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute JSON-line requests from stdin in order, one JSON result per line.
async fn run_session(toolkit: &Toolkit) -> Result<()> {
    info!("Session started, reading tool calls from stdin");
    let calls = process_session(
        toolkit,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;
    info!(calls = calls, "Session finished");
    Ok(())
}

/// Run each request line from `reader` and write its result to `writer`.
/// Returns the number of tool calls made.
async fn process_session<R, W>(toolkit: &Toolkit, reader: R, mut writer: W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut count = 0usize;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<SessionRequest>(line) {
            Ok(request) => {
                count += 1;
                let result = toolkit
                    .execute_or_error_object(&request.tool, request.arguments)
                    .await;
                json!({ "tool": request.tool, "result": result })
            }
            Err(e) => json!({ "error": format!("Invalid request line: {}", e) }),
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    Ok(count)
}
