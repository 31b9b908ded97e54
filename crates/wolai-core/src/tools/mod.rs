//! Named tools over the Wolai API.
//!
//! Each tool takes JSON arguments, fills gaps from `Config`, calls one
//! `WolaiClient` method and returns `{"data": ...}`. `Toolkit` owns the
//! client, so every tool run through one toolkit shares the same token cache.

pub mod definitions;

use std::fmt;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{ApiError, WolaiClient};
use crate::config::{Config, ENV_APP_ID, ENV_APP_SECRET, ENV_BLOCK_ID, ENV_DATABASE_ID};
use crate::models::{BlockCreate, DatabaseRow};

pub use definitions::{definitions, ToolDefinition};

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    GetToken,
    RefreshToken,
    GetBlock,
    GetBlockChildren,
    CreateBlocks,
    GetDatabase,
    CreateDatabaseRows,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::GetToken,
        Tool::RefreshToken,
        Tool::GetBlock,
        Tool::GetBlockChildren,
        Tool::CreateBlocks,
        Tool::GetDatabase,
        Tool::CreateDatabaseRows,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::GetToken => "get_token",
            Tool::RefreshToken => "refresh_token",
            Tool::GetBlock => "get_block",
            Tool::GetBlockChildren => "get_block_children",
            Tool::CreateBlocks => "create_blocks",
            Tool::GetDatabase => "get_database",
            Tool::CreateDatabaseRows => "create_database_rows",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tool| tool.name() == name)
    }

    /// Gerund phrase used in error objects
    fn action(&self) -> &'static str {
        match self {
            Tool::GetToken => "obtaining the token",
            Tool::RefreshToken => "refreshing token",
            Tool::GetBlock => "retrieving block",
            Tool::GetBlockChildren => "retrieving block children",
            Tool::CreateBlocks => "creating blocks",
            Tool::GetDatabase => "retrieving database",
            Tool::CreateDatabaseRows => "creating rows",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GetTokenArgs {
    #[serde(rename = "appId", alias = "app_id")]
    app_id: Option<String>,
    #[serde(rename = "appSecret", alias = "app_secret")]
    app_secret: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TokenArgs {
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EntityArgs {
    id: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreateBlocksArgs {
    parent_id: Option<String>,
    blocks: Vec<BlockCreate>,
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreateRowsArgs {
    database_id: Option<String>,
    rows: Vec<DatabaseRow>,
    token: Option<String>,
}

fn parse_args<T: DeserializeOwned + Default>(tool: Tool, arguments: Value) -> Result<T> {
    if arguments.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(arguments).map_err(|source| {
        ToolError::InvalidArguments {
            tool: tool.name(),
            source,
        }
        .into()
    })
}

/// First non-empty value of `explicit` and `fallback`.
fn pick(explicit: Option<String>, fallback: Option<&String>) -> Option<String> {
    explicit
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.cloned())
}

// ============================================================================
// Toolkit
// ============================================================================

#[derive(Clone)]
pub struct Toolkit {
    client: WolaiClient,
    config: Config,
}

impl Toolkit {
    pub fn new(client: WolaiClient, config: Config) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &WolaiClient {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the tool called `name`
    pub async fn execute(&self, name: &str, arguments: Value) -> Result<Value> {
        let tool = Tool::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        self.run(tool, arguments).await
    }

    /// Like `execute`, but failures become `{"error": "..."}` objects.
    pub async fn execute_or_error_object(&self, name: &str, arguments: Value) -> Value {
        let Some(tool) = Tool::from_name(name) else {
            warn!(tool = name, "Unknown tool requested");
            return json!({ "error": ToolError::UnknownTool(name.to_string()).to_string() });
        };

        match self.run(tool, arguments).await {
            Ok(value) => value,
            Err(e) => {
                warn!(tool = %tool, error = %format!("{:#}", e), "Tool failed");
                json!({
                    "error": format!("An error occurred while {}: {:#}", tool.action(), e)
                })
            }
        }
    }

    async fn run(&self, tool: Tool, arguments: Value) -> Result<Value> {
        debug!(tool = %tool, "Running tool");

        let data = match tool {
            Tool::GetToken => {
                let args: GetTokenArgs = parse_args(tool, arguments)?;
                let app_id = pick(args.app_id, self.config.app_id.as_ref())
                    .ok_or_else(|| ApiError::missing_with_env("App ID", ENV_APP_ID))?;
                let app_secret = pick(args.app_secret, self.config.app_secret.as_ref())
                    .ok_or_else(|| ApiError::missing_with_env("App Secret", ENV_APP_SECRET))?;
                serde_json::to_value(self.client.get_token(&app_id, &app_secret).await?)?
            }
            Tool::RefreshToken => {
                let args: TokenArgs = parse_args(tool, arguments)?;
                serde_json::to_value(self.client.refresh_token(args.token.as_deref()).await?)?
            }
            Tool::GetBlock => {
                let args: EntityArgs = parse_args(tool, arguments)?;
                let id = args.id.ok_or_else(|| ApiError::missing("Block ID"))?;
                self.client.get_block(&id, args.token.as_deref()).await?
            }
            Tool::GetBlockChildren => {
                let args: EntityArgs = parse_args(tool, arguments)?;
                let id = args.id.ok_or_else(|| ApiError::missing("Block ID"))?;
                self.client
                    .get_block_children(&id, args.token.as_deref())
                    .await?
            }
            Tool::CreateBlocks => {
                let args: CreateBlocksArgs = parse_args(tool, arguments)?;
                let parent_id = pick(args.parent_id, self.config.block_id.as_ref())
                    .ok_or_else(|| ApiError::missing_with_env("Parent ID", ENV_BLOCK_ID))?;
                let urls = self
                    .client
                    .create_blocks(&parent_id, &args.blocks, args.token.as_deref())
                    .await?;
                serde_json::to_value(urls)?
            }
            Tool::GetDatabase => {
                let args: EntityArgs = parse_args(tool, arguments)?;
                let id = args.id.ok_or_else(|| ApiError::missing("Database ID"))?;
                self.client.get_database(&id, args.token.as_deref()).await?
            }
            Tool::CreateDatabaseRows => {
                let args: CreateRowsArgs = parse_args(tool, arguments)?;
                let database_id = pick(args.database_id, self.config.database_id.as_ref())
                    .ok_or_else(|| ApiError::missing_with_env("Database ID", ENV_DATABASE_ID))?;
                self.client
                    .create_database_rows(&database_id, &args.rows, args.token.as_deref())
                    .await?
            }
        };

        Ok(json!({ "data": data }))
    }
}
