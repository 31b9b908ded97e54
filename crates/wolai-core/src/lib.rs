//! Core library for wolai-tools.
//!
//! Provides the shared app-token cache, a typed client for the Wolai open
//! API, and a registry exposing each API call as a named JSON tool.
//!
//! A process builds one `TokenCache`, hands it to a `WolaiClient`, and wraps
//! the client in a `Toolkit`:
//!
//! ```no_run
//! use std::sync::Arc;
//! use wolai_core::{Config, TokenCache, Toolkit, WolaiClient};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let client = WolaiClient::from_config(&config, Arc::new(TokenCache::new()))?;
//! let toolkit = Toolkit::new(client, config);
//! let token = toolkit.execute("get_token", serde_json::json!({})).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod tools;

pub use api::{ApiError, WolaiClient};
pub use auth::{Expiration, TokenCache};
pub use config::Config;
pub use models::{BlockCreate, DatabaseRow, TokenInfo};
pub use tools::{Tool, ToolError, Toolkit};
