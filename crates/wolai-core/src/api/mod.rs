//! REST API client module for the Wolai open API.
//!
//! This module provides the `WolaiClient` for obtaining app tokens and
//! reading or writing blocks and databases.
//!
//! The API authenticates with an app token sent verbatim in the
//! `Authorization` header. Tokens come from `get_token`/`refresh_token` and
//! are kept in the shared `TokenCache`.

pub mod client;
pub mod error;

pub use client::{WolaiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
