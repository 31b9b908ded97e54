//! Data models for Wolai API payloads.
//!
//! - `TokenInfo`: app token returned by token issuance and refresh
//! - `BlockCreate`: a block to insert under a page or block
//! - `DatabaseRow`: one row to insert into an existing database
//! - `ApiResponse`: the `{"data": ...}` envelope every endpoint uses

pub mod block;
pub mod database;
pub mod token;

use serde::{Deserialize, Serialize};

pub use block::BlockCreate;
pub use database::DatabaseRow;
pub use token::TokenInfo;

/// Success envelope shared by all endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}
