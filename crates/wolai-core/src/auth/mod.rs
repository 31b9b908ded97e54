//! Authentication state for Wolai API calls.
//!
//! This module provides:
//! - `TokenCache`: the single in-memory slot holding the current app token
//! - `Expiration`: when a cached token stops being usable
//! - `Clock`: the time source used for expiration checks
//!
//! Tokens are never written to disk. Expiration is enforced lazily, when the
//! cache is read.

pub mod token_cache;

pub use token_cache::{Clock, Expiration, SystemClock, TokenCache, NO_EXPIRATION_SENTINEL};
