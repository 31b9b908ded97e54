use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, warn};

/// Value of `expire_time` the Wolai API uses for tokens that never expire.
pub const NO_EXPIRATION_SENTINEL: i64 = -1;

/// When a cached token stops being usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Valid until replaced or cleared.
    Never,
    /// Invalid at and after this instant.
    At(DateTime<Utc>),
}

impl Expiration {
    /// Translate the API's `expire_time` (Unix milliseconds, or `-1`).
    pub fn from_remote_millis(value: i64) -> Self {
        if value == NO_EXPIRATION_SENTINEL {
            return Expiration::Never;
        }
        match DateTime::from_timestamp_millis(value) {
            Some(at) => Expiration::At(at),
            // Beyond chrono's range: far future never lapses, far past already has
            None if value > 0 => Expiration::Never,
            None => Expiration::At(DateTime::<Utc>::MIN_UTC),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Expiration::Never => false,
            Expiration::At(at) => now >= *at,
        }
    }
}

/// Source of the current time for expiration checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CachedToken {
    token: String,
    expiration: Expiration,
}

/// Single-slot cache for the current app token.
///
/// One instance is created per process and shared by `Arc` with every
/// `WolaiClient`. All operations take the same lock and never block on I/O,
/// so concurrent callers always see a consistent slot.
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
    clock: Arc<dyn Clock>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a cache that judges expiration with the given clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            clock,
        }
    }

    /// Replace whatever is cached with `token`.
    ///
    /// An empty token is not a credential, so storing one leaves the slot empty.
    pub fn store(&self, token: impl Into<String>, expiration: Expiration) {
        let token = token.into();
        let mut slot = self.slot.lock();
        if token.is_empty() {
            warn!("Refusing to cache an empty token, clearing slot");
            *slot = None;
            return;
        }
        debug!(?expiration, "Caching app token");
        *slot = Some(CachedToken { token, expiration });
    }

    /// Return the cached token if it is still valid.
    ///
    /// An expired token is dropped from the slot before returning `None`.
    pub fn read(&self) -> Option<String> {
        let mut slot = self.slot.lock();
        let now = self.clock.now();

        let expired = match slot.as_ref() {
            None => return None,
            Some(cached) => cached.expiration.is_expired_at(now),
        };

        if expired {
            warn!("Cached app token has expired, clearing slot");
            *slot = None;
            return None;
        }

        slot.as_ref().map(|cached| cached.token.clone())
    }

    /// Empty the slot
    pub fn clear(&self) {
        self.slot.lock().take();
    }

    /// True if `read()` would return a token, with the same side effect.
    pub fn is_valid(&self) -> bool {
        self.read().is_some()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.lock();
        let state = match slot.as_ref() {
            None => "empty".to_string(),
            Some(cached) => format!("holding(expiration: {:?})", cached.expiration),
        };
        f.debug_struct("TokenCache").field("slot", &state).finish()
    }
}
