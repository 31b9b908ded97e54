use serde::{Deserialize, Serialize};

use crate::auth::{Expiration, NO_EXPIRATION_SENTINEL};

fn no_expiration() -> i64 {
    NO_EXPIRATION_SENTINEL
}

/// App token as returned by `POST /token` and `PUT /token`.
///
/// Timestamps are Unix milliseconds; `expire_time` is `-1` for tokens that
/// never expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub app_token: String,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub create_time: Option<i64>,
    #[serde(default = "no_expiration")]
    pub expire_time: i64,
    #[serde(default)]
    pub update_time: Option<i64>,
}

impl TokenInfo {
    pub fn expiration(&self) -> Expiration {
        Expiration::from_remote_millis(self.expire_time)
    }
}
