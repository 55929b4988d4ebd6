//! Query parameter extractors.

use serde::Deserialize;

/// `?token=` fallback for clients that cannot set headers (browser WebSockets).
#[derive(Debug, Deserialize, Default)]
pub struct TokenQuery {
    pub token: Option<String>,
}
