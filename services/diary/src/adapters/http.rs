//! services/diary/src/adapters/http.rs
//!
//! Shared plumbing for the JSON-over-HTTP generation backends: building the
//! client, posting a body, and turning failure bodies into `PortError`s.

use std::time::Duration;

use manga_diary_core::ports::{PortError, PortResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The failure body both backends send with a non-2xx status.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Builds the shared HTTP client. Without a timeout, a hung backend call
/// waits indefinitely.
pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// POSTs `body` as JSON to `url` and decodes a successful JSON response.
pub(crate) async fn post_json<B, T>(client: &reqwest::Client, url: &str, body: &B) -> PortResult<T>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    debug!(url, "POST");
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| PortError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        debug!(url, status = status.as_u16(), body = %text, "Backend rejected request");
        return Err(PortError::Rejected {
            status: status.as_u16(),
            message: extract_error_message(&text),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| PortError::Malformed(e.to_string()))
}

/// The `error` field of a failure body, else its `message` field.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    [parsed.error, parsed.message]
        .into_iter()
        .flatten()
        .find(|message| !message.trim().is_empty())
}
