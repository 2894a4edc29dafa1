//! Blocking REST sender backed by ureq.
//!
//! Authentication uses a personal access token in a basic-auth header, built
//! once at construction. A single agent handles every request; failed
//! requests are not retried.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use crate::sender::{Method, RequestSender, SendError};

/// Maximum response body size (variable group listings are small).
const MAX_BODY_SIZE: u64 = 10 * 1024 * 1024;

/// REST sender with PAT basic authentication.
pub struct RestSender {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Precomputed `Authorization` header value.
    auth: String,
}

impl RestSender {
    /// Create a sender authenticating with a personal access token.
    #[must_use]
    pub fn with_pat(pat: &str) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            auth: pat_header(pat),
        }
    }
}

/// Build the basic-auth header value for a personal access token.
///
/// The service expects `user:token` with an empty user.
fn pat_header(pat: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!(":{pat}")))
}

impl RequestSender for RestSender {
    fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, SendError> {
        log::debug!("{} {}", method.as_str(), url);

        let result = match (method, body) {
            (Method::Get, _) => self
                .agent
                .get(url)
                .header("Authorization", &self.auth)
                .header("Accept", "application/json")
                .call(),
            (Method::Delete, _) => self
                .agent
                .delete(url)
                .header("Authorization", &self.auth)
                .header("Accept", "application/json")
                .call(),
            (Method::Post, Some(body)) => self
                .agent
                .post(url)
                .header("Authorization", &self.auth)
                .header("Accept", "application/json")
                .send_json(body),
            (Method::Put, Some(body)) => self
                .agent
                .put(url)
                .header("Authorization", &self.auth)
                .header("Accept", "application/json")
                .send_json(body),
            (Method::Post | Method::Put, None) => {
                return Err(SendError::new("write request without a body", None));
            }
        };

        let mut response = result.map_err(SendError::from)?;
        let text = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_SIZE)
            .read_to_string()
            .map_err(|e| SendError::new(e.to_string(), None))?;

        // DELETE returns an empty body on success.
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| SendError::new(format!("invalid JSON response: {e}"), None))
    }
}

impl From<ureq::Error> for SendError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self {
                message: format!("HTTP {code}"),
                status: Some(code),
            },
            other => Self {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pat_header_encodes_empty_user() {
        // base64(":abc")
        assert_eq!(pat_header("abc"), "Basic OmFiYw==");
    }

    #[test]
    fn test_send_error_from_status() {
        let err: SendError = ureq::Error::StatusCode(409).into();
        assert_eq!(err.status, Some(409));
        assert!(err.message.contains("409"));
    }
}
