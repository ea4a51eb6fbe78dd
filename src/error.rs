//! Failure taxonomy for calls against the user-management API.
//!
//! Every failed call ends up in the error banner; [`ApiError::compose_banner`]
//! builds that text from a fixed per-call context plus whatever the failure
//! carries (message, HTTP status, response body).

use std::error::Error as StdError;
use std::path::PathBuf;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connect, DNS, TLS, request build).
    #[error("{0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {}", .status.as_u16())]
    Status {
        status: StatusCode,
        body: Option<Value>,
    },
    /// A 2xx response whose body did not have the expected shape.
    #[error("Unexpected response body: {reason}")]
    Decode { status: StatusCode, reason: String },
    /// The configured base URL cannot have endpoint paths appended.
    #[error("base URL cannot carry a path: {0}")]
    InvalidBaseUrl(url::Url),
    /// The selected photo could not be read; nothing was sent.
    #[error("Failed to read photo {}: {source}", .path.display())]
    Photo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's Display stops at the outermost layer; the useful part
        // ("connection refused", "dns error") sits further down the chain.
        let mut message = err.to_string();
        let mut source = StdError::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::Transport(message)
    }
}

impl ApiError {
    /// HTTP status of the response this failure came from, if there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::Transport(_) | Self::InvalidBaseUrl(_) | Self::Photo { .. } => None,
        }
    }

    /// Response body of a non-2xx answer, if the server sent one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Build the error banner text: context, message, then the status line
    /// and a pretty-printed body when the failure came with a response.
    pub fn compose_banner(&self, context: &str) -> String {
        let mut lines = vec![format!("{context}:"), self.to_string()];
        if let Some(status) = self.status() {
            lines.push(format!(
                "{} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            ));
        }
        if let Some(body) = self.body() {
            lines.push(serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string()));
        }
        lines.join("\n")
    }
}
