use reqwest::{Response, StatusCode};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid backend URL: {0}")]
    Url(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl ClientError {
    /// HTTP status the backend answered with, when one was received.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound => Some(404),
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Url(_) => None,
        }
    }
}

/// Maps a non-success response into a [`ClientError`], keeping the body
/// text so it can be surfaced in the inline error banner.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}
