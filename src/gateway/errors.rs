use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Transport error: processor responded with status {0}")]
    Status(StatusCode),
    #[error("Transport error: {0}")]
    Unavailable(String)
}
