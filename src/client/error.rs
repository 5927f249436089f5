use reqwest::StatusCode;
use thiserror::Error;

use super::keychain::CredentialStoreError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Credential store error: {0}")]
    Store(#[from] CredentialStoreError),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server rejected the stored credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
