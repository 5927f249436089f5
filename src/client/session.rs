use crate::models::AuthResponse;

use super::keychain::{CredentialStore, CredentialStoreError};
use super::{ClientConfig, ClientError};

pub const MEMBER_ID_ACCOUNT: &str = "memberId";
pub const AUTH_KEY_ACCOUNT: &str = "authKey";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Authenticated(AuthResponse),
    Unauthenticated,
}

impl AuthState {
    pub fn credentials(&self) -> Option<&AuthResponse> {
        match self {
            AuthState::Authenticated(creds) => Some(creds),
            AuthState::Unauthenticated => None,
        }
    }
}

/// Persists the member id and auth key between launches.
pub struct Session<S> {
    store: S,
    service: String,
}

impl<S: CredentialStore> Session<S> {
    pub fn new(store: S, service: impl Into<String>) -> Self {
        Self {
            store,
            service: service.into(),
        }
    }

    /// Stores secrets under `config.keychain_service`.
    pub fn from_config(store: S, config: &ClientConfig) -> Self {
        Self::new(store, config.keychain_service.clone())
    }

    /// Authenticated only when both secrets are stored and the member id
    /// parses. A half-written pair reads as signed out.
    pub fn restore(&self) -> Result<AuthState, CredentialStoreError> {
        let member_id = self.store.load(&self.service, MEMBER_ID_ACCOUNT)?;
        let auth_key = self.store.load(&self.service, AUTH_KEY_ACCOUNT)?;

        let (Some(member_id), Some(auth_key)) = (member_id, auth_key) else {
            return Ok(AuthState::Unauthenticated);
        };

        let member_id = String::from_utf8(member_id)
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok());
        let auth_key = String::from_utf8(auth_key).ok().filter(|k| !k.is_empty());

        match (member_id, auth_key) {
            (Some(member_id), Some(auth_key)) => {
                tracing::debug!("Restored session for member {}", member_id);
                Ok(AuthState::Authenticated(AuthResponse {
                    member_id,
                    auth_key,
                }))
            }
            _ => {
                tracing::warn!("Stored credentials are unreadable, treating as signed out");
                Ok(AuthState::Unauthenticated)
            }
        }
    }

    pub fn sign_in(&self, creds: &AuthResponse) -> Result<AuthState, CredentialStoreError> {
        self.store.save(
            &self.service,
            MEMBER_ID_ACCOUNT,
            creds.member_id.to_string().as_bytes(),
        )?;
        self.store
            .save(&self.service, AUTH_KEY_ACCOUNT, creds.auth_key.as_bytes())?;
        Ok(AuthState::Authenticated(creds.clone()))
    }

    pub fn sign_out(&self) -> Result<AuthState, CredentialStoreError> {
        self.store.delete(&self.service, MEMBER_ID_ACCOUNT)?;
        self.store.delete(&self.service, AUTH_KEY_ACCOUNT)?;
        Ok(AuthState::Unauthenticated)
    }

    pub fn credentials(&self) -> Result<AuthResponse, ClientError> {
        match self.restore()? {
            AuthState::Authenticated(creds) => Ok(creds),
            AuthState::Unauthenticated => Err(ClientError::NotSignedIn),
        }
    }
}
