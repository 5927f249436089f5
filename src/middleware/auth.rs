use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::{AppError, Result};
use crate::repositories::MemberRepository;

pub const AUTH_KEY_HEADER: &str = "Auth-Key";
pub const MEMBER_ID_HEADER: &str = "Member-Id";

/// A member whose auth key has been checked against the stored one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthMember {
    pub member_id: i64,
}

/// Credential headers as presented by the client. Extraction never fails;
/// the check itself happens in [`Credentials::authorize`], once the handler
/// knows which member owns the resource.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    auth_key: Option<String>,
    member_id: Option<String>,
}

impl Credentials {
    pub fn new(auth_key: Option<String>, member_id: Option<String>) -> Self {
        Self {
            auth_key,
            member_id,
        }
    }

    /// Owner named by the `Member-Id` header, for routes keyed by something
    /// other than the member.
    pub fn header_member_id(&self) -> Result<i64> {
        self.member_id
            .as_deref()
            .and_then(|id| id.trim().parse().ok())
            .ok_or_else(AppError::unknown_member)
    }

    /// Exact string comparison with the owner's stored key. No expiry, no
    /// rotation.
    pub async fn authorize(&self, members: &MemberRepository, member_id: i64) -> Result<AuthMember> {
        let stored = members
            .auth_key(member_id)
            .await?
            .ok_or_else(AppError::unknown_member)?;

        match self.auth_key.as_deref() {
            Some(presented) if presented == stored => Ok(AuthMember { member_id }),
            _ => {
                tracing::warn!("Rejected auth key for member {}", member_id);
                Err(AppError::invalid_auth_key())
            }
        }
    }

    /// [`authorize`](Self::authorize) for an owner id taken from a request
    /// body, where it may be absent.
    pub async fn authorize_optional(
        &self,
        members: &MemberRepository,
        member_id: Option<i64>,
    ) -> Result<AuthMember> {
        let member_id = member_id.ok_or_else(AppError::unknown_member)?;
        self.authorize(members, member_id).await
    }

    /// Checks against the owner named in the `Member-Id` header.
    pub async fn authorize_header(&self, members: &MemberRepository) -> Result<AuthMember> {
        let member_id = self.header_member_id()?;
        self.authorize(members, member_id).await
    }
}

impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Ok(Credentials {
            auth_key: header(AUTH_KEY_HEADER),
            member_id: header(MEMBER_ID_HEADER),
        })
    }
}
