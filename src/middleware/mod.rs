pub mod auth;

pub use auth::{AuthMember, Credentials, AUTH_KEY_HEADER, MEMBER_ID_HEADER};
