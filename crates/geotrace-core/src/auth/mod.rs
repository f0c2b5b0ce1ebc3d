//! Operator authentication and bearer token checks
//!
//! A single fixed operator identity logs in with [`CredentialIssuer`] and
//! receives a signed, time-bounded token. [`AccessGate`] verifies that token
//! before any protected read. Nothing is stored server-side.

mod gate;
mod issuer;
mod token;

pub use gate::{bearer_token, AccessGate};
pub use issuer::CredentialIssuer;
pub use token::{AccessToken, Claims, Identity, TOKEN_TYPE};
