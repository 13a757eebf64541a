//! Session client for the auth API.
//!
//! Holds the access token in process memory only, attaches it to
//! authenticated calls, and recovers from an expired access token by
//! calling the refresh endpoint once per failed call before giving up.
//! The refresh token itself never leaves the HTTP cookie store.

pub mod error;
pub mod session;
pub mod session_client;

pub use error::ClientError;
pub use session::{SessionEvent, SessionState};
pub use session_client::{ApiRequest, SessionClient};
