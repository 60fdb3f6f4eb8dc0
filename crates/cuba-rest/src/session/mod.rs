//! Session state and authenticated execution.

mod manager;
mod store;

pub use manager::{MAX_ATTEMPTS, RefreshObserver, ResourceRequest, SessionManager};
pub use store::{SessionTokens, TokenStore};
