//! Token refresh coordination
//!
//! Keeps the session credential fresh: a background loop refreshes tokens
//! that are about to expire, and a single-flight refresh entry point serves
//! both the loop and the retry engine's forced refresh on 401.

mod background;
mod coordinator;
mod types;


pub use coordinator::TokenRefreshCoordinator;
pub use types::{NoopObserver, RefreshObserver, RefreshSnapshot, RefreshStats, RefreshTrigger};
