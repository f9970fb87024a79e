//! Core type definition module
//!
//! Request options, response envelopes and the error taxonomy shared by every
//! layer of the client.

pub mod api_error;
pub mod envelope;
pub mod error_code;
pub mod pagination;
pub mod request;

// Re-export all public types
pub use api_error::*;
pub use envelope::*;
pub use error_code::*;
pub use pagination::*;
pub use request::*;
