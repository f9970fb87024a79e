//! Configuration validation
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `url`: base URL checks
//! - `config_validators`: API and logging validators
//! - `auth_validators`: token refresh and brute-force validators
//! - `tests`: Test suite for all validators

mod auth_validators;
mod config_validators;
mod trait_def;
mod url;

pub use trait_def::Validate;
pub use url::validate_base_url;
