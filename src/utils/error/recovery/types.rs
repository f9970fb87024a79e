//! Types for error classification and recovery

use serde::{Deserialize, Serialize};

/// How loudly a failure should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// User-facing recovery action offered alongside an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryAction {
    /// Re-authenticate
    LogIn,
    /// Open the subscription plans page
    ViewPlans,
    /// Reload the application
    Reload,
    /// Repeat the operation
    TryAgain,
    /// Navigate away from a missing resource
    GoBack,
    /// Escalate to support
    ContactSupport,
}

impl RecoveryAction {
    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            RecoveryAction::LogIn => "Log in again",
            RecoveryAction::ViewPlans => "View Plans",
            RecoveryAction::Reload => "Reload",
            RecoveryAction::TryAgain => "Try again",
            RecoveryAction::GoBack => "Go back",
            RecoveryAction::ContactSupport => "Contact support",
        }
    }
}
