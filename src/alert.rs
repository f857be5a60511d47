//! Alert system for success and error messages shown to users.
//!
//! This module provides a unified way to describe the transient notices the
//! screens display, e.g. the deletion notice with its undo action or the
//! negative balance warning.

use serde::Serialize;

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    /// The operation worked, e.g. a transaction was deleted.
    Success,
    /// Something needs the user's attention.
    Error,
}

/// A message for the user with optional details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// How the alert should be styled.
    pub kind: AlertKind,
    /// The headline.
    pub message: String,
    /// Extra context, may be empty.
    pub details: String,
}

impl Alert {
    /// Create a new success alert
    pub fn success(message: &str, details: &str) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert without details
    pub fn error_simple(message: &str) -> Self {
        Self::error(message, "")
    }
}
