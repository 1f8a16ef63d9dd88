//! Result of a mutation operation

use serde::{Deserialize, Serialize};

/// Success flag with an optional message
///
/// The default outcome is a success. An outcome built from a message alone
/// is a failure carrying that message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperationOutcome {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Failure without a message of its own
    pub fn failed() -> Self {
        Self {
            success: false,
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// The outcome message, or `fallback` when there is none
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
    }
}

impl Default for OperationOutcome {
    fn default() -> Self {
        Self {
            success: true,
            message: None,
        }
    }
}

impl From<bool> for OperationOutcome {
    fn from(success: bool) -> Self {
        Self {
            success,
            message: None,
        }
    }
}

impl From<String> for OperationOutcome {
    fn from(message: String) -> Self {
        Self::failure(message)
    }
}

impl From<&str> for OperationOutcome {
    fn from(message: &str) -> Self {
        Self::failure(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_success() {
        let outcome = OperationOutcome::default();
        assert!(outcome.is_success());
        assert_eq!(outcome.message, None);
    }

    #[test]
    fn test_message_only_is_failure() {
        let outcome: OperationOutcome = "Duplicate name".into();
        assert!(!outcome.is_success());
        assert_eq!(outcome.message_or("fallback"), "Duplicate name");
    }

    #[test]
    fn test_from_bool() {
        assert!(OperationOutcome::from(true).is_success());
        let failed = OperationOutcome::from(false);
        assert!(!failed.is_success());
        assert_eq!(failed.message_or("Error on operation"), "Error on operation");
    }
}
