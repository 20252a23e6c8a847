//! Validated email address for user accounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

use crate::error::DomainError;

/// A syntactically valid, trimmed email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` with "Invalid email format." when the
    /// address does not pass the HTML5 email rule.
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();
        if !trimmed.validate_email() {
            return Err(DomainError::validation("Invalid email format."));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> String {
        email.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_address() {
        let email = Email::new(" testuser1@example.com ").unwrap();
        assert_eq!(email.as_str(), "testuser1@example.com");
    }

    #[test]
    fn rejects_missing_at_sign() {
        let err = Email::new("not-an-email").unwrap_err();
        assert_eq!(err, DomainError::validation("Invalid email format."));
    }

    #[test]
    fn rejects_empty() {
        assert!(Email::new("").is_err());
    }
}
