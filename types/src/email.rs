//! Validated verifier email address.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A syntactically valid email address.
///
/// Validation is deliberately shallow: one `@`, a non-empty local part, and
/// a dotted domain with non-empty labels. Deliverability is the notification
/// collaborator's problem.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        if s.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidEmail(s));
        }
        let mut parts = s.splitn(2, '@');
        let local = parts.next().unwrap_or("");
        let domain = parts.next().unwrap_or("");
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(TypeError::InvalidEmail(s));
        }
        if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            return Err(TypeError::InvalidEmail(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(EmailAddress::parse("boss@co.com").is_ok());
        assert!(EmailAddress::parse("first.last@sub.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "",
            "no-at-sign",
            "@co.com",
            "boss@",
            "boss@nodot",
            "boss@co..com",
            "boss@.com",
            "boss@co.com ",
            "bo ss@co.com",
            "a@b@co.com",
        ] {
            assert!(EmailAddress::parse(bad).is_err(), "accepted: {bad:?}");
        }
    }
}
