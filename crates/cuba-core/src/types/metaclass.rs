//! Metaclass (entity type) name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

const MAX_PREFIX_LEN: usize = 10;
const MAX_SEGMENTS: usize = 10;
const MAX_SEGMENT_TAIL_LEN: usize = 100;

/// A validated server-side entity type name such as `sec$User` or `std$Produce`.
///
/// The format is an optional lowercase prefix of up to 10 letters, a `$`,
/// then 1 to 10 capitalized words, each an uppercase letter followed by up to
/// 100 lowercase letters or digits.
///
/// # Example
///
/// ```
/// use cuba_core::Metaclass;
///
/// let metaclass = Metaclass::new("std$ProduceOrder").unwrap();
/// assert_eq!(metaclass.prefix(), "std");
/// assert_eq!(metaclass.type_name(), "ProduceOrder");
/// assert!(Metaclass::new("BadName").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Metaclass(String);

impl Metaclass {
    /// Create a new metaclass name, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidFormat`](crate::ErrorKind::InvalidFormat) error if
    /// the string does not match `xxx$XxxxXxxx`.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the lowercase prefix before `$` (may be empty).
    pub fn prefix(&self) -> &str {
        self.0.split_once('$').map(|(prefix, _)| prefix).unwrap_or("")
    }

    /// Returns the capitalized type name after `$`.
    pub fn type_name(&self) -> &str {
        self.0.split_once('$').map(|(_, name)| name).unwrap_or("")
    }

    /// Returns the full name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let reject = |reason: &str| {
            Err(Error::invalid_format(format!(
                "\"{s}\" does not match REST API metaclass format \"xxx$XxxxXxxx\": {reason}"
            )))
        };

        let Some((prefix, name)) = s.split_once('$') else {
            return reject("missing '$'");
        };

        if prefix.len() > MAX_PREFIX_LEN {
            return reject("prefix is longer than 10 characters");
        }
        if !prefix.chars().all(|c| c.is_ascii_lowercase()) {
            return reject("prefix must be lowercase letters");
        }

        if name.is_empty() {
            return reject("type name is empty");
        }

        // Every word starts with an uppercase letter, so uppercase letters
        // delimit the words.
        let mut segments = 0;
        let mut tail = 0;
        for (i, c) in name.chars().enumerate() {
            if c.is_ascii_uppercase() {
                segments += 1;
                tail = 0;
            } else if i == 0 {
                return reject("type name must start with an uppercase letter");
            } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
                tail += 1;
                if tail > MAX_SEGMENT_TAIL_LEN {
                    return reject("word is longer than 101 characters");
                }
            } else {
                return reject("type name must be letters and digits only");
            }
        }

        if segments > MAX_SEGMENTS {
            return reject("type name has more than 10 words");
        }

        Ok(())
    }
}

impl fmt::Display for Metaclass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Metaclass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Metaclass {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Metaclass> for String {
    fn from(metaclass: Metaclass) -> Self {
        metaclass.0
    }
}

impl AsRef<str> for Metaclass {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn valid_metaclass_names() {
        for name in ["std$Produce", "sec$User", "$Produce", "sys$FileDescriptor", "ref$Car2"] {
            assert!(Metaclass::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn invalid_metaclass_names() {
        for name in [
            "BadName",
            "",
            "std$",
            "std$produce",
            "Std$Produce",
            "std$Pro_duce",
            "std$Produce$Order",
            "verylongprefix$Produce",
            "std$ABCDEFGHIJK",
        ] {
            let err = Metaclass::new(name).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidFormat, "{name}");
        }
    }

    #[test]
    fn word_length_limit() {
        let ok = format!("std$P{}", "a".repeat(100));
        assert!(Metaclass::new(ok).is_ok());
        let too_long = format!("std$P{}", "a".repeat(101));
        assert!(Metaclass::new(too_long).is_err());
    }

    #[test]
    fn parts() {
        let metaclass = Metaclass::new("sec$UserRole").unwrap();
        assert_eq!(metaclass.prefix(), "sec");
        assert_eq!(metaclass.type_name(), "UserRole");
    }
}
