//! Server-side enumeration name.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

const MAX_PACKAGE_SEGMENTS: usize = 10;
const MAX_SEGMENT_LEN: usize = 100;

/// A validated fully-qualified enumeration name such as
/// `com.haulmont.cuba.core.entity.SendingStatus`.
///
/// One to ten lowercase package segments, then a simple name starting with an
/// uppercase letter followed by up to 100 letters, digits or `$`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumName(String);

impl EnumName {
    /// Create a new enum name, validating the format.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the simple name (last segment).
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Returns the full name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let reject = |reason: &str| {
            Err(Error::invalid_format(format!(
                "\"{s}\" does not match REST API enum format \"xxx.xxx.Xxxxxx\": {reason}"
            )))
        };

        let Some((package, simple)) = s.rsplit_once('.') else {
            return reject("missing package");
        };

        let segments: Vec<&str> = package.split('.').collect();
        if segments.len() > MAX_PACKAGE_SEGMENTS {
            return reject("more than 10 package segments");
        }
        for segment in segments {
            if segment.is_empty() || segment.len() > MAX_SEGMENT_LEN {
                return reject("package segment must be 1 to 100 characters");
            }
            if !segment.chars().all(|c| c.is_ascii_lowercase()) {
                return reject("package segment must be lowercase letters");
            }
        }

        let mut chars = simple.chars();
        if !chars.next().is_some_and(|c| c.is_ascii_uppercase()) {
            return reject("simple name must start with an uppercase letter");
        }
        if simple.len() > MAX_SEGMENT_LEN + 1 {
            return reject("simple name is longer than 101 characters");
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '$') {
            return reject("simple name must be letters, digits or '$'");
        }

        Ok(())
    }
}

impl fmt::Display for EnumName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EnumName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for EnumName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_enum_names() {
        let name = EnumName::new("com.haulmont.cuba.core.global.SendingStatus").unwrap();
        assert_eq!(name.simple_name(), "SendingStatus");
        assert!(EnumName::new("com.company.Outer$Inner").is_ok());
    }

    #[test]
    fn invalid_enum_names() {
        for s in [
            "",
            "SendingStatus",
            "com.haulmont.sendingStatus",
            "Com.haulmont.SendingStatus",
            "com..SendingStatus",
            "com.haulmont.Sending-Status",
            "a.b.c.d.e.f.g.h.i.j.k.Status",
        ] {
            assert!(EnumName::new(s).is_err(), "{s} should be invalid");
        }
    }
}
