//! Entity instance identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Lengths of the hyphen-separated groups of a canonical UUID.
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// A validated entity id in canonical lowercase UUID form
/// (`xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`).
///
/// # Example
///
/// ```
/// use cuba_core::EntityId;
///
/// assert!(EntityId::new("60885987-1b61-4247-94c7-dff348347f93").is_ok());
/// assert!(EntityId::new("60885987-1B61-4247-94C7-DFF348347F93").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Create a new entity id, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidFormat`](crate::ErrorKind::InvalidFormat) error if
    /// the string is not a lowercase 8-4-4-4-12 hex UUID.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        if !is_canonical_uuid(&s) {
            return Err(Error::invalid_format(format!(
                "\"{s}\" is not valid UUID format"
            )));
        }
        Ok(Self(s))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_canonical_uuid(s: &str) -> bool {
    let groups: Vec<&str> = s.split('-').collect();
    groups.len() == GROUPS.len()
        && groups.iter().zip(GROUPS).all(|(group, len)| {
            group.len() == len
                && group
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        })
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
