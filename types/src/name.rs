//! Account names.
//!
//! A name is 3 to 16 bytes of dot-separated segments. Each segment is at least
//! three characters, starts with a lowercase letter, ends with a letter or a
//! digit, and contains only lowercase letters, digits and hyphens.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_ACCOUNT_NAME_LENGTH: usize = 3;
pub const MAX_ACCOUNT_NAME_LENGTH: usize = 16;

/// A validated account name.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if is_valid_account_name(&name) {
            Ok(Self(name))
        } else {
            Err(ValidationError::InvalidAccountName(name))
        }
    }

    /// The sink account. Fees paid to it leave circulation.
    pub fn null() -> Self {
        Self("null".to_string())
    }

    /// The shared creator for accounts that have no recovery partner.
    pub fn temp() -> Self {
        Self("temp".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check the naming rules without allocating.
pub fn is_valid_account_name(name: &str) -> bool {
    if name.len() < MIN_ACCOUNT_NAME_LENGTH || name.len() > MAX_ACCOUNT_NAME_LENGTH {
        return false;
    }
    name.split('.').all(|segment| {
        let bytes = segment.as_bytes();
        let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
            return false;
        };
        bytes.len() >= MIN_ACCOUNT_NAME_LENGTH
            && first.is_ascii_lowercase()
            && (last.is_ascii_lowercase() || last.is_ascii_digit())
            && bytes
                .iter()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
    })
}

impl TryFrom<String> for AccountName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for AccountName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<AccountName> for String {
    fn from(name: AccountName) -> Self {
        name.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
