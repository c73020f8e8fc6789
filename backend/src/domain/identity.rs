//! Principal identity primitives.
//!
//! Principals are authenticated upstream by the external identity provider;
//! the core trusts the id it is handed and never re-verifies credentials.
//! Provider ids are opaque strings (not UUIDs), so [`UserId`] only enforces
//! that the id is non-empty and free of surrounding whitespace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdValidationError {
    Empty,
    SurroundingWhitespace,
}

impl fmt::Display for UserIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "user id must not be empty"),
            Self::SurroundingWhitespace => {
                write!(f, "user id must not have leading or trailing whitespace")
            }
        }
    }
}

impl std::error::Error for UserIdValidationError {}

/// Opaque authenticated principal id supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(UserIdValidationError::SurroundingWhitespace);
        }
        Ok(Self(id))
    }

    /// Borrow the raw provider id.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Name and contact details for a principal, read from the users table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Derived role of a principal.
///
/// A principal is a client iff they appear in coach_clients as a client;
/// everyone else is treated as a coach. The role is computed from the
/// relationship at call time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Coach,
    Client,
}

/// Display unit preference for logged weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitPreference {
    #[default]
    Kg,
    Lb,
}

impl UnitPreference {
    /// Database representation of the preference.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lb => "lb",
        }
    }

    /// Parse a stored preference, defaulting unknown values to kilograms.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "lb" => Self::Lb,
            _ => Self::Kg,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("user_2abcDEF")]
    #[case("seed-demo-client-1")]
    fn accepts_opaque_provider_ids(#[case] raw: &str) {
        let id = UserId::new(raw).expect("valid id");
        assert_eq!(id.as_str(), raw);
    }

    #[rstest]
    #[case("", UserIdValidationError::Empty)]
    #[case(" user_1", UserIdValidationError::SurroundingWhitespace)]
    #[case("user_1\n", UserIdValidationError::SurroundingWhitespace)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: UserIdValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn unit_preference_round_trips_and_defaults() {
        assert_eq!(UnitPreference::from_stored("lb"), UnitPreference::Lb);
        assert_eq!(UnitPreference::from_stored("kg"), UnitPreference::Kg);
        assert_eq!(UnitPreference::from_stored("stone"), UnitPreference::Kg);
        assert_eq!(UnitPreference::Lb.as_str(), "lb");
    }
}
