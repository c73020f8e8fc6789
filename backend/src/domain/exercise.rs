//! Exercise catalog types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::identity::UserId;

/// Movement category of an exercise.
///
/// The variants mirror the datastore enum exactly; parsing rejects anything
/// outside the fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    Squat,
    Hinge,
    Push,
    Pull,
    Carry,
    Core,
    Accessory,
    Cardio,
    Other,
}

impl ExerciseCategory {
    /// All categories, in display order.
    pub const ALL: [Self; 9] = [
        Self::Squat,
        Self::Hinge,
        Self::Push,
        Self::Pull,
        Self::Carry,
        Self::Core,
        Self::Accessory,
        Self::Cardio,
        Self::Other,
    ];

    /// Database representation of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::Hinge => "hinge",
            Self::Push => "push",
            Self::Pull => "pull",
            Self::Carry => "carry",
            Self::Core => "core",
            Self::Accessory => "accessory",
            Self::Cardio => "cardio",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown exercise category: {value}")]
pub struct UnknownCategory {
    pub value: String,
}

impl FromStr for ExerciseCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "squat" => Ok(Self::Squat),
            "hinge" => Ok(Self::Hinge),
            "push" => Ok(Self::Push),
            "pull" => Ok(Self::Pull),
            "carry" => Ok(Self::Carry),
            "core" => Ok(Self::Core),
            "accessory" => Ok(Self::Accessory),
            "cardio" => Ok(Self::Cardio),
            "other" => Ok(Self::Other),
            _ => Err(UnknownCategory {
                value: s.to_owned(),
            }),
        }
    }
}

/// A movement definition in the catalog.
///
/// `owner` is `None` for the shared global catalog; coach-owned entries are
/// only visible to (and mutable by) that coach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDefinition {
    pub id: Uuid,
    pub owner: Option<UserId>,
    pub name: String,
    pub category: ExerciseCategory,
    pub created_at: DateTime<Utc>,
}
