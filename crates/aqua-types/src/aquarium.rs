//! Aquariums and their inhabitants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{RowId, TypesError};

/// A tank owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aquarium {
    pub id: RowId,
    pub user_id: RowId,
    pub name: String,
    pub description: Option<String>,
    /// Litres. `None` when the owner never entered it.
    pub volume_l: Option<f64>,
    pub created_at: u64,
}

/// What lives in a tank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InhabitantKind {
    Fish,
    Plant,
}

impl InhabitantKind {
    /// Column value used in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            InhabitantKind::Fish => "fish",
            InhabitantKind::Plant => "plant",
        }
    }
}

impl fmt::Display for InhabitantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InhabitantKind {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fish" | "fishes" => Ok(InhabitantKind::Fish),
            "plant" | "plants" => Ok(InhabitantKind::Plant),
            other => Err(TypesError::UnknownKind(other.to_string())),
        }
    }
}

/// A group of fish or plants of one species in a tank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Inhabitant {
    pub id: RowId,
    pub aquarium_id: RowId,
    pub kind: InhabitantKind,
    pub species: String,
    /// Always strictly positive.
    pub quantity: u32,
    pub added_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse() {
        assert_eq!("fish".parse::<InhabitantKind>(), Ok(InhabitantKind::Fish));
        assert_eq!(" Plants ".parse::<InhabitantKind>(), Ok(InhabitantKind::Plant));
        assert!(matches!(
            "snail".parse::<InhabitantKind>(),
            Err(TypesError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&InhabitantKind::Plant).expect("serialize");
        assert_eq!(json, "\"plant\"");
    }
}
