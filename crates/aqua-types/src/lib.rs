//! # aqua-types
//!
//! Shared domain types used across the AquaKeeper workspace.
//!
//! All timestamps are Unix epoch seconds. Concentrations are mg/L,
//! temperatures °C, hardness in degrees (dKH / dGH), volumes in litres.

pub mod aquarium;
pub mod species;
pub mod user;
pub mod water;

pub use aquarium::{Aquarium, Inhabitant, InhabitantKind};
pub use species::{Species, ToleranceRange};
pub use user::User;
pub use water::{Measurement, WaterChange, WaterChangeSettings, WaterParam, WaterReadings};

/// Row identifier as stored by SQLite.
pub type RowId = i64;

/// External platform (chat) user identifier.
pub type PlatformUserId = i64;

/// Seconds per day.
pub const SECS_PER_DAY: u64 = 86_400;

/// Errors raised when parsing domain enums from their textual form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    #[error("unknown inhabitant kind: {0}")]
    UnknownKind(String),

    #[error("unknown water parameter: {0}")]
    UnknownParam(String),
}
