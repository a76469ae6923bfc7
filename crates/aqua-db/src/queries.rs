//! Database query functions organized by table.

pub mod aquariums;
pub mod inhabitants;
pub mod measurements;
pub mod settings;
pub mod species;
pub mod users;
pub mod water_changes;
pub mod water_settings;
