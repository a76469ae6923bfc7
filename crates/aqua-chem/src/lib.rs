//! # aqua-chem
//!
//! Water chemistry for aquarium keeping.
//!
//! Everything here is a pure function of its inputs: no I/O, no shared
//! state, safe to call from any thread.
//!
//! ## Modules
//!
//! - [`ammonia`]: Un-ionized ammonia (NH3) from pH, temperature and TAN
//! - [`tolerance`]: Readings checked against a species' tolerated ranges
//! - [`schedule`]: Water-change due dates and dilution

pub mod ammonia;
pub mod schedule;
pub mod tolerance;

/// Error types for chemistry calculations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChemError {
    /// An input is non-finite or outside its physically plausible range.
    #[error("invalid input: {field} = {value} (expected {expected})")]
    InvalidInput {
        /// Name of the offending input.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable accepted range.
        expected: &'static str,
    },
}

/// Convenience result type for chemistry operations.
pub type Result<T> = std::result::Result<T, ChemError>;
