//! Water-change scheduling.

use aqua_types::{WaterChange, WaterChangeSettings, SECS_PER_DAY};
use serde::{Deserialize, Serialize};

use crate::{ChemError, Result};

/// Where an aquarium stands in its water-change routine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterChangeStatus {
    pub last_change_at: Option<u64>,
    pub next_due_at: u64,
    pub overdue: bool,
    /// Whole days past the due date; zero when not overdue.
    pub days_overdue: u64,
}

/// Timestamp at which the next change falls due.
pub fn next_due(last_change_at: u64, period_days: u32) -> u64 {
    last_change_at.saturating_add(u64::from(period_days) * SECS_PER_DAY)
}

/// Evaluate the routine at `now`.
///
/// With no change on record the first change is due immediately.
pub fn status(
    settings: &WaterChangeSettings,
    last_change: Option<&WaterChange>,
    now: u64,
) -> WaterChangeStatus {
    let last_change_at = last_change.map(|c| c.changed_at);
    let next_due_at = last_change_at.map_or(now, |at| next_due(at, settings.period_days));
    let overdue = now >= next_due_at;
    let days_overdue = if overdue {
        now.saturating_sub(next_due_at) / SECS_PER_DAY
    } else {
        0
    };

    WaterChangeStatus {
        last_change_at,
        next_due_at,
        overdue,
        days_overdue,
    }
}

/// Concentration left after replacing `volume_pct` percent of the water
/// with water free of the substance.
///
/// # Errors
///
/// [`ChemError::InvalidInput`] if `volume_pct` is outside [0, 100] or
/// `value` is negative or not finite.
pub fn dilute(value: f64, volume_pct: f64) -> Result<f64> {
    if !volume_pct.is_finite() || !(0.0..=100.0).contains(&volume_pct) {
        return Err(ChemError::InvalidInput {
            field: "volume_pct",
            value: volume_pct,
            expected: "finite value in [0, 100] %",
        });
    }
    if !value.is_finite() || value < 0.0 {
        return Err(ChemError::InvalidInput {
            field: "value",
            value,
            expected: "finite value >= 0",
        });
    }
    Ok(value * (1.0 - volume_pct / 100.0))
}
