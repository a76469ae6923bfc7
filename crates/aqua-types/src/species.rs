//! Species reference catalog with tolerated water ranges.

use serde::{Deserialize, Serialize};

use crate::{InhabitantKind, RowId};

/// Inclusive tolerated range. Either bound may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToleranceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ToleranceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Upper bound only.
    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Lower bound `value` falls short of, if any.
    pub fn undershoots(&self, value: f64) -> Option<f64> {
        self.min.filter(|min| value < *min)
    }

    /// Upper bound `value` exceeds, if any.
    pub fn overshoots(&self, value: f64) -> Option<f64> {
        self.max.filter(|max| value > *max)
    }
}

/// A catalog entry describing what water a species tolerates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// Assigned by the database; ignored on upsert.
    #[serde(default)]
    pub id: RowId,
    pub name: String,
    pub kind: InhabitantKind,
    #[serde(default)]
    pub ph: ToleranceRange,
    #[serde(default)]
    pub temp_c: ToleranceRange,
    #[serde(default)]
    pub kh: ToleranceRange,
    #[serde(default)]
    pub gh: ToleranceRange,
    #[serde(default)]
    pub no3_max: Option<f64>,
    #[serde(default)]
    pub nh3_max_mg_l: Option<f64>,
}
