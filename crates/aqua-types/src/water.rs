//! Water-quality measurements and water-change records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{RowId, TypesError};

/// Raw readings from a water test. Every field is optional: hobby test kits
/// rarely cover all parameters in one session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterReadings {
    #[serde(default)]
    pub ph: Option<f64>,
    /// Carbonate hardness, dKH.
    #[serde(default)]
    pub kh: Option<f64>,
    /// General hardness, dGH.
    #[serde(default)]
    pub gh: Option<f64>,
    #[serde(default)]
    pub no2: Option<f64>,
    #[serde(default)]
    pub no3: Option<f64>,
    /// Total ammonia nitrogen (NH3 + NH4+), mg/L.
    #[serde(default)]
    pub tan_mg_l: Option<f64>,
    #[serde(default)]
    pub po4: Option<f64>,
    #[serde(default)]
    pub temp_c: Option<f64>,
}

impl WaterReadings {
    /// Value of a directly measured parameter. Derived parameters yield `None`.
    pub fn get(&self, param: WaterParam) -> Option<f64> {
        match param {
            WaterParam::Ph => self.ph,
            WaterParam::Kh => self.kh,
            WaterParam::Gh => self.gh,
            WaterParam::No2 => self.no2,
            WaterParam::No3 => self.no3,
            WaterParam::Tan => self.tan_mg_l,
            WaterParam::Po4 => self.po4,
            WaterParam::TempC => self.temp_c,
            WaterParam::Nh3 => None,
        }
    }

    /// True when no parameter was filled in.
    pub fn is_empty(&self) -> bool {
        WaterParam::MEASURED.iter().all(|p| self.get(*p).is_none())
    }
}

/// A stored water test with its derived ammonia figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: RowId,
    pub aquarium_id: RowId,
    pub measured_at: u64,
    #[serde(flatten)]
    pub readings: WaterReadings,
    /// Un-ionized share of TAN, in [0, 1].
    pub nh3_fraction: Option<f64>,
    /// Un-ionized ammonia, mg/L.
    pub nh3_mg_l: Option<f64>,
    pub notes: Option<String>,
}

impl Measurement {
    /// Value of any parameter, including the derived NH3 concentration.
    pub fn value(&self, param: WaterParam) -> Option<f64> {
        match param {
            WaterParam::Nh3 => self.nh3_mg_l,
            other => self.readings.get(other),
        }
    }
}

/// A charted / checked water parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterParam {
    Ph,
    Kh,
    Gh,
    No2,
    No3,
    Tan,
    Po4,
    TempC,
    /// Un-ionized ammonia (derived).
    Nh3,
}

impl WaterParam {
    /// Parameters read directly from a test kit.
    pub const MEASURED: [WaterParam; 8] = [
        WaterParam::Ph,
        WaterParam::Kh,
        WaterParam::Gh,
        WaterParam::No2,
        WaterParam::No3,
        WaterParam::Tan,
        WaterParam::Po4,
        WaterParam::TempC,
    ];

    /// Column name in the `measurements` table.
    pub fn column(self) -> &'static str {
        match self {
            WaterParam::Ph => "ph",
            WaterParam::Kh => "kh",
            WaterParam::Gh => "gh",
            WaterParam::No2 => "no2",
            WaterParam::No3 => "no3",
            WaterParam::Tan => "tan_mg_l",
            WaterParam::Po4 => "po4",
            WaterParam::TempC => "temp_c",
            WaterParam::Nh3 => "nh3_mg_l",
        }
    }
}

impl fmt::Display for WaterParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for WaterParam {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ph" => Ok(WaterParam::Ph),
            "kh" => Ok(WaterParam::Kh),
            "gh" => Ok(WaterParam::Gh),
            "no2" => Ok(WaterParam::No2),
            "no3" => Ok(WaterParam::No3),
            "tan" | "tan_mg_l" | "nh3_total" | "total_ammonia" => Ok(WaterParam::Tan),
            "po4" => Ok(WaterParam::Po4),
            "temp" | "temp_c" => Ok(WaterParam::TempC),
            "nh3" | "nh3_mg_l" | "unionized_nh3" => Ok(WaterParam::Nh3),
            other => Err(TypesError::UnknownParam(other.to_string())),
        }
    }
}

/// Per-aquarium water-change routine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterChangeSettings {
    pub aquarium_id: RowId,
    /// Share of the tank volume replaced each time, (0, 100].
    pub change_volume_pct: f64,
    pub period_days: u32,
    pub updated_at: u64,
}

/// A water change that was actually carried out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterChange {
    pub id: RowId,
    pub aquarium_id: RowId,
    pub changed_at: u64,
    pub volume_pct: f64,
}
