//! Species tolerance checks.
//!
//! Compares a water test against the ranges a species is known to
//! tolerate. A parameter is only checked when both the reading and the
//! range are present.

use aqua_types::{Measurement, Species, ToleranceRange, WaterParam};
use serde::{Deserialize, Serialize};

/// Which side of the tolerated range a reading fell on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    TooLow,
    TooHigh,
}

/// A single out-of-range parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    pub species: String,
    pub param: WaterParam,
    pub value: f64,
    pub direction: Direction,
    /// The bound that was crossed.
    pub limit: f64,
}

/// Check a measurement against one species.
pub fn check(measurement: &Measurement, species: &Species) -> Vec<Deviation> {
    let ranges = [
        (WaterParam::Ph, species.ph),
        (WaterParam::TempC, species.temp_c),
        (WaterParam::Kh, species.kh),
        (WaterParam::Gh, species.gh),
        (WaterParam::No3, upper_bound(species.no3_max)),
        (WaterParam::Nh3, upper_bound(species.nh3_max_mg_l)),
    ];

    ranges
        .into_iter()
        .filter(|(_, range)| !range.is_unbounded())
        .filter_map(|(param, range)| {
            let value = measurement.value(param)?;
            deviation(value, &range).map(|(direction, limit)| Deviation {
                species: species.name.clone(),
                param,
                value,
                direction,
                limit,
            })
        })
        .collect()
}

/// Check a measurement against every species present in a tank.
pub fn check_all<'a, I>(measurement: &Measurement, species: I) -> Vec<Deviation>
where
    I: IntoIterator<Item = &'a Species>,
{
    let deviations: Vec<Deviation> = species
        .into_iter()
        .flat_map(|s| check(measurement, s))
        .collect();

    if !deviations.is_empty() {
        tracing::debug!(
            measurement_id = measurement.id,
            count = deviations.len(),
            "water outside species tolerance"
        );
    }
    deviations
}

fn upper_bound(max: Option<f64>) -> ToleranceRange {
    max.map_or_else(ToleranceRange::default, ToleranceRange::at_most)
}

fn deviation(value: f64, range: &ToleranceRange) -> Option<(Direction, f64)> {
    range
        .undershoots(value)
        .map(|min| (Direction::TooLow, min))
        .or_else(|| range.overshoots(value).map(|max| (Direction::TooHigh, max)))
}

#[cfg(test)]
mod tests {
    use aqua_types::{InhabitantKind, WaterReadings};

    use super::*;

    fn neon() -> Species {
        Species {
            id: 1,
            name: "Paracheirodon innesi".into(),
            kind: InhabitantKind::Fish,
            ph: ToleranceRange::new(Some(5.0), Some(7.0)),
            temp_c: ToleranceRange::new(Some(20.0), Some(26.0)),
            kh: ToleranceRange::default(),
            gh: ToleranceRange::new(None, Some(10.0)),
            no3_max: Some(20.0),
            nh3_max_mg_l: Some(0.02),
        }
    }

    fn measurement(readings: WaterReadings, nh3_mg_l: Option<f64>) -> Measurement {
        Measurement {
            id: 7,
            aquarium_id: 1,
            measured_at: 1_700_000_000,
            readings,
            nh3_fraction: None,
            nh3_mg_l,
            notes: None,
        }
    }

    #[test]
    fn test_within_range() {
        let m = measurement(
            WaterReadings {
                ph: Some(6.5),
                temp_c: Some(24.0),
                gh: Some(6.0),
                no3: Some(10.0),
                ..Default::default()
            },
            Some(0.001),
        );
        assert!(check(&m, &neon()).is_empty());
    }

    #[test]
    fn test_reports_each_deviation() {
        let m = measurement(
            WaterReadings {
                ph: Some(7.8),
                temp_c: Some(18.5),
                no3: Some(40.0),
                ..Default::default()
            },
            Some(0.05),
        );
        let deviations = check(&m, &neon());
        assert_eq!(deviations.len(), 4);

        let ph = deviations.iter().find(|d| d.param == WaterParam::Ph).expect("ph");
        assert_eq!(ph.direction, Direction::TooHigh);
        assert_eq!(ph.limit, 7.0);

        let temp = deviations.iter().find(|d| d.param == WaterParam::TempC).expect("temp");
        assert_eq!(temp.direction, Direction::TooLow);
        assert_eq!(temp.limit, 20.0);

        assert!(deviations.iter().any(|d| d.param == WaterParam::No3));
        assert!(deviations.iter().any(|d| d.param == WaterParam::Nh3));
    }

    #[test]
    fn test_missing_readings_skipped() {
        let m = measurement(WaterReadings::default(), None);
        assert!(check(&m, &neon()).is_empty());
    }

    #[test]
    fn test_check_all_merges_species() {
        let mut hardy = neon();
        hardy.name = "Ancistrus".into();
        hardy.ph = ToleranceRange::new(Some(6.0), Some(8.0));
        let m = measurement(
            WaterReadings {
                ph: Some(7.5),
                ..Default::default()
            },
            None,
        );
        let deviations = check_all(&m, &[neon(), hardy]);
        assert_eq!(deviations.len(), 1);
        assert_eq!(deviations[0].species, "Paracheirodon innesi");
    }
}
