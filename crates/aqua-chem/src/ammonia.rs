//! Un-ionized ammonia equilibrium.
//!
//! Total ammonia nitrogen (TAN) splits between ionized NH4+ and the toxic
//! un-ionized NH3 according to pH and temperature. The dissociation
//! constant follows Emerson et al. (1975):
//!
//! ```text
//! pKa      = 0.09018 + 2729.92 / (273.2 + T)
//! fraction = 1 / (1 + 10^(pKa - pH))
//! NH3      = TAN * fraction
//! ```
//!
//! NH3 is reported in the same unit as TAN (mg/L as N).

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::{ChemError, Result};

/// Accepted pH values.
pub const PH_RANGE: RangeInclusive<f64> = 0.0..=14.0;

/// Accepted water temperatures, °C.
pub const TEMP_RANGE_C: RangeInclusive<f64> = -2.0..=50.0;

/// NH3 level above which a reading is reported as toxic, mg/L.
pub const DEFAULT_NH3_WARNING_MG_L: f64 = 0.05;

/// Offset converting °C to the kelvin scale used by the Emerson fit.
const KELVIN_OFFSET: f64 = 273.2;

/// Inputs to the ammonia calculation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmmoniaInput {
    pub ph: f64,
    pub temp_c: f64,
    pub tan_mg_l: f64,
}

/// Result of the ammonia calculation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmmoniaReading {
    /// pKa of NH4+ at the given temperature.
    pub pka: f64,
    /// Un-ionized share of TAN, in [0, 1].
    pub fraction: f64,
    /// Un-ionized ammonia, mg/L.
    pub nh3_mg_l: f64,
}

/// Toxicity classification of an NH3 concentration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToxicityLevel {
    Safe,
    Toxic,
}

/// pKa of the ammonium ion at `temp_c` degrees Celsius.
pub fn pka(temp_c: f64) -> f64 {
    0.09018 + 2729.92 / (KELVIN_OFFSET + temp_c)
}

/// Un-ionized fraction of TAN at the given pH and temperature.
///
/// # Errors
///
/// [`ChemError::InvalidInput`] if pH is outside [`PH_RANGE`], the
/// temperature is outside [`TEMP_RANGE_C`], or either is not finite.
pub fn unionized_fraction(ph: f64, temp_c: f64) -> Result<f64> {
    let ph = check_range("ph", ph, &PH_RANGE, "finite value in [0, 14]")?;
    let temp_c = check_range("temp_c", temp_c, &TEMP_RANGE_C, "finite value in [-2, 50] °C")?;

    let fraction = 1.0 / (1.0 + 10f64.powf(pka(temp_c) - ph));
    Ok(fraction.clamp(0.0, 1.0))
}

/// Compute the un-ionized fraction and NH3 concentration for a water test.
///
/// # Errors
///
/// [`ChemError::InvalidInput`] for out-of-range pH or temperature, or a
/// negative / non-finite TAN.
///
/// # Examples
///
/// ```
/// use aqua_chem::ammonia::{calculate, AmmoniaInput};
///
/// let reading = calculate(&AmmoniaInput { ph: 7.0, temp_c: 25.0, tan_mg_l: 1.0 }).unwrap();
/// assert!(reading.fraction < 0.01);
/// ```
pub fn calculate(input: &AmmoniaInput) -> Result<AmmoniaReading> {
    if !input.tan_mg_l.is_finite() || input.tan_mg_l < 0.0 {
        return Err(ChemError::InvalidInput {
            field: "tan_mg_l",
            value: input.tan_mg_l,
            expected: "finite value >= 0 mg/L",
        });
    }

    let fraction = unionized_fraction(input.ph, input.temp_c)?;
    Ok(AmmoniaReading {
        pka: pka(input.temp_c),
        fraction,
        nh3_mg_l: input.tan_mg_l * fraction,
    })
}

/// Classify an NH3 concentration against `threshold_mg_l`.
///
/// Readings strictly above the threshold are toxic.
pub fn classify(nh3_mg_l: f64, threshold_mg_l: f64) -> ToxicityLevel {
    if nh3_mg_l > threshold_mg_l {
        ToxicityLevel::Toxic
    } else {
        ToxicityLevel::Safe
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
    expected: &'static str,
) -> Result<f64> {
    if value.is_finite() && range.contains(&value) {
        Ok(value)
    } else {
        Err(ChemError::InvalidInput {
            field,
            value,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(ph: f64, temp_c: f64, tan_mg_l: f64) -> AmmoniaInput {
        AmmoniaInput {
            ph,
            temp_c,
            tan_mg_l,
        }
    }

    #[test]
    fn test_neutral_reference_point() {
        let reading = calculate(&input(7.0, 25.0, 1.0)).expect("calculate");
        assert!(reading.fraction < 0.01);
        assert!((reading.fraction - 0.00566).abs() < 1e-4, "got {}", reading.fraction);
        assert!((reading.pka - 9.2448).abs() < 1e-3);
        assert_eq!(reading.nh3_mg_l, reading.fraction);
    }

    #[test]
    fn test_alkaline_warm_water() {
        // pH 8.0 at 28 °C leaves roughly 6.6 % un-ionized
        let fraction = unionized_fraction(8.0, 28.0).expect("fraction");
        assert!((fraction - 0.0656).abs() < 1e-3, "got {fraction}");
    }

    #[test]
    fn test_monotonic_in_ph() {
        let mut prev = 0.0;
        for step in 0..=28 {
            let ph = f64::from(step) * 0.5;
            let fraction = unionized_fraction(ph, 25.0).expect("fraction");
            assert!(fraction > prev, "fraction must rise with pH at {ph}");
            prev = fraction;
        }
    }

    #[test]
    fn test_monotonic_in_temperature() {
        let mut prev = 0.0;
        for t in -2..=50 {
            let fraction = unionized_fraction(7.5, f64::from(t)).expect("fraction");
            assert!(fraction > prev, "fraction must rise with temperature at {t}");
            prev = fraction;
        }
    }

    #[test]
    fn test_fraction_bounds_at_extremes() {
        let low = unionized_fraction(0.0, -2.0).expect("low");
        let high = unionized_fraction(14.0, 50.0).expect("high");
        assert!((0.0..=1.0).contains(&low));
        assert!((0.0..=1.0).contains(&high));
        assert!(high > 0.99);
    }

    #[test]
    fn test_concentration_scales_with_tan() {
        let one = calculate(&input(7.8, 26.0, 1.0)).expect("one");
        let four = calculate(&input(7.8, 26.0, 4.0)).expect("four");
        assert!((four.nh3_mg_l - 4.0 * one.nh3_mg_l).abs() < 1e-12);
        assert_eq!(one.fraction, four.fraction);
    }

    #[test]
    fn test_zero_tan() {
        let reading = calculate(&input(7.0, 25.0, 0.0)).expect("zero tan");
        assert_eq!(reading.nh3_mg_l, 0.0);
    }

    #[test]
    fn test_rejects_out_of_range_ph() {
        let err = calculate(&input(14.1, 25.0, 1.0)).unwrap_err();
        assert!(matches!(err, ChemError::InvalidInput { field: "ph", .. }));
        assert!(calculate(&input(-0.1, 25.0, 1.0)).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_temperature() {
        let err = calculate(&input(7.0, 50.5, 1.0)).unwrap_err();
        assert!(matches!(err, ChemError::InvalidInput { field: "temp_c", .. }));
        assert!(calculate(&input(7.0, -2.5, 1.0)).is_err());
    }

    #[test]
    fn test_rejects_bad_tan() {
        let err = calculate(&input(7.0, 25.0, -0.1)).unwrap_err();
        assert!(matches!(err, ChemError::InvalidInput { field: "tan_mg_l", .. }));
        assert!(calculate(&input(7.0, 25.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        assert!(unionized_fraction(f64::NAN, 25.0).is_err());
        assert!(unionized_fraction(7.0, f64::NAN).is_err());
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(0.02, DEFAULT_NH3_WARNING_MG_L), ToxicityLevel::Safe);
        assert_eq!(classify(0.05, DEFAULT_NH3_WARNING_MG_L), ToxicityLevel::Safe);
        assert_eq!(classify(0.051, DEFAULT_NH3_WARNING_MG_L), ToxicityLevel::Toxic);
    }
}
