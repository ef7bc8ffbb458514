//! Heat index ("feels like") from temperature and relative humidity.
//!
//! Uses the Rothfusz regression published by the US National Weather Service:
//! <https://www.wpc.ncep.noaa.gov/html/heatindex_equation.shtml>
//!
//! The regression is only meaningful in hot weather. Below
//! [`HEAT_INDEX_THRESHOLD_F`] the ambient temperature is returned unchanged.

use crate::error::WeatherError;

/// Temperatures (°F) below this are passed through as-is.
pub const HEAT_INDEX_THRESHOLD_F: f64 = 80.0;

const C1: f64 = -42.379;
const C2: f64 = 2.049_015_23;
const C3: f64 = 10.143_331_27;
const C4: f64 = -0.224_755_41;
const C5: f64 = -0.006_837_83;
const C6: f64 = -0.054_817_17;
const C7: f64 = 0.001_228_74;
const C8: f64 = 0.000_852_82;
const C9: f64 = -0.000_001_99;

/// Compute the heat index in °F, rounded to one decimal place.
///
/// # Errors
///
/// [`WeatherError::InvalidInput`] when `humidity_pct` is outside `0..=100` or
/// the temperature is not a finite number.
pub fn compute_heat_index(temperature_f: f64, humidity_pct: i32) -> Result<f64, WeatherError> {
    if !(0..=100).contains(&humidity_pct) {
        return Err(WeatherError::invalid_input(format!(
            "humidity must be between 0 and 100, got {humidity_pct}"
        )));
    }
    if !temperature_f.is_finite() {
        return Err(WeatherError::invalid_input("temperature must be a finite number"));
    }

    if temperature_f < HEAT_INDEX_THRESHOLD_F {
        return Ok(round_to_tenth(temperature_f));
    }

    Ok(round_to_tenth(rothfusz(temperature_f, f64::from(humidity_pct))))
}

fn rothfusz(t: f64, rh: f64) -> f64 {
    let t2 = t * t;
    let rh2 = rh * rh;

    C1 + C2 * t + C3 * rh + C4 * t * rh + C5 * t2 + C6 * rh2 + C7 * t2 * rh + C8 * t * rh2
        + C9 * t2 * rh2
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
