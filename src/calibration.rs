use num_traits::float::FloatCore; // round

/// Digital output at full-scale pressure (2^23).
pub const FULL_SCALE_COUNTS: i32 = 1 << 23;

/// Temperature resolution, counts per degree Celsius.
pub const COUNTS_PER_DEGREE: i32 = 256;

/// Operating temperature window of the transducer, in counts.
pub const TEMPERATURE_WINDOW: core::ops::RangeInclusive<i32> =
    (-40 * COUNTS_PER_DEGREE)..=(125 * COUNTS_PER_DEGREE);

/// Valid pressure output window, in counts.
pub const PRESSURE_WINDOW: core::ops::RangeInclusive<i32> = 0..=FULL_SCALE_COUNTS;

/// Time between triggering a conversion and the first status check, in MILLISECONDS.
pub const CONVERSION_DELAY_MS: u32 = 5;

/// Give up on a conversion that is still busy after this many MILLISECONDS.
pub const CONVERSION_TIMEOUT_MS: u32 = 50;

const MPA_TO_BAR: f64 = 10.0;

/// Maps raw counts onto physical units for a transducer of a given
/// full-scale range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    /// Pressure at full-scale output, in MPa
    pub fullscale_mpa: f32,
}

impl Calibration {
    pub fn new(fullscale_mpa: f32) -> Calibration {
        Calibration { fullscale_mpa }
    }

    /// Pressure in bar, or `None` if the counts are outside the output window.
    pub fn pressure_bar(&self, raw: i32) -> Option<f64> {
        if !PRESSURE_WINDOW.contains(&raw) {
            return None;
        }
        let ratio = f64::from(raw) / f64::from(FULL_SCALE_COUNTS);
        Some(ratio * f64::from(self.fullscale_mpa) * MPA_TO_BAR)
    }

    /// Temperature in °C, or `None` outside the operating window.
    pub fn temperature_celsius(&self, raw: i32) -> Option<f64> {
        if !TEMPERATURE_WINDOW.contains(&raw) {
            return None;
        }
        Some(f64::from(raw) / f64::from(COUNTS_PER_DEGREE))
    }
}

/// Sign extends the 24 bit pressure word. Exactly 2^23 is read as positive
/// full scale, anything above it is negative.
pub fn decode_pressure(bytes: [u8; 3]) -> i32 {
    let raw = i32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
    if raw > FULL_SCALE_COUNTS {
        raw - (1 << 24)
    } else {
        raw
    }
}

/// Sign extends the 16 bit temperature word, same convention as pressure.
pub fn decode_temperature(bytes: [u8; 2]) -> i32 {
    let raw = i32::from(u16::from_be_bytes(bytes));
    if raw > 1 << 15 {
        raw - (1 << 16)
    } else {
        raw
    }
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f32 {
    let scale = 10i64.pow(decimals) as f64;
    ((value * scale).round() / scale) as f32
}
