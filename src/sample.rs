use core::fmt;

use crate::calibration::{decode_pressure, decode_temperature, round_to, Calibration};
use crate::command::RESULT_LEN;
use crate::config::DeviceConfig;

const TEMPERATURE_DECIMALS: u32 = 2;
const PRESSURE_DECIMALS: u32 = 3;

/// Outcome of one poll cycle. Nothing carries over to the next cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultState {
    Ok,
    BusError,
    Timeout,
    /// At least one channel read outside the transducer's output window
    OutOfRange,
}

impl fmt::Display for FaultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FaultState::Ok => "ok",
            FaultState::BusError => "bus error",
            FaultState::Timeout => "timeout",
            FaultState::OutOfRange => "out of range",
        };
        f.write_str(s)
    }
}

/// Counts as read from the result block, sign extended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pub pressure: i32,
    pub temperature: i32,
}

impl RawSample {
    pub fn from_bytes(buf: &[u8; RESULT_LEN]) -> RawSample {
        RawSample {
            pressure: decode_pressure([buf[0], buf[1], buf[2]]),
            temperature: decode_temperature([buf[3], buf[4]]),
        }
    }
}

/// A single output of the transducer after conversion.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Not configured, never converted
    Disabled,
    Valid(f32),
    /// Raw counts outside the valid window, value suppressed
    OutOfRange,
}

impl Channel {
    pub fn value(&self) -> Option<f32> {
        match *self {
            Channel::Valid(v) => Some(v),
            Channel::Disabled | Channel::OutOfRange => None,
        }
    }

    fn from_conversion(enabled: bool, converted: Option<f64>, decimals: u32) -> Channel {
        match (enabled, converted) {
            (false, _) => Channel::Disabled,
            (true, Some(v)) => Channel::Valid(round_to(v, decimals)),
            (true, None) => Channel::OutOfRange,
        }
    }
}

/// Temperature in °C and pressure in bar.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineeringSample {
    pub temperature: Channel,
    pub pressure: Channel,
}

impl EngineeringSample {
    /// Converts the channels enabled in `config`.
    pub fn convert(raw: &RawSample, config: &DeviceConfig) -> EngineeringSample {
        let calibration = Calibration::new(config.fullscale_mpa);
        EngineeringSample {
            temperature: Channel::from_conversion(
                config.temperature,
                calibration.temperature_celsius(raw.temperature),
                TEMPERATURE_DECIMALS,
            ),
            pressure: Channel::from_conversion(
                config.pressure,
                calibration.pressure_bar(raw.pressure),
                PRESSURE_DECIMALS,
            ),
        }
    }

    pub fn fault(&self) -> FaultState {
        if self.temperature == Channel::OutOfRange || self.pressure == Channel::OutOfRange {
            FaultState::OutOfRange
        } else {
            FaultState::Ok
        }
    }

    /// Hands every valid value to its sink, if one is attached.
    pub fn publish(&self, outputs: &mut Outputs<'_>) {
        if let (Some(sink), Some(v)) = (outputs.temperature.as_deref_mut(), self.temperature.value()) {
            sink.publish(v);
        }
        if let (Some(sink), Some(v)) = (outputs.pressure.as_deref_mut(), self.pressure.value()) {
            sink.publish(v);
        }
    }
}

/// Receives converted values, e.g. a host framework's sensor entity.
pub trait Sink {
    fn publish(&mut self, value: f32);
}

impl<F: FnMut(f32)> Sink for F {
    fn publish(&mut self, value: f32) {
        self(value)
    }
}

/// Optional sinks, one per channel.
#[derive(Default)]
pub struct Outputs<'a> {
    pub temperature: Option<&'a mut dyn Sink>,
    pub pressure: Option<&'a mut dyn Sink>,
}

impl<'a> Outputs<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, sink: &'a mut dyn Sink) -> Self {
        self.temperature = Some(sink);
        self
    }

    pub fn with_pressure(mut self, sink: &'a mut dyn Sink) -> Self {
        self.pressure = Some(sink);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pressure: i32, temperature: i32) -> RawSample {
        RawSample { pressure, temperature }
    }

    #[test]
    fn result_block_layout() {
        let sample = RawSample::from_bytes(&[0x40, 0x00, 0x00, 0x19, 0x80]);
        assert_eq!(sample, raw(1 << 22, 0x1980));
    }

    #[test]
    fn converts_to_declared_precision() {
        // 21.5 °C, 1234567 counts at 10 MPa = 14.71714... bar
        let sample = EngineeringSample::convert(&raw(1_234_567, 5504), &DeviceConfig::default());
        assert_eq!(sample.temperature, Channel::Valid(21.5));
        assert_eq!(sample.pressure, Channel::Valid(14.717));
        assert_eq!(sample.fault(), FaultState::Ok);
    }

    #[test]
    fn disabled_channels_stay_absent() {
        let config = DeviceConfig::default().with_channels(false, false);
        for (p, t) in [(0, 0), (1 << 23, 25 * 256), (-5, 0x7FFF)] {
            let sample = EngineeringSample::convert(&raw(p, t), &config);
            assert_eq!(sample.temperature.value(), None);
            assert_eq!(sample.pressure.value(), None);
            assert_eq!(sample.fault(), FaultState::Ok);
        }
    }

    #[test]
    fn out_of_range_is_per_channel() {
        let sample = EngineeringSample::convert(&raw(1 << 22, 0x7FFF), &DeviceConfig::default());
        assert_eq!(sample.temperature, Channel::OutOfRange);
        assert_eq!(sample.pressure, Channel::Valid(50.0));
        assert_eq!(sample.fault(), FaultState::OutOfRange);
    }

    #[test]
    fn large_fullscale_converts_without_clamping() {
        let config = DeviceConfig::default().with_fullscale_mpa(1.0e16);
        let half = EngineeringSample::convert(&raw(1 << 22, 0), &config);
        let full = EngineeringSample::convert(&raw(1 << 23, 0), &config);
        let (half, full) = (half.pressure.value().unwrap(), full.pressure.value().unwrap());
        assert!(full > half, "half={half} full={full}");
    }

    #[test]
    fn fault_display() {
        assert_eq!(std::format!("{}", FaultState::BusError), "bus error");
        assert_eq!(std::format!("{}", FaultState::OutOfRange), "out of range");
    }

    #[test]
    fn publish_only_valid_values() {
        let sample = EngineeringSample {
            temperature: Channel::OutOfRange,
            pressure: Channel::Valid(1.5),
        };
        let mut temperatures = std::vec::Vec::new();
        let mut pressures = std::vec::Vec::new();
        let mut temperature_sink = |v: f32| temperatures.push(v);
        let mut pressure_sink = |v: f32| pressures.push(v);
        let mut outputs = Outputs::new()
            .with_temperature(&mut temperature_sink)
            .with_pressure(&mut pressure_sink);
        sample.publish(&mut outputs);
        drop(outputs);
        assert!(temperatures.is_empty());
        assert_eq!(pressures, [1.5]);
    }

    #[test]
    fn publish_without_sinks() {
        let sample = EngineeringSample {
            temperature: Channel::Valid(20.0),
            pressure: Channel::Valid(1.0),
        };
        sample.publish(&mut Outputs::new());
    }
}
