use core::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ADDRESS: u8 = 0x7F;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_FULLSCALE_MPA: f32 = 10.0;

/// Settings for one transducer. Fixed once handed to the driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceConfig {
    /// 7 bit I2C address
    pub address: u8,
    /// How often the host should call `update`. The driver does not time
    /// itself.
    pub poll_interval: Duration,
    /// Pressure at full-scale output, in MPa
    pub fullscale_mpa: f32,
    /// Convert and publish temperature
    pub temperature: bool,
    /// Convert and publish pressure
    pub pressure: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            fullscale_mpa: DEFAULT_FULLSCALE_MPA,
            temperature: true,
            pressure: true,
        }
    }
}

impl DeviceConfig {
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub const fn with_fullscale_mpa(mut self, fullscale_mpa: f32) -> Self {
        self.fullscale_mpa = fullscale_mpa;
        self
    }

    /// Select which channels get converted.
    pub const fn with_channels(mut self, temperature: bool, pressure: bool) -> Self {
        self.temperature = temperature;
        self.pressure = pressure;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address > 0x7F {
            return Err(ConfigError::InvalidAddress(self.address));
        }
        let fullscale_ok = self.fullscale_mpa.is_finite() && self.fullscale_mpa > 0.0;
        if !fullscale_ok {
            return Err(ConfigError::InvalidFullScale);
        }
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "address: {=u8:#x}, poll interval: {=u64} ms, fullscale: {=f32} MPa, temperature: {=bool}, pressure: {=bool}",
            self.address,
            self.poll_interval.as_millis() as u64,
            self.fullscale_mpa,
            self.temperature,
            self.pressure,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.address, 0x7F);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.fullscale_mpa, 10.0);
        assert!(config.temperature && config.pressure);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_fullscale() {
        for fullscale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = DeviceConfig::default().with_fullscale_mpa(fullscale);
            assert_eq!(config.validate(), Err(ConfigError::InvalidFullScale));
        }
    }

    #[test]
    fn rejects_wide_address() {
        let config = DeviceConfig::default().with_address(0x80);
        assert_eq!(config.validate(), Err(ConfigError::InvalidAddress(0x80)));
        let config = DeviceConfig::default().with_address(0x00);
        assert_eq!(config.validate(), Ok(()));
    }
}
