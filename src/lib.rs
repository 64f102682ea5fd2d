//! Platform agnostic driver for the XDB401 I2C pressure/temperature
//! transducer, built on the [`embedded-hal`](https://docs.rs/embedded-hal) 1.0 traits.
//!
//! The driver does not schedule itself. The host calls [`XDB401::update`]
//! (or [`XDB401::poll`]) every [`DeviceConfig::poll_interval`] and owns any
//! retry policy.
//!
//! ## Features
//!
//! - `defmt`: log through `defmt` and derive `defmt::Format` on public types.
//! - `log`: log through the `log` facade.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
//! # let i2c = I2cMock::new(&[
//! #     I2cTransaction::write(0x7F, vec![0x30, 0x0A]),
//! #     I2cTransaction::write_read(0x7F, vec![0x30], vec![0x00]),
//! #     I2cTransaction::write_read(0x7F, vec![0x06], vec![0x40, 0x00, 0x00, 0x19, 0x00]),
//! # ]);
//! use embedded_hal_mock::eh1::delay::NoopDelay;
//! use xdb401::{DeviceConfig, Outputs, XDB401};
//!
//! let mut sensor = XDB401::new(i2c, NoopDelay::new());
//! sensor.configure(DeviceConfig::default()).unwrap();
//!
//! let mut print = |bar: f32| println!("{bar} bar");
//! let mut outputs = Outputs::new().with_pressure(&mut print);
//! let sample = sensor.update(&mut outputs).unwrap();
//! assert_eq!(sample.pressure.value(), Some(50.0));
//! # let (mut i2c, _) = sensor.release();
//! # i2c.done();
//! ```

#![no_std]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("Features \"defmt\" and \"log\" are mutually exclusive and cannot be enabled together");

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod fmt;

mod calibration;
mod command;
mod config;
mod error;
mod sample;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use calibration::{CONVERSION_DELAY_MS, CONVERSION_TIMEOUT_MS};
use command::{Command, Register, RESULT_LEN, STATUS_BUSY};

pub use calibration::{Calibration, FULL_SCALE_COUNTS};
pub use config::{DeviceConfig, DEFAULT_ADDRESS, DEFAULT_FULLSCALE_MPA, DEFAULT_POLL_INTERVAL};
pub use error::{ConfigError, DeviceError};
pub use sample::{Channel, EngineeringSample, FaultState, Outputs, RawSample, Sink};

pub struct XDB401<I2C, D> {
    i2c: I2C,
    delay: D,
    config: Option<DeviceConfig>, // None until `configure` succeeds
}

impl<I2C, D> XDB401<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new, unconfigured instance. Nothing is sent on the bus.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self {
            i2c,
            delay,
            config: None,
        }
    }

    /// Validate and store the configuration. On failure the driver is left
    /// unconfigured, also if it was configured before.
    pub fn configure(&mut self, config: DeviceConfig) -> Result<(), DeviceError<I2C::Error>> {
        self.config = None;
        if let Err(e) = config.validate() {
            warn!("xdb401: rejected configuration: {:?}", e);
            return Err(e.into());
        }
        info!("xdb401: configured {:?}", config);
        self.config = Some(config);
        Ok(())
    }

    pub fn config(&self) -> Option<&DeviceConfig> {
        self.config.as_ref()
    }

    /// Check that the transducer answers on its address by reading the
    /// status byte once.
    pub fn probe(&mut self) -> Result<(), DeviceError<I2C::Error>> {
        let address = self.address()?;
        match self.read_status(address) {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("xdb401: no response at address {}", address);
                Err(e)
            }
        }
    }

    /// Run one measurement cycle: trigger, wait for the conversion, read
    /// the result block and convert it.
    ///
    /// Blocks for at least the conversion delay. Channels outside the
    /// transducer's output window come back as [`Channel::OutOfRange`],
    /// see [`EngineeringSample::fault`].
    pub fn poll(&mut self) -> Result<EngineeringSample, DeviceError<I2C::Error>> {
        let config = self.config.ok_or(DeviceError::Unconfigured)?;
        let raw = self.read_raw(config.address)?;
        Ok(EngineeringSample::convert(&raw, &config))
    }

    /// One host tick: poll, publish valid values to the attached sinks and
    /// log the outcome. Returns the poll result for diagnostics.
    pub fn update(
        &mut self,
        outputs: &mut Outputs<'_>,
    ) -> Result<EngineeringSample, DeviceError<I2C::Error>> {
        let sample = match self.poll() {
            Ok(sample) => sample,
            Err(e) => {
                match e.fault() {
                    Some(fault) => warn!("xdb401: poll failed: {}", fault),
                    None => warn!("xdb401: poll skipped, driver is not configured"),
                }
                return Err(e);
            }
        };

        debug!(
            "xdb401: temperature={:?} degC pressure={:?} bar",
            sample.temperature.value(),
            sample.pressure.value()
        );
        if sample.fault() != FaultState::Ok {
            warn!(
                "xdb401: {:?} (temperature: {:?}, pressure: {:?})",
                sample.fault(),
                sample.temperature,
                sample.pressure
            );
        }

        sample.publish(outputs);
        Ok(sample)
    }

    /// Release the bus and delay handles, consuming the driver.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn address(&self) -> Result<u8, DeviceError<I2C::Error>> {
        self.config
            .as_ref()
            .map(|c| c.address)
            .ok_or(DeviceError::Unconfigured)
    }

    fn read_status(&mut self, address: u8) -> Result<u8, DeviceError<I2C::Error>> {
        let mut status = [0u8];
        self.i2c
            .write_read(address, &[Register::Command.address()], &mut status)
            .map_err(DeviceError::I2c)?;
        Ok(status[0])
    }

    fn trigger(&mut self, address: u8) -> Result<(), DeviceError<I2C::Error>> {
        self.i2c
            .write(address, &Command::Measure.frame())
            .map_err(DeviceError::I2c)
    }

    // Waits in steps of the conversion delay until the busy bit clears.
    fn wait_for_conversion(&mut self, address: u8) -> Result<(), DeviceError<I2C::Error>> {
        let mut waited_ms = 0;
        loop {
            self.delay.delay_ms(CONVERSION_DELAY_MS);
            waited_ms += CONVERSION_DELAY_MS;
            if self.read_status(address)? & STATUS_BUSY == 0 {
                return Ok(());
            }
            if waited_ms >= CONVERSION_TIMEOUT_MS {
                return Err(DeviceError::Timeout);
            }
        }
    }

    fn read_raw(&mut self, address: u8) -> Result<RawSample, DeviceError<I2C::Error>> {
        self.trigger(address)?;
        self.wait_for_conversion(address)?;

        let mut buf = [0u8; RESULT_LEN];
        self.i2c
            .write_read(address, &[Register::PressureMsb.address()], &mut buf)
            .map_err(DeviceError::I2c)?;
        Ok(RawSample::from_bytes(&buf))
    }
}
