use crate::sample::FaultState;

/// Rejected configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Address does not fit in 7 bits
    InvalidAddress(u8),
    /// Full-scale range is zero, negative or not a number
    InvalidFullScale,
}

/// A catch all error for this driver
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError<E> {
    Config(ConfigError),
    /// `configure` has not succeeded yet
    Unconfigured,
    /// The bus did not acknowledge, or a transfer came back short
    I2c(E),
    /// The transducer did not finish its conversion in time
    Timeout,
}

impl<E> DeviceError<E> {
    /// Per cycle fault this error represents. Configuration problems are
    /// not cycle faults and give `None`.
    pub fn fault(&self) -> Option<FaultState> {
        match self {
            DeviceError::I2c(_) => Some(FaultState::BusError),
            DeviceError::Timeout => Some(FaultState::Timeout),
            DeviceError::Config(_) | DeviceError::Unconfigured => None,
        }
    }
}

impl<E> From<ConfigError> for DeviceError<E> {
    fn from(e: ConfigError) -> Self {
        DeviceError::Config(e)
    }
}
