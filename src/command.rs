/// Register map of the transducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Command register. Reading it returns the status byte.
    Command,
    /// First byte of the 5 byte result block (pressure MSB).
    PressureMsb,
    /// Temperature MSB, directly following the 3 pressure bytes.
    TemperatureMsb,
}

impl Register {
    pub const fn address(self) -> u8 {
        match self {
            Register::Command => 0x30,
            Register::PressureMsb => 0x06,
            Register::TemperatureMsb => 0x09,
        }
    }
}

pub enum Command {
    /// Start a combined temperature and pressure conversion.
    Measure,
}

impl Command {
    pub fn value(&self) -> u8 {
        match self {
            Command::Measure => 0x0A,
        }
    }

    /// The bytes to put on the bus: command register followed by the command.
    pub fn frame(&self) -> [u8; 2] {
        [Register::Command.address(), self.value()]
    }
}

/// Set in the status byte while a conversion is in progress.
pub const STATUS_BUSY: u8 = 0x08;

/// Length of the result block: 3 bytes pressure, 2 bytes temperature.
pub const RESULT_LEN: usize =
    (Register::TemperatureMsb.address() - Register::PressureMsb.address()) as usize + 2;
