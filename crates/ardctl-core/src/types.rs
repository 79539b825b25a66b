//! Pin value types shared by the board drivers.
//!
//! The wire protocol carries levels and modes as small integers. These
//! enums keep illegal values out of the public API; `TryFrom<i32>` is the
//! single place raw integers are checked.

use std::fmt;

use crate::error::Error;

/// Logic level of a digital pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigitalLevel {
    Low,
    High,
}

impl DigitalLevel {
    /// Wire code for this level (`0` or `1`).
    pub fn code(self) -> i32 {
        match self {
            DigitalLevel::Low => 0,
            DigitalLevel::High => 1,
        }
    }
}

impl TryFrom<i32> for DigitalLevel {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DigitalLevel::Low),
            1 => Ok(DigitalLevel::High),
            other => Err(Error::InvalidArgument(format!(
                "invalid digital level {other}"
            ))),
        }
    }
}

impl From<bool> for DigitalLevel {
    fn from(high: bool) -> Self {
        if high {
            DigitalLevel::High
        } else {
            DigitalLevel::Low
        }
    }
}

impl fmt::Display for DigitalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigitalLevel::Low => f.write_str("LOW"),
            DigitalLevel::High => f.write_str("HIGH"),
        }
    }
}

/// Direction and pull configuration of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinMode {
    Input,
    Output,
    /// Input with the internal pull-up resistor enabled.
    InputPullup,
}

impl PinMode {
    /// Wire code for this mode.
    pub fn code(self) -> i32 {
        match self {
            PinMode::Input => 0,
            PinMode::Output => 1,
            PinMode::InputPullup => 2,
        }
    }
}

impl TryFrom<i32> for PinMode {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PinMode::Input),
            1 => Ok(PinMode::Output),
            2 => Ok(PinMode::InputPullup),
            other => Err(Error::InvalidArgument(format!("invalid pin mode {other}"))),
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinMode::Input => f.write_str("INPUT"),
            PinMode::Output => f.write_str("OUTPUT"),
            PinMode::InputPullup => f.write_str("INPUT_PULLUP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digital_level_codes() {
        assert_eq!(DigitalLevel::Low.code(), 0);
        assert_eq!(DigitalLevel::High.code(), 1);
    }

    #[test]
    fn digital_level_try_from() {
        assert_eq!(DigitalLevel::try_from(0).unwrap(), DigitalLevel::Low);
        assert_eq!(DigitalLevel::try_from(1).unwrap(), DigitalLevel::High);
        assert!(matches!(
            DigitalLevel::try_from(2),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            DigitalLevel::try_from(-1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn digital_level_from_bool() {
        assert_eq!(DigitalLevel::from(true), DigitalLevel::High);
        assert_eq!(DigitalLevel::from(false), DigitalLevel::Low);
    }

    #[test]
    fn pin_mode_codes() {
        assert_eq!(PinMode::Input.code(), 0);
        assert_eq!(PinMode::Output.code(), 1);
        assert_eq!(PinMode::InputPullup.code(), 2);
    }

    #[test]
    fn pin_mode_try_from() {
        assert_eq!(PinMode::try_from(2).unwrap(), PinMode::InputPullup);
        assert!(matches!(PinMode::try_from(3), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn display() {
        assert_eq!(DigitalLevel::High.to_string(), "HIGH");
        assert_eq!(PinMode::InputPullup.to_string(), "INPUT_PULLUP");
    }
}
