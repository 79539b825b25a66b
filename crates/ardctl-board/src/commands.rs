//! Command builders.
//!
//! Each builder returns a [`Command`]: the payload text to put on the wire
//! together with what the reply must echo for the exchange to count as a
//! success. All functions are pure; pin validation against a board model
//! happens in [`Board`](crate::board::Board) before a command is built.

use ardctl_core::types::{DigitalLevel, PinMode};

/// One request to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Pin the reply must echo, if the command addresses a pin.
    pub pin: Option<u8>,
    /// Value the reply must echo, for commands that set something.
    pub expected: Option<i32>,
    /// Frame payload, before padding.
    pub payload: String,
}

impl Command {
    fn set(op: &str, pin: u8, value: i32) -> Self {
        Command {
            pin: Some(pin),
            expected: Some(value),
            payload: format!("{op} {pin} {value}"),
        }
    }

    fn get(op: &str, pin: u8) -> Self {
        Command {
            pin: Some(pin),
            expected: None,
            payload: format!("{op} {pin}"),
        }
    }
}

/// `digital_write <pin> <0|1>`
pub fn cmd_digital_write(pin: u8, level: DigitalLevel) -> Command {
    Command::set("digital_write", pin, level.code())
}

/// `analog_write <pin> <0-255>`
pub fn cmd_analog_write(pin: u8, duty: u8) -> Command {
    Command::set("analog_write", pin, i32::from(duty))
}

/// `set_pin_mode <pin> <0|1|2>`
pub fn cmd_set_pin_mode(pin: u8, mode: PinMode) -> Command {
    Command::set("set_pin_mode", pin, mode.code())
}

/// `digital_read <pin>`
pub fn cmd_digital_read(pin: u8) -> Command {
    Command::get("digital_read", pin)
}

/// `analog_read <pin>`
pub fn cmd_analog_read(pin: u8) -> Command {
    Command::get("analog_read", pin)
}

/// `<command> <parameters>`, a firmware-specific command.
///
/// Custom commands are not tied to a pin and the firmware decides what to
/// echo, so the reply is not checked.
pub fn cmd_custom(command: &str, parameters: &str) -> Command {
    Command {
        pin: None,
        expected: None,
        payload: format!("{command} {parameters}"),
    }
}
