//! Protocol engine for Arduino boards running the fixed-frame serial sketch.
//!
//! The host and the firmware exchange one 32-byte, space-padded text frame
//! in each direction per command. This crate provides:
//!
//! - **Model definitions** ([`models`]) -- pin counts, PWM pins and analog
//!   scaling for the supported boards, and the [`ModelRegistry`] that looks
//!   them up by name.
//! - **Frame codec** ([`protocol`]) -- pad commands into frames and parse
//!   `<pin> <value>` replies.
//! - **Command builders** ([`commands`]) -- the payload text for each
//!   operation plus the echo the reply must carry.
//! - **Reply polling** ([`wait`]) -- baud-dependent polling for one full
//!   reply frame, with stall detection and a timeout.
//! - **Board driver** ([`board`]) -- validated, echo-checked pin operations
//!   over any [`Transport`](ardctl_core::Transport).
//! - **Builder** ([`builder`]) -- open, reset and settle a connection and
//!   hand back a [`Board`].
//!
//! # Example
//!
//! ```
//! use ardctl_board::commands::cmd_analog_write;
//! use ardctl_board::protocol::{decode, encode, OversizePolicy};
//!
//! // Build an "analog_write" command frame
//! let cmd = cmd_analog_write(9, 128);
//! let frame = encode(&cmd.payload, OversizePolicy::Reject).unwrap();
//! assert_eq!(frame.trimmed(), "analog_write 9 128");
//!
//! // Parse the board's echo
//! let reply = decode(encode("9 128", OversizePolicy::Reject).unwrap().as_bytes()).unwrap();
//! assert_eq!(reply.pin, Some(9));
//! assert_eq!(reply.value, 128);
//! ```

pub mod board;
pub mod builder;
pub mod commands;
pub mod models;
pub mod protocol;
pub mod wait;

// Re-export the primary types for ergonomic `use ardctl_board::*`.
pub use board::Board;
pub use builder::BoardBuilder;
pub use models::{ModelRegistry, PinCapability};
pub use protocol::{OversizePolicy, Reply};
