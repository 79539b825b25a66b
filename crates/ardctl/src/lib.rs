//! # ardctl -- Host-side control of Arduino boards
//!
//! `ardctl` is an asynchronous Rust library for driving an Arduino-class
//! board running the fixed-frame serial sketch. The host writes one 32-byte,
//! space-padded text command per operation and reads back one 32-byte
//! `<pin> <value>` reply, which is checked against what was sent.
//!
//! ## Quick Start
//!
//! Plug in a [`Connector`] for your serial port crate, then:
//!
//! ```no_run
//! use ardctl::{DigitalLevel, ModelRegistry, PinMode};
//! use std::time::Duration;
//!
//! # async fn example(connector: &dyn ardctl::Connector) -> ardctl::Result<()> {
//! let registry = ModelRegistry::with_builtin_models();
//! let mut board = ardctl::connect(
//!     &registry,
//!     "Uno",
//!     connector,
//!     "/dev/ttyACM0",
//!     9600,
//!     Duration::from_secs(2),
//! )
//! .await?;
//!
//! board.set_pin_mode(13, PinMode::Output).await?;
//! board.digital_write(13, DigitalLevel::High).await?;
//! let volts = board.analog_read(0).await?;
//! println!("A0: {volts:.2} V");
//!
//! board.disconnect().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! | Crate                 | Purpose                                         |
//! |-----------------------|-------------------------------------------------|
//! | `ardctl-core`         | [`Transport`]/[`Connector`] traits, pin types, errors |
//! | `ardctl-board`        | Frame codec, reply polling, [`Board`] driver    |
//! | `ardctl-test-harness` | Mock transport and connector for tests          |
//! | **`ardctl`**          | This facade crate -- re-exports everything      |
//!
//! ## Errors
//!
//! Every operation returns [`Result`]. Pin numbers are validated against
//! the board model before anything is written, so an out-of-range pin fails
//! with [`Error::InvalidArgument`] and leaves the link untouched. Nothing is
//! retried: a failed exchange leaves the [`Board`] usable for the next call.

pub use ardctl_core::*;

pub use ardctl_board::{board, builder, commands, models, protocol, wait};
pub use ardctl_board::{Board, BoardBuilder, ModelRegistry, OversizePolicy, PinCapability, Reply};

use std::time::Duration;

/// Connect to a board in one call.
///
/// Looks up `model_name` in `registry`, opens `port` through `connector`
/// at `baud_rate`, resets the link and waits `settle_delay` before
/// returning. For the remaining knobs (poll margin, response timeout,
/// oversize policy) use [`BoardBuilder`] directly.
pub async fn connect(
    registry: &ModelRegistry,
    model_name: &str,
    connector: &dyn Connector,
    port: &str,
    baud_rate: u32,
    settle_delay: Duration,
) -> Result<Board> {
    BoardBuilder::for_model(registry, model_name)?
        .port(port)
        .baud_rate(baud_rate)
        .settle_delay(settle_delay)
        .connect(connector)
        .await
}

/// Names of all built-in board models, sorted.
///
/// # Example
///
/// ```
/// let names = ardctl::supported_models();
/// assert!(names.contains(&"Uno".to_string()));
/// ```
pub fn supported_models() -> Vec<String> {
    let registry = ModelRegistry::with_builtin_models();
    registry.names().into_iter().map(str::to_string).collect()
}
