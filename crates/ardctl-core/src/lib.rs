//! ardctl-core: Core traits, types, and error definitions for ardctl.
//!
//! This crate defines the board-agnostic abstractions that the protocol
//! engine and its test doubles share. Applications that only need to plug
//! in their own serial port depend on these types alone.
//!
//! # Key types
//!
//! - [`Transport`] -- byte-level communication channel
//! - [`Connector`] -- opens a [`Transport`] by port address
//! - [`DigitalLevel`] / [`PinMode`] -- pin values carried on the wire
//! - [`Error`] / [`Result`] -- error handling

pub mod error;
pub mod transport;
pub mod types;

pub use error::{Error, Result, TransportStage};
pub use transport::{Connector, Transport};
pub use types::{DigitalLevel, PinMode};
