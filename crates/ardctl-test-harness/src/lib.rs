//! ardctl-test-harness: Test utilities and scripted transports for ardctl.
//!
//! This crate provides [`MockTransport`] for deterministic unit testing of
//! the protocol engine without a board attached, and [`MockConnector`] for
//! testing connection setup.

pub mod mock_connector;
pub mod mock_serial;

pub use mock_connector::MockConnector;
pub use mock_serial::{MockTransport, pad};
