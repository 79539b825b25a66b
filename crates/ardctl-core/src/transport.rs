//! Transport traits for board communication.
//!
//! The [`Transport`] trait abstracts over the physical link to a board
//! (typically a USB virtual COM port). The protocol engine in `ardctl-board`
//! operates on a `Transport` rather than directly on a serial port, so the
//! same code drives real hardware and the scripted `MockTransport` from the
//! `ardctl-test-harness` crate.
//!
//! Opening a link is the job of a [`Connector`]. Applications provide one
//! that wraps their serial library of choice.

use async_trait::async_trait;

use crate::error::Result;

/// Asynchronous byte-level transport to a board.
///
/// Implementations own exactly one open port. Framing, echo checks and
/// polling are handled by the protocol engine that consumes this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write all of `data` to the board.
    ///
    /// Partial writes are an error; implementations must not report success
    /// unless every byte was handed to the port.
    async fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Read buffered bytes into `buf`.
    ///
    /// Returns the number of bytes copied, at most `buf.len()`. Returns `0`
    /// when nothing is buffered.
    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Number of received bytes currently waiting in the input buffer.
    ///
    /// This is the total buffered count, not the number of bytes that
    /// arrived since the previous call. Reading with [`receive`](Self::receive)
    /// lowers it; it must not reset just because it was queried.
    async fn bytes_available(&mut self) -> Result<usize>;

    /// Flush both directions of the port.
    ///
    /// On most boards with a USB-serial bridge this also reboots the
    /// microcontroller, so callers should wait for it to settle afterwards.
    async fn reset(&mut self) -> Result<()>;

    /// Close the port.
    ///
    /// After calling `close()`, subsequent calls should return
    /// [`Error::NotConnected`](crate::error::Error::NotConnected).
    async fn close(&mut self) -> Result<()>;

    /// Check whether the port is currently open.
    fn is_connected(&self) -> bool;
}

/// Opens [`Transport`]s by address.
///
/// Implementations open the port in raw read/write mode at the requested
/// baud rate (8 data bits, no parity, one stop bit).
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open the port at `address` (e.g. `/dev/ttyACM0` or `COM3`).
    async fn open(&self, address: &str, baud_rate: u32) -> Result<Box<dyn Transport>>;
}
