//! BoardBuilder -- fluent builder for constructing [`Board`] instances.
//!
//! Separates configuration from construction so that callers can set up the
//! port, baud rate, settle delay and reply polling before the transport is
//! opened. Building always resets the transport and then waits out the
//! settle delay: opening the port reboots most boards, and the firmware
//! ignores anything sent while its bootloader is still running.
//!
//! # Example
//!
//! ```no_run
//! use ardctl_board::builder::BoardBuilder;
//! use ardctl_board::models::ModelRegistry;
//! use ardctl_core::transport::Connector;
//! use std::time::Duration;
//!
//! # async fn example(connector: &dyn Connector) -> ardctl_core::Result<()> {
//! let registry = ModelRegistry::with_builtin_models();
//! let mut board = BoardBuilder::for_model(&registry, "Uno")?
//!     .port("/dev/ttyACM0")
//!     .baud_rate(115_200)
//!     .settle_delay(Duration::from_millis(1500))
//!     .connect(connector)
//!     .await?;
//! let volts = board.analog_read(0).await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use ardctl_core::error::{Error, Result, TransportStage};
use ardctl_core::transport::{Connector, Transport};

use crate::board::Board;
use crate::models::{ModelRegistry, PinCapability};
use crate::protocol::OversizePolicy;
use crate::wait::PollPolicy;

/// Baud rate the stock firmware listens at.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Time the bootloader needs after a reset before the sketch is listening.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Fluent builder for [`Board`].
///
/// Everything but the port has a default, so the simplest usage is:
///
/// ```ignore
/// let board = BoardBuilder::new(uno())
///     .port("/dev/ttyACM0")
///     .connect(&connector)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct BoardBuilder {
    model: PinCapability,
    port: Option<String>,
    baud_rate: u32,
    settle_delay: Duration,
    poll: PollPolicy,
    oversize: OversizePolicy,
}

impl BoardBuilder {
    /// Create a new builder for the given board model.
    pub fn new(model: PinCapability) -> Self {
        BoardBuilder {
            model,
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            settle_delay: DEFAULT_SETTLE_DELAY,
            poll: PollPolicy::default(),
            oversize: OversizePolicy::default(),
        }
    }

    /// Create a builder for a model looked up by name.
    pub fn for_model(registry: &ModelRegistry, name: &str) -> Result<Self> {
        Ok(Self::new(registry.lookup(name)?.clone()))
    }

    /// Set the serial port address (e.g. `/dev/ttyACM0` or `COM3`).
    pub fn port(mut self, port: &str) -> Self {
        self.port = Some(port.to_string());
        self
    }

    /// Override the baud rate (default: 9600).
    pub fn baud_rate(mut self, baud: u32) -> Self {
        self.baud_rate = baud;
        self
    }

    /// Set how long to wait after resetting the transport (default: 2s).
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Add a fixed margin to every reply poll, for slow firmware.
    pub fn poll_margin(mut self, margin: Duration) -> Self {
        self.poll.extra_margin = margin;
        self
    }

    /// Bound the wait for a single reply (default: 2s).
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.poll.response_timeout = timeout;
        self
    }

    /// Choose what happens to command payloads longer than one frame.
    pub fn oversize_policy(mut self, policy: OversizePolicy) -> Self {
        self.oversize = policy;
        self
    }

    /// Open the port through `connector` and build a [`Board`] on it.
    ///
    /// Requires that [`port()`](Self::port) has been called.
    pub async fn connect(self, connector: &dyn Connector) -> Result<Board> {
        let port = self
            .port
            .clone()
            .ok_or_else(|| Error::InvalidArgument("port is required for connect()".into()))?;
        self.check_baud_rate()?;

        debug!(port = %port, baud_rate = self.baud_rate, model = %self.model.name, "opening port");
        let transport = connector
            .open(&port, self.baud_rate)
            .await
            .map_err(|e| e.at(TransportStage::Open))?;
        self.build_with_transport(transport).await
    }

    /// Build a [`Board`] with a caller-provided transport.
    ///
    /// This is the entry point for testing (pass a `MockTransport` from
    /// `ardctl-test-harness`) and for callers that open the port
    /// themselves. The transport is reset and the settle delay observed
    /// before the board is returned.
    pub async fn build_with_transport(self, mut transport: Box<dyn Transport>) -> Result<Board> {
        self.check_baud_rate()?;

        debug!("resetting transport");
        transport
            .reset()
            .await
            .map_err(|e| e.at(TransportStage::Reset))?;

        debug!(
            settle_ms = self.settle_delay.as_millis() as u64,
            "waiting for board to settle"
        );
        sleep(self.settle_delay).await;

        info!(
            model = %self.model.name,
            baud_rate = self.baud_rate,
            "board connected"
        );
        Ok(Board::new(
            transport,
            self.model,
            self.baud_rate,
            self.poll,
            self.oversize,
        ))
    }

    fn check_baud_rate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(Error::InvalidArgument("baud rate must be non-zero".into()));
        }
        Ok(())
    }
}
