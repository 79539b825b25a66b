//! Board -- the protocol engine for one connected board.
//!
//! This module ties the frame codec ([`protocol`]), the command builders
//! ([`commands`]) and the reply poller ([`wait`]) to a [`Transport`]. Every
//! operation runs one complete exchange:
//!
//! 1. validate the pin and value against the board's [`PinCapability`],
//! 2. discard any stale input, then encode and send one command frame,
//! 3. poll until one reply frame is buffered, then read it,
//! 4. decode the reply and check the echoed pin and value.
//!
//! When polling ends with a short read, whatever part of the reply did
//! arrive is discarded so the next exchange starts from an empty buffer.
//! A failure at any step is returned as-is; nothing is retried. Validation
//! failures happen before the first byte is written. A failed echo check
//! does not mean the board ignored the command: a write may already have
//! taken effect.

use tracing::{debug, trace, warn};

use ardctl_core::error::{Error, Result, TransportStage};
use ardctl_core::transport::Transport;
use ardctl_core::types::{DigitalLevel, PinMode};

use crate::commands::{self, Command};
use crate::models::PinCapability;
use crate::protocol::{self, FRAME_SIZE, OversizePolicy, Reply};
use crate::wait::{self, PollPolicy};

/// A connected board.
///
/// Constructed via [`BoardBuilder`](crate::builder::BoardBuilder). Owns
/// its transport exclusively; all operations take `&mut self`, so one
/// exchange always completes before the next starts.
pub struct Board {
    transport: Box<dyn Transport>,
    model: PinCapability,
    baud_rate: u32,
    poll: PollPolicy,
    oversize: OversizePolicy,
}

impl Board {
    /// Create a `Board` over an already reset and settled transport.
    ///
    /// Called by [`BoardBuilder`](crate::builder::BoardBuilder); callers
    /// should use the builder API instead.
    pub(crate) fn new(
        transport: Box<dyn Transport>,
        model: PinCapability,
        baud_rate: u32,
        poll: PollPolicy,
        oversize: OversizePolicy,
    ) -> Self {
        Board {
            transport,
            model,
            baud_rate,
            poll,
            oversize,
        }
    }

    /// The board's pin description.
    pub fn model(&self) -> &PinCapability {
        &self.model
    }

    /// Baud rate the link was opened at.
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Whether the underlying transport reports itself open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Drive a digital pin high or low.
    pub async fn digital_write(&mut self, pin: u8, level: DigitalLevel) -> Result<()> {
        self.model.check_digital(pin)?;
        self.exchange(&commands::cmd_digital_write(pin, level)).await?;
        Ok(())
    }

    /// Write a PWM duty cycle (0-255) to a PWM-capable pin.
    ///
    /// Returns the duty cycle the board acknowledged.
    pub async fn analog_write(&mut self, pin: u8, duty: u8) -> Result<u8> {
        self.model.check_pwm(pin)?;
        let reply = self.exchange(&commands::cmd_analog_write(pin, duty)).await?;
        // The echo check guarantees the reply value equals `duty`.
        Ok(u8::try_from(reply.value).unwrap_or(duty))
    }

    /// Read the level of a digital pin.
    ///
    /// Analog pin `n` can be read digitally as pin `digital_pins + n`.
    pub async fn digital_read(&mut self, pin: u8) -> Result<DigitalLevel> {
        self.model.check_digital_read(pin)?;
        let reply = self.exchange(&commands::cmd_digital_read(pin)).await?;
        DigitalLevel::try_from(reply.value).map_err(|_| {
            Error::MalformedReply(format!(
                "digital_read {pin} returned level {}",
                reply.value
            ))
        })
    }

    /// Read an analog pin, scaled to volts with the model's reference.
    pub async fn analog_read(&mut self, pin: u8) -> Result<f32> {
        let raw = self.analog_read_raw(pin).await?;
        Ok(self.model.scale_analog(raw))
    }

    /// Read an analog pin as the raw ADC count.
    pub async fn analog_read_raw(&mut self, pin: u8) -> Result<i32> {
        self.model.check_analog(pin)?;
        let reply = self.exchange(&commands::cmd_analog_read(pin)).await?;
        Ok(reply.value)
    }

    /// Configure a pin as input, output, or input with pull-up.
    ///
    /// Returns the mode code the board acknowledged.
    pub async fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<i32> {
        self.model.check_digital(pin)?;
        let reply = self.exchange(&commands::cmd_set_pin_mode(pin, mode)).await?;
        Ok(reply.value)
    }

    /// Send a firmware-specific command, e.g. `("set_speed", "15")`.
    ///
    /// The reply is decoded but not checked against the request.
    pub async fn custom_command(&mut self, command: &str, parameters: &str) -> Result<Reply> {
        self.exchange(&commands::cmd_custom(command, parameters)).await
    }

    /// Close the transport.
    ///
    /// Consumes the board, so no operation can follow a disconnect.
    pub async fn disconnect(mut self) -> Result<()> {
        debug!(model = %self.model.name, "disconnecting");
        self.transport
            .close()
            .await
            .map_err(|e| e.at(TransportStage::Close))
    }

    /// Run one command/reply exchange and check the echo.
    async fn exchange(&mut self, cmd: &Command) -> Result<Reply> {
        let frame = protocol::encode(&cmd.payload, self.oversize)?;

        // A closed port has nothing to discard; let `send` report it.
        if self.transport.is_connected() {
            let stale = self.discard_input().await?;
            if stale > 0 {
                warn!(bytes = stale, "discarded stale input before sending");
            }
        }

        debug!(command = %frame.trimmed(), "sending command");
        self.transport
            .send(frame.as_bytes())
            .await
            .map_err(|e| e.at(TransportStage::Write))?;

        if let Err(e) =
            wait::wait_for_frame(self.transport.as_mut(), self.baud_rate, &self.poll).await
        {
            if matches!(e, Error::ShortRead(_)) {
                match self.discard_input().await {
                    Ok(n) => warn!(bytes = n, "discarded partial reply"),
                    Err(drain) => warn!(error = %drain, "could not discard partial reply"),
                }
            }
            return Err(e);
        }

        let raw = self.read_frame().await?;
        let reply = protocol::decode(&raw)?;
        trace!(pin = ?reply.pin, value = reply.value, "reply decoded");

        check_echo(cmd, &reply)?;
        Ok(reply)
    }

    /// Read and drop everything buffered on the transport.
    ///
    /// Returns the number of bytes discarded.
    async fn discard_input(&mut self) -> Result<usize> {
        let mut buf = [0u8; FRAME_SIZE];
        let mut discarded = 0;
        loop {
            let n = self
                .transport
                .receive(&mut buf)
                .await
                .map_err(|e| e.at(TransportStage::Read))?;
            if n == 0 {
                return Ok(discarded);
            }
            discarded += n;
        }
    }

    /// Read exactly one frame from the transport.
    async fn read_frame(&mut self) -> Result<[u8; FRAME_SIZE]> {
        let mut buf = [0u8; FRAME_SIZE];
        let mut filled = 0;
        while filled < FRAME_SIZE {
            let n = self
                .transport
                .receive(&mut buf[filled..])
                .await
                .map_err(|e| e.at(TransportStage::Read))?;
            if n == 0 {
                warn!(filled, "reply ended before a full frame");
                return Err(Error::ShortRead(filled));
            }
            filled += n;
        }
        Ok(buf)
    }
}

/// Compare a reply's echo against the command that produced it.
///
/// A missing pin on either side matches anything; so does a missing
/// expected value.
fn check_echo(cmd: &Command, reply: &Reply) -> Result<()> {
    if let (Some(expected), Some(got)) = (cmd.pin, reply.pin) {
        if expected != got {
            warn!(expected, got, "board echoed the wrong pin");
            return Err(Error::PinMismatch { expected, got });
        }
    }
    if let Some(expected) = cmd.expected {
        if reply.value != expected {
            warn!(expected, got = reply.value, "board echoed the wrong value");
            return Err(Error::ValueMismatch {
                expected,
                got: reply.value,
            });
        }
    }
    Ok(())
}
