//! Fixed-frame text protocol encoder/decoder.
//!
//! Every message in either direction is exactly [`FRAME_SIZE`] bytes of
//! ASCII, left-justified and padded on the right with spaces. The firmware
//! reads one frame, acts on it, and answers with one frame.
//!
//! # Command format
//!
//! ```text
//! <op> <pin> [<value>]      e.g. "digital_write 5 1", "analog_read 2"
//! <command> <parameters>    custom commands
//! ```
//!
//! # Reply format
//!
//! ```text
//! <pin> <value>
//! ```
//!
//! Two base-10 integers separated by a single space. A pin of `-1` means
//! the reply is not about any particular pin (custom commands).

use bytes::{BufMut, Bytes, BytesMut};

use ardctl_core::error::{Error, Result};

/// Size in bytes of every command and reply frame.
pub const FRAME_SIZE: usize = 32;

/// Pad byte filling the unused tail of a frame.
pub const PAD: u8 = b' ';

/// Wire value of the reply pin field when no pin applies.
pub const NO_PIN: i32 = -1;

/// What to do with a command payload longer than [`FRAME_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversizePolicy {
    /// Fail with [`Error::CommandTooLong`] before sending anything.
    #[default]
    Reject,
    /// Send only the first [`FRAME_SIZE`] bytes.
    Truncate,
}

/// One encoded frame, always exactly [`FRAME_SIZE`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Bytes);

impl Frame {
    /// The raw frame bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The frame contents with trailing padding removed, for logging.
    pub fn trimmed(&self) -> &str {
        trim_padding(&self.0)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A decoded reply: the pin and value the board echoed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    /// Echoed pin, or `None` when the board sent `-1`.
    pub pin: Option<u8>,
    /// Echoed or measured value.
    pub value: i32,
}

/// Length of `bytes` once trailing padding is dropped.
fn unpadded_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .rposition(|&b| b != PAD)
        .map_or(0, |pos| pos + 1)
}

fn trim_padding(bytes: &[u8]) -> &str {
    // Frames built by `encode` are ASCII; fall back to an empty view otherwise.
    std::str::from_utf8(&bytes[..unpadded_len(bytes)]).unwrap_or("")
}

fn pad_frame(body: &[u8]) -> Frame {
    let mut buf = BytesMut::with_capacity(FRAME_SIZE);
    buf.put_slice(body);
    buf.put_bytes(PAD, FRAME_SIZE - body.len());
    Frame(buf.freeze())
}

/// Encode a command payload into a frame.
///
/// # Example
///
/// ```
/// use ardctl_board::protocol::{encode, OversizePolicy, FRAME_SIZE};
///
/// let frame = encode("digital_write 5 1", OversizePolicy::Reject).unwrap();
/// assert_eq!(frame.as_bytes().len(), FRAME_SIZE);
/// assert_eq!(frame.trimmed(), "digital_write 5 1");
/// ```
pub fn encode(payload: &str, policy: OversizePolicy) -> Result<Frame> {
    let bytes = payload.as_bytes();
    if bytes.len() <= FRAME_SIZE {
        return Ok(pad_frame(bytes));
    }
    match policy {
        OversizePolicy::Reject => Err(Error::CommandTooLong {
            len: bytes.len(),
            max: FRAME_SIZE,
        }),
        OversizePolicy::Truncate => Ok(pad_frame(&bytes[..FRAME_SIZE])),
    }
}

/// Encode a reply the way the firmware does.
///
/// Used by device simulators and tests.
pub fn encode_reply(reply: &Reply) -> Frame {
    let pin = reply.pin.map_or(NO_PIN, i32::from);
    let text = format!("{pin} {}", reply.value);
    // Two i32 values and a space never exceed the frame size.
    pad_frame(text.as_bytes())
}

/// Decode a reply frame.
///
/// # Example
///
/// ```
/// use ardctl_board::protocol::{decode, encode, OversizePolicy};
///
/// let frame = encode("9 128", OversizePolicy::Reject).unwrap();
/// let reply = decode(frame.as_bytes()).unwrap();
/// assert_eq!(reply.pin, Some(9));
/// assert_eq!(reply.value, 128);
/// ```
pub fn decode(frame: &[u8]) -> Result<Reply> {
    if frame.len() != FRAME_SIZE {
        return Err(Error::MalformedReply(format!(
            "expected {FRAME_SIZE} bytes, got {}",
            frame.len()
        )));
    }

    let body = std::str::from_utf8(&frame[..unpadded_len(frame)])
        .map_err(|_| Error::MalformedReply("reply is not valid UTF-8".into()))?;

    let tokens: Vec<&str> = body.split(' ').collect();
    let [pin_text, value_text] = tokens.as_slice() else {
        return Err(Error::MalformedReply(format!("'{body}'")));
    };

    let parse = |token: &str| {
        token
            .parse::<i32>()
            .map_err(|_| Error::MalformedReply(format!("'{body}': '{token}' is not an integer")))
    };
    let raw_pin = parse(*pin_text)?;
    let value = parse(*value_text)?;

    let pin = if raw_pin == NO_PIN {
        None
    } else {
        Some(u8::try_from(raw_pin).map_err(|_| {
            Error::MalformedReply(format!("'{body}': pin {raw_pin} out of range"))
        })?)
    };

    Ok(Reply { pin, value })
}
