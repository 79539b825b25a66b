//! Mock transport for deterministic testing of the protocol engine.
//!
//! [`MockTransport`] implements the [`Transport`] trait with pre-loaded
//! request/response pairs. Frame encoding, the poll loop, reply parsing and
//! echo checks can all be exercised without a board attached.
//!
//! The mock is a cheap handle over shared state: clone it before boxing it
//! into a board and keep the clone to inspect what was sent afterwards.
//!
//! # Example
//!
//! ```
//! use ardctl_test_harness::MockTransport;
//!
//! let mock = MockTransport::new();
//! let probe = mock.clone();
//! // When the engine sends this frame, make this reply available.
//! mock.expect(b"digital_read 4", b"4 1");
//! assert_eq!(probe.remaining_expectations(), 1);
//! ```

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use ardctl_core::error::{Error, Result};
use ardctl_core::transport::Transport;

/// A pre-loaded request/response pair.
#[derive(Debug, Clone)]
struct Expectation {
    /// The exact bytes we expect to be sent.
    request: Vec<u8>,
    /// The bytes made available once the request has been sent.
    response: Vec<u8>,
    /// How many response bytes arrive at each `bytes_available()` poll.
    arrival: VecDeque<usize>,
}

/// Reply bytes that have been "sent" by the device but not yet arrived.
#[derive(Debug, Default)]
struct InFlight {
    bytes: VecDeque<u8>,
    arrival: VecDeque<usize>,
}

#[derive(Debug)]
struct MockState {
    expectations: VecDeque<Expectation>,
    in_flight: InFlight,
    /// Bytes that have arrived and are waiting to be read.
    inbox: VecDeque<u8>,
    connected: bool,
    sent_log: Vec<Vec<u8>>,
    resets: usize,
    polls: usize,
    fail_reset: bool,
    fail_send: bool,
    fail_receive: bool,
    fail_poll: bool,
    fail_close: bool,
}

impl Default for MockState {
    fn default() -> Self {
        MockState {
            expectations: VecDeque::new(),
            in_flight: InFlight::default(),
            inbox: VecDeque::new(),
            connected: true,
            sent_log: Vec::new(),
            resets: 0,
            polls: 0,
            fail_reset: false,
            fail_send: false,
            fail_receive: false,
            fail_poll: false,
            fail_close: false,
        }
    }
}

/// A mock [`Transport`] for testing without hardware.
///
/// Expectations are consumed in order. When `send()` is called, the sent
/// data is recorded and matched against the next expectation, pad bytes
/// included. The matching response then trickles in according to its
/// arrival schedule: each `bytes_available()` call moves the next chunk into
/// the input buffer, where `receive()` can read it.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

fn injected(what: &str) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::BrokenPipe,
        format!("injected {what} failure"),
    ))
}

impl MockTransport {
    /// Create a new mock transport in the connected state.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Expect `request` and deliver all of `response` at the first poll.
    ///
    /// `request` is compared against the full frame, so pass it already
    /// padded, or use [`expect_frame`](Self::expect_frame) with a payload
    /// and a frame size.
    pub fn expect(&self, request: &[u8], response: &[u8]) {
        self.expect_chunked(request, response, &[response.len()]);
    }

    /// Expect `request` and deliver `response` in chunks.
    ///
    /// `chunks[i]` bytes arrive at the `i`-th poll after the send; polls past
    /// the end of the schedule see no new data.
    pub fn expect_chunked(&self, request: &[u8], response: &[u8], chunks: &[usize]) {
        self.lock().expectations.push_back(Expectation {
            request: request.to_vec(),
            response: response.to_vec(),
            arrival: chunks.iter().copied().collect(),
        });
    }

    /// Expect `request` and never answer it.
    pub fn expect_silence(&self, request: &[u8]) {
        self.expect_chunked(request, &[], &[]);
    }

    /// Expect a space-padded request frame and answer with a space-padded
    /// reply frame, both `frame_size` bytes long.
    pub fn expect_frame(&self, request: &str, reply: &str, frame_size: usize) {
        self.expect(&pad(request, frame_size), &pad(reply, frame_size));
    }

    /// All data that has been sent through this transport, one element per
    /// `send()` call.
    pub fn sent_data(&self) -> Vec<Vec<u8>> {
        self.lock().sent_log.clone()
    }

    /// Number of `send()` calls made so far.
    pub fn send_count(&self) -> usize {
        self.lock().sent_log.len()
    }

    /// Number of expectations that have not yet been consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.lock().expectations.len()
    }

    /// Number of `reset()` calls made so far.
    pub fn reset_count(&self) -> usize {
        self.lock().resets
    }

    /// Number of `bytes_available()` calls made so far.
    pub fn poll_count(&self) -> usize {
        self.lock().polls
    }

    /// Bytes that have arrived but not been read yet.
    pub fn pending_input(&self) -> usize {
        self.lock().inbox.len()
    }

    /// Deliver unsolicited bytes straight into the input buffer, as line
    /// noise or a late reply would.
    pub fn push_input(&self, bytes: &[u8]) {
        self.lock().inbox.extend(bytes.iter().copied());
    }

    /// Set the connected state of the mock transport.
    ///
    /// When set to `false`, subsequent calls return [`Error::NotConnected`].
    pub fn set_connected(&self, connected: bool) {
        self.lock().connected = connected;
    }

    /// Make the next and all later `reset()` calls fail.
    pub fn fail_reset(&self) {
        self.lock().fail_reset = true;
    }

    /// Make `send()` fail.
    pub fn fail_send(&self) {
        self.lock().fail_send = true;
    }

    /// Make `receive()` fail.
    pub fn fail_receive(&self) {
        self.lock().fail_receive = true;
    }

    /// Make `bytes_available()` fail.
    pub fn fail_bytes_available(&self) {
        self.lock().fail_poll = true;
    }

    /// Make `close()` fail.
    pub fn fail_close(&self) {
        self.lock().fail_close = true;
    }
}

/// Right-pad `text` with spaces to `size` bytes.
///
/// Text longer than `size` is returned unpadded and unchanged.
pub fn pad(text: &str, size: usize) -> Vec<u8> {
    let mut out = text.as_bytes().to_vec();
    if out.len() < size {
        out.resize(size, b' ');
    }
    out
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::NotConnected);
        }
        if state.fail_send {
            return Err(injected("send"));
        }

        state.sent_log.push(data.to_vec());
        tracing::trace!(bytes = data.len(), "mock transport send");

        let expectation = state.expectations.pop_front().ok_or_else(|| {
            Error::TransportWrite("no more expectations in mock transport".into())
        })?;
        if data != expectation.request.as_slice() {
            return Err(Error::TransportWrite(format!(
                "unexpected send data: expected {:?}, got {:?}",
                String::from_utf8_lossy(&expectation.request),
                String::from_utf8_lossy(data)
            )));
        }

        state.in_flight = InFlight {
            bytes: expectation.response.into_iter().collect(),
            arrival: expectation.arrival,
        };
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::NotConnected);
        }
        if state.fail_receive {
            return Err(injected("receive"));
        }

        let n = state.inbox.len().min(buf.len());
        for (slot, byte) in buf.iter_mut().zip(state.inbox.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    async fn bytes_available(&mut self) -> Result<usize> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::NotConnected);
        }
        if state.fail_poll {
            return Err(injected("bytes_available"));
        }

        state.polls += 1;
        if let Some(chunk) = state.in_flight.arrival.pop_front() {
            let n = chunk.min(state.in_flight.bytes.len());
            let arrived: Vec<u8> = state.in_flight.bytes.drain(..n).collect();
            state.inbox.extend(arrived);
        }
        Ok(state.inbox.len())
    }

    async fn reset(&mut self) -> Result<()> {
        let mut state = self.lock();
        if !state.connected {
            return Err(Error::NotConnected);
        }
        if state.fail_reset {
            return Err(injected("reset"));
        }
        state.resets += 1;
        state.inbox.clear();
        state.in_flight = InFlight::default();
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let mut state = self.lock();
        if state.fail_close {
            return Err(injected("close"));
        }
        state.connected = false;
        state.inbox.clear();
        state.in_flight = InFlight::default();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.lock().connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_transport_basic_send_receive() {
        let mut mock = MockTransport::new();
        mock.expect(b"analog_read 1", b"1 512");

        mock.send(b"analog_read 1").await.unwrap();
        assert_eq!(mock.bytes_available().await.unwrap(), 5);

        let mut buf = [0u8; 16];
        let n = mock.receive(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"1 512");
        assert_eq!(mock.bytes_available().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mock_transport_nothing_arrives_before_poll() {
        let mut mock = MockTransport::new();
        mock.expect(b"x", b"1 1");
        mock.send(b"x").await.unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(mock.receive(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mock_transport_chunked_arrival() {
        let mut mock = MockTransport::new();
        mock.expect_chunked(b"x", b"abcdef", &[2, 3, 10]);
        mock.send(b"x").await.unwrap();

        assert_eq!(mock.bytes_available().await.unwrap(), 2);
        assert_eq!(mock.bytes_available().await.unwrap(), 5);
        assert_eq!(mock.bytes_available().await.unwrap(), 6);
        // Schedule exhausted: count stays put.
        assert_eq!(mock.bytes_available().await.unwrap(), 6);
        assert_eq!(mock.poll_count(), 4);
    }

    #[tokio::test]
    async fn mock_transport_silence() {
        let mut mock = MockTransport::new();
        mock.expect_silence(b"x");
        mock.send(b"x").await.unwrap();
        assert_eq!(mock.bytes_available().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mock_transport_expect_frame_pads_both_sides() {
        let mut mock = MockTransport::new();
        mock.expect_frame("digital_read 2", "2 0", 32);

        let request = pad("digital_read 2", 32);
        assert_eq!(request.len(), 32);
        mock.send(&request).await.unwrap();
        assert_eq!(mock.bytes_available().await.unwrap(), 32);
    }

    #[tokio::test]
    async fn mock_transport_tracks_sent_data_through_clone() {
        let mock = MockTransport::new();
        let probe = mock.clone();
        mock.expect(b"a", b"");
        mock.expect(b"b", b"");

        let mut boxed: Box<dyn Transport> = Box::new(mock);
        boxed.send(b"a").await.unwrap();
        boxed.send(b"b").await.unwrap();

        assert_eq!(probe.send_count(), 2);
        assert_eq!(probe.sent_data()[1], b"b");
        assert_eq!(probe.remaining_expectations(), 0);
    }

    #[tokio::test]
    async fn mock_transport_wrong_data_errors() {
        let mut mock = MockTransport::new();
        mock.expect(b"a", b"");

        let result = mock.send(b"z").await;
        assert!(matches!(result, Err(Error::TransportWrite(_))));
    }

    #[tokio::test]
    async fn mock_transport_no_expectations_errors() {
        let mut mock = MockTransport::new();
        let result = mock.send(b"a").await;
        assert!(matches!(result, Err(Error::TransportWrite(_))));
    }

    #[tokio::test]
    async fn mock_transport_injected_failures() {
        let mut mock = MockTransport::new();
        mock.fail_reset();
        mock.fail_bytes_available();
        mock.fail_close();

        assert!(matches!(mock.reset().await, Err(Error::Io(_))));
        assert!(matches!(mock.bytes_available().await, Err(Error::Io(_))));
        assert!(matches!(mock.close().await, Err(Error::Io(_))));
        assert!(mock.is_connected());
    }

    #[tokio::test]
    async fn mock_transport_reset_clears_input() {
        let mut mock = MockTransport::new();
        mock.expect(b"a", b"1 1");
        mock.send(b"a").await.unwrap();
        mock.bytes_available().await.unwrap();

        mock.reset().await.unwrap();
        assert_eq!(mock.reset_count(), 1);
        assert_eq!(mock.bytes_available().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mock_transport_disconnect() {
        let mut mock = MockTransport::new();
        assert!(mock.is_connected());

        mock.close().await.unwrap();
        assert!(!mock.is_connected());

        let result = mock.send(b"a").await;
        assert!(matches!(result, Err(Error::NotConnected)));
        let mut buf = [0u8; 4];
        assert!(matches!(
            mock.receive(&mut buf).await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn mock_transport_pushed_input_is_readable() {
        let mut mock = MockTransport::new();
        mock.push_input(b"noise");
        assert_eq!(mock.pending_input(), 5);
        assert_eq!(mock.bytes_available().await.unwrap(), 5);

        let mut buf = [0u8; 8];
        let n = mock.receive(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"noise");
        assert_eq!(mock.pending_input(), 0);
    }

    #[test]
    fn pad_extends_with_spaces() {
        assert_eq!(pad("ab", 4), b"ab  ");
        assert_eq!(pad("abcdef", 4), b"abcdef");
    }
}
