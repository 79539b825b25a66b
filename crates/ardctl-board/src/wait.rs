//! Polling for a complete reply frame.
//!
//! The firmware answers every command with exactly one frame. Rather than
//! blocking in a read, the engine sleeps for roughly the time the link
//! needs to carry a frame, then asks the port how many bytes have arrived.
//! Polling stops as soon as a full frame is buffered, when the count stops
//! growing between two polls (the board has gone quiet), or when the
//! response timeout runs out.

use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::{trace, warn};

use ardctl_core::error::{Error, Result, TransportStage};
use ardctl_core::transport::Transport;

use crate::protocol::FRAME_SIZE;

/// Per-baud term of the poll interval, in milliseconds times baud.
const POLL_SCALE_MS: f64 = 639_508.0;
/// Fixed term of the poll interval, in milliseconds.
const POLL_OFFSET_MS: f64 = 5.03;

/// Time to wait between two polls at `baud_rate`.
///
/// `ceil(639508 / baud + 5.03)` milliseconds: about one frame's worth of
/// transmission time plus the firmware's turnaround.
///
/// ```
/// use ardctl_board::wait::poll_interval;
/// use std::time::Duration;
///
/// assert_eq!(poll_interval(9600), Duration::from_millis(72));
/// assert_eq!(poll_interval(115_200), Duration::from_millis(11));
/// ```
pub fn poll_interval(baud_rate: u32) -> Duration {
    let ms = (POLL_SCALE_MS / f64::from(baud_rate.max(1)) + POLL_OFFSET_MS).ceil();
    Duration::from_millis(ms as u64)
}

/// How long to keep polling for a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Added to every poll interval, for slow firmware.
    pub extra_margin: Duration,
    /// Upper bound on the whole wait, however slowly bytes trickle in.
    pub response_timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            extra_margin: Duration::ZERO,
            response_timeout: Duration::from_secs(2),
        }
    }
}

/// Wait until exactly one reply frame is buffered on `transport`.
///
/// Returns the number of buffered bytes (always [`FRAME_SIZE`]) on success.
/// Fails with [`Error::ShortRead`] carrying the last count seen when the
/// board stalls, overshoots the frame size, or misses the timeout, and with
/// [`Error::TransportRead`] when the port cannot be queried.
pub async fn wait_for_frame(
    transport: &mut dyn Transport,
    baud_rate: u32,
    policy: &PollPolicy,
) -> Result<usize> {
    let interval = poll_interval(baud_rate) + policy.extra_margin;
    let deadline = Instant::now() + policy.response_timeout;
    let mut available = 0usize;

    loop {
        sleep(interval).await;
        let now_available = transport
            .bytes_available()
            .await
            .map_err(|e| e.at(TransportStage::Read))?;
        trace!(
            available = now_available,
            interval_ms = interval.as_millis() as u64,
            "poll"
        );

        if now_available >= FRAME_SIZE {
            available = now_available;
            break;
        }
        if now_available <= available {
            warn!(available = now_available, "reply stalled before a full frame");
            available = now_available;
            break;
        }
        available = now_available;
        if Instant::now() >= deadline {
            warn!(
                available,
                timeout_ms = policy.response_timeout.as_millis() as u64,
                "timed out waiting for reply"
            );
            break;
        }
    }

    if available == FRAME_SIZE {
        Ok(available)
    } else {
        Err(Error::ShortRead(available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ardctl_test_harness::{MockTransport, pad};

    /// A mock whose reply to `q` is `reply`, delivered per `chunks`.
    async fn primed(reply: &[u8], chunks: &[usize]) -> MockTransport {
        let mut mock = MockTransport::new();
        mock.expect_chunked(b"q", reply, chunks);
        mock.send(b"q").await.unwrap();
        mock
    }

    #[test]
    fn poll_interval_scales_with_baud() {
        assert_eq!(poll_interval(9600), Duration::from_millis(72));
        assert_eq!(poll_interval(57_600), Duration::from_millis(17));
        assert_eq!(poll_interval(115_200), Duration::from_millis(11));
        assert_eq!(poll_interval(300), Duration::from_millis(2137));
    }

    #[test]
    fn poll_interval_survives_zero_baud() {
        assert!(poll_interval(0) > Duration::from_secs(600));
    }

    #[tokio::test(start_paused = true)]
    async fn full_frame_on_first_poll() {
        let mut mock = primed(&pad("5 1", FRAME_SIZE), &[FRAME_SIZE]).await;
        let start = Instant::now();

        let n = wait_for_frame(&mut mock, 9600, &PollPolicy::default())
            .await
            .unwrap();

        assert_eq!(n, FRAME_SIZE);
        assert_eq!(mock.poll_count(), 1);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(72) && elapsed < Duration::from_millis(80));
    }

    #[tokio::test(start_paused = true)]
    async fn extra_margin_lengthens_each_poll() {
        let mut mock = primed(&pad("5 1", FRAME_SIZE), &[FRAME_SIZE]).await;
        let policy = PollPolicy {
            extra_margin: Duration::from_millis(28),
            ..PollPolicy::default()
        };
        let start = Instant::now();

        wait_for_frame(&mut mock, 9600, &policy).await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100) && elapsed < Duration::from_millis(110));
    }

    #[tokio::test(start_paused = true)]
    async fn frame_arriving_in_chunks() {
        let mut mock = primed(&pad("12 1023", FRAME_SIZE), &[10, 12, 10]).await;

        let n = wait_for_frame(&mut mock, 115_200, &PollPolicy::default())
            .await
            .unwrap();

        assert_eq!(n, FRAME_SIZE);
        assert_eq!(mock.poll_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn silence_is_a_short_read_of_zero() {
        let mut mock = primed(&[], &[]).await;

        let result = wait_for_frame(&mut mock, 9600, &PollPolicy::default()).await;

        assert!(matches!(result, Err(Error::ShortRead(0))));
        assert_eq!(mock.poll_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stall_mid_frame() {
        let mut mock = primed(&pad("5 1", FRAME_SIZE), &[10, 0]).await;

        let result = wait_for_frame(&mut mock, 9600, &PollPolicy::default()).await;

        assert!(matches!(result, Err(Error::ShortRead(10))));
        assert_eq!(mock.poll_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn overshoot_is_a_short_read() {
        let mut mock = primed(&pad("5 1", 40), &[40]).await;

        let result = wait_for_frame(&mut mock, 9600, &PollPolicy::default()).await;

        assert!(matches!(result, Err(Error::ShortRead(40))));
    }

    #[tokio::test(start_paused = true)]
    async fn trickle_hits_response_timeout() {
        let mut mock = primed(&pad("5 1", FRAME_SIZE), &[1; FRAME_SIZE]).await;
        let policy = PollPolicy {
            extra_margin: Duration::ZERO,
            response_timeout: Duration::from_millis(100),
        };

        let result = wait_for_frame(&mut mock, 9600, &policy).await;

        // Polls at 72 ms and 144 ms; the deadline passes after the second.
        assert!(matches!(result, Err(Error::ShortRead(2))));
        assert_eq!(mock.poll_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_failure_is_a_read_error() {
        let mut mock = primed(&[], &[]).await;
        mock.fail_bytes_available();

        let result = wait_for_frame(&mut mock, 9600, &PollPolicy::default()).await;

        assert!(matches!(result, Err(Error::TransportRead(_))));
    }
}
