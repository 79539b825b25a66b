//! Blink the on-board LED and sample an analog input.
//!
//! Real applications pass a [`Connector`] that wraps their serial port
//! crate of choice. To run without hardware, this example scripts the
//! board's replies with the mock connector from `ardctl-test-harness`.
//!
//! # Usage
//!
//! ```sh
//! cargo run -p ardctl --example blink
//! ```

use std::time::Duration;

use ardctl::protocol::FRAME_SIZE;
use ardctl::{Connector, DigitalLevel, ModelRegistry, PinMode};
use ardctl_test_harness::{MockConnector, MockTransport};

/// The Uno's built-in LED.
const LED_PIN: u8 = 13;
const BLINKS: usize = 3;

async fn blink(connector: &dyn Connector, port: &str) -> ardctl::Result<()> {
    let registry = ModelRegistry::with_builtin_models();

    println!("Connecting to Uno on {port}...");
    let mut board = ardctl::connect(
        &registry,
        "Uno",
        connector,
        port,
        9600,
        Duration::from_millis(500),
    )
    .await?;

    board.set_pin_mode(LED_PIN, PinMode::Output).await?;
    for _ in 0..BLINKS {
        board.digital_write(LED_PIN, DigitalLevel::High).await?;
        println!("LED {}", DigitalLevel::High);
        tokio::time::sleep(Duration::from_millis(250)).await;

        board.digital_write(LED_PIN, DigitalLevel::Low).await?;
        println!("LED {}", DigitalLevel::Low);
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    let raw = board.analog_read_raw(0).await?;
    let volts = board.model().scale_analog(raw);
    println!("A0: {raw} ({volts:.2} V)");

    board.disconnect().await?;
    println!("Disconnected.");
    Ok(())
}

/// A mock board that answers the commands `blink` sends.
fn simulated_uno() -> MockConnector {
    let mock = MockTransport::new();
    mock.expect_frame("set_pin_mode 13 1", "13 1", FRAME_SIZE);
    for _ in 0..BLINKS {
        mock.expect_frame("digital_write 13 1", "13 1", FRAME_SIZE);
        mock.expect_frame("digital_write 13 0", "13 0", FRAME_SIZE);
    }
    mock.expect_frame("analog_read 0", "0 512", FRAME_SIZE);
    MockConnector::new(mock)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ardctl::Result<()> {
    let connector = simulated_uno();
    blink(&connector, "/dev/ttyACM0").await
}
