//! Mock connector for testing connection setup.
//!
//! [`MockConnector`] implements [`Connector`] by handing out a prepared
//! [`MockTransport`] (or refusing to), and records every open request so
//! tests can check the port address and baud rate the builder used.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use ardctl_core::error::{Error, Result};
use ardctl_core::transport::{Connector, Transport};

use crate::mock_serial::MockTransport;

/// A [`Connector`] that opens a pre-built [`MockTransport`].
#[derive(Debug)]
pub struct MockConnector {
    transport: Option<MockTransport>,
    opened: Mutex<Vec<(String, u32)>>,
}

impl MockConnector {
    /// A connector whose `open()` returns a clone of `transport`.
    pub fn new(transport: MockTransport) -> Self {
        MockConnector {
            transport: Some(transport),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// A connector whose `open()` always fails.
    pub fn failing() -> Self {
        MockConnector {
            transport: None,
            opened: Mutex::new(Vec::new()),
        }
    }

    fn log(&self) -> MutexGuard<'_, Vec<(String, u32)>> {
        self.opened.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every `(address, baud_rate)` pair passed to `open()`, in order.
    pub fn opened(&self) -> Vec<(String, u32)> {
        self.log().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn open(&self, address: &str, baud_rate: u32) -> Result<Box<dyn Transport>> {
        self.log().push((address.to_string(), baud_rate));
        match &self.transport {
            Some(mock) => Ok(Box::new(mock.clone()) as Box<dyn Transport>),
            None => Err(Error::TransportOpen(format!("no such port {address}"))),
        }
    }
}
