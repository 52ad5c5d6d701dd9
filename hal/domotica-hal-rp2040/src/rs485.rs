//! RS-485 master port
//!
//! Wraps a buffered UART and the transceiver's driver-enable (DE) line.
//! The line is driven only while the master's own bytes are on the wire.

use domotica_core::traits::BusPort;
use domotica_hal::uart::{UartConfig, DRIVER_SETTLE_US};
use embassy_rp::gpio::Output;
use embassy_time::{with_deadline, with_timeout, Duration, Instant, Timer};
use embedded_io::{Error as _, ErrorKind};
use embedded_io_async::{Read, Write};

/// Quiet time that ends a receive-path flush (ms)
const RX_QUIET_MS: u64 = 3;

/// Master side of the bus on a buffered UART
pub struct Rs485Master<'d, W, R> {
    tx: W,
    rx: R,
    /// Driver enable, high = transmit
    de: Output<'d>,
    line: UartConfig,
}

impl<'d, W: Write, R: Read> Rs485Master<'d, W, R> {
    /// Create the port; the transceiver starts in receive mode
    pub fn new(tx: W, rx: R, mut de: Output<'d>, line: UartConfig) -> Self {
        de.set_low();
        Self { tx, rx, de, line }
    }

    /// Line settings in use
    pub fn line(&self) -> &UartConfig {
        &self.line
    }

    async fn transmit(&mut self, data: &[u8]) -> Result<(), ErrorKind> {
        self.tx.write_all(data).await.map_err(|e| e.kind())?;
        self.tx.flush().await.map_err(|e| e.kind())?;
        // flush returns once the FIFO is empty; the last frame is still shifting
        Timer::after_micros(self.line.transmit_time_us(1)).await;
        Ok(())
    }
}

impl<'d, W: Write, R: Read> BusPort for Rs485Master<'d, W, R> {
    type Error = ErrorKind;

    async fn write_all(&mut self, data: &[u8]) -> Result<(), ErrorKind> {
        self.de.set_high();
        Timer::after_micros(DRIVER_SETTLE_US).await;
        let result = self.transmit(data).await;
        self.de.set_low();
        result
    }

    async fn read_with_timeout(
        &mut self,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> Result<usize, ErrorKind> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms as u64);
        let mut received = 0;
        while received < buf.len() {
            match with_deadline(deadline, self.rx.read(&mut buf[received..])).await {
                Ok(Ok(n)) => received += n,
                Ok(Err(e)) => return Err(e.kind()),
                Err(_) => break,
            }
        }
        Ok(received)
    }

    async fn flush_rx(&mut self) {
        let mut scratch = [0u8; 16];
        let quiet = Duration::from_millis(RX_QUIET_MS);
        while let Ok(Ok(n)) = with_timeout(quiet, self.rx.read(&mut scratch)).await {
            if n == 0 {
                break;
            }
        }
    }
}
