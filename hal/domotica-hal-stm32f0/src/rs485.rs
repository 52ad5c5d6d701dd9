//! RS-485 reply path of a wall terminal
//!
//! A terminal only drives the line to answer a poll addressed to it.

use domotica_hal::uart::{UartConfig, DRIVER_SETTLE_US};
use embassy_stm32::gpio::Output;
use embassy_stm32::usart::Error as UsartError;
use embassy_time::Timer;
use embedded_io_async::Write;

use crate::uart::UartBusError;

/// Transmit half of the terminal's bus port
pub struct Rs485Terminal<'d, W> {
    tx: W,
    /// Driver enable, high = transmit
    de: Output<'d>,
    line: UartConfig,
}

impl<'d, W: Write<Error = UsartError>> Rs485Terminal<'d, W> {
    /// Create the port; the transceiver starts in receive mode
    pub fn new(tx: W, mut de: Output<'d>, line: UartConfig) -> Self {
        de.set_low();
        Self { tx, de, line }
    }

    /// Drive the line, send `data`, release the line
    pub async fn transmit(&mut self, data: &[u8]) -> Result<(), UartBusError> {
        self.de.set_high();
        Timer::after_micros(DRIVER_SETTLE_US).await;
        let result = self.send(data).await;
        self.de.set_low();
        result
    }

    async fn send(&mut self, data: &[u8]) -> Result<(), UartBusError> {
        self.tx.write_all(data).await?;
        self.tx.flush().await?;
        // Last stop bit may still be on the wire
        Timer::after_micros(self.line.transmit_time_us(1)).await;
        Ok(())
    }
}
