//! Half-duplex bus port trait
//!
//! The central unit talks to terminals through a single RS-485 line. The
//! port implementation handles direction switching of the transceiver;
//! the polling engine only sees bytes and timeouts.

/// Master side of the shared RS-485 line
///
/// Implementations must leave the transceiver in receive mode when
/// `write_all` returns, so a terminal's reply is never missed.
#[allow(async_fn_in_trait)]
pub trait BusPort {
    /// Transport error (framing, overrun, ...)
    type Error;

    /// Transmit all bytes and wait until they have left the shift register
    async fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receive into `buf` until it is full or `timeout_ms` elapses
    ///
    /// Returns the number of bytes received, `Ok(0)` when nothing arrived.
    async fn read_with_timeout(
        &mut self,
        buf: &mut [u8],
        timeout_ms: u32,
    ) -> Result<usize, Self::Error>;

    /// Discard everything pending in the receive path
    async fn flush_rx(&mut self);
}
