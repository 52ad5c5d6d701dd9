//! UART line settings for the RP2040 PL011

use domotica_hal::uart::{DataBits, Parity, StopBits, UartConfig};
use embassy_rp::uart;

/// Build an embassy-rp UART config from the shared line settings
///
/// Returns `None` for frame formats the PL011 cannot produce (9 data bits).
pub fn to_rp_config(config: &UartConfig) -> Option<uart::Config> {
    let mut rp = uart::Config::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
        DataBits::Nine => return None,
    };
    rp.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    Some(rp)
}
