//! Analog input helpers
//!
//! Keypad ladders and trimmers are handled as 10-bit values (0..=1023)
//! whatever the converter's native resolution.

/// Rescale a raw reading of `bits` resolution to 10 bits
pub const fn to_10bit(raw: u16, bits: u8) -> u16 {
    if bits >= 10 {
        raw >> (bits - 10)
    } else {
        raw << (10 - bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_10bit() {
        assert_eq!(to_10bit(4095, 12), 1023);
        assert_eq!(to_10bit(2048, 12), 512);
        assert_eq!(to_10bit(1023, 10), 1023);
        assert_eq!(to_10bit(255, 8), 1020);
    }
}
