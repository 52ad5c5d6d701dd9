//! Report integrity check.
//!
//! CRC-8 with polynomial 0x07, zero init, no reflection and no final XOR
//! (catalogued as CRC-8/SMBUS).

use crc::{Crc, CRC_8_SMBUS};

const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_SMBUS);

/// CRC-8 of `data`. The empty slice checksums to 0.
pub fn crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Bit-at-a-time reference, as the terminals compute it
    fn crc8_bitwise(data: &[u8]) -> u8 {
        let mut crc = 0u8;
        for &byte in data {
            crc ^= byte;
            for _ in 0..8 {
                crc = if crc & 0x80 != 0 {
                    (crc << 1) ^ 0x07
                } else {
                    crc << 1
                };
            }
        }
        crc
    }

    #[test]
    fn test_empty() {
        assert_eq!(crc8(&[]), 0x00);
    }

    #[test]
    fn test_check_value() {
        assert_eq!(crc8(b"123456789"), 0xF4);
    }

    #[test]
    fn test_report_payload() {
        assert_eq!(crc8(&[0x12, 0x34]), 0xF1);
        assert_eq!(crc8(&[0x00]), 0x00);
        assert_eq!(crc8(&[0xFF]), 0xF3);
    }

    proptest! {
        #[test]
        fn prop_matches_bitwise_reference(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_eq!(crc8(&data), crc8_bitwise(&data));
        }
    }
}
