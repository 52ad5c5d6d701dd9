//! 7-bit stuffing codec.
//!
//! The source bytes are treated as one little-endian bitstream and cut into
//! 7-bit groups, least significant group first. Output byte `i` holds bits
//! `7i..7i+7` of the stream in its low 7 bits; bit 7 is the role marker.
//!
//! ```text
//! src:  b0[0..8] b1[0..8] b2[0..8]
//! out:  M|s[0..7] M|s[7..14] M|s[14..21] M|s[21..24]
//! ```

use heapless::Vec;

/// Bit 7 set on every byte the master sends
pub const ROLE_MARKER: u8 = 0x80;

/// Payload bits of a stuffed byte
pub const DATA_MASK: u8 = 0x7F;

/// Author of a byte on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Central unit
    Master,
    /// Wall terminal
    Slave,
}

impl Role {
    /// Value OR'd into bit 7 of every byte sent in this role
    pub const fn marker(self) -> u8 {
        match self {
            Role::Master => ROLE_MARKER,
            Role::Slave => 0,
        }
    }

    /// Role that authored the given byte
    pub const fn of(byte: u8) -> Self {
        if byte & ROLE_MARKER != 0 {
            Role::Master
        } else {
            Role::Slave
        }
    }
}

/// Errors from the stuffing codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireError {
    /// Zero-length input has no encoding
    EmptyInput,
    /// Destination buffer cannot hold the result
    BufferTooSmall,
}

/// Number of stuffed bytes needed for `len` source bytes: `ceil(8·len / 7)`
pub const fn encoded_size(len: usize) -> Result<usize, WireError> {
    if len == 0 {
        return Err(WireError::EmptyInput);
    }
    Ok((len * 8 + 6) / 7)
}

/// Number of source bytes carried by `len` stuffed bytes: `floor(7·len / 8)`
pub const fn decoded_size(len: usize) -> Result<usize, WireError> {
    if len == 0 {
        return Err(WireError::EmptyInput);
    }
    Ok(len * 7 / 8)
}

/// Stuff `src` into `dest`, tagging every byte with `role`'s marker.
///
/// Returns the number of bytes written.
pub fn encode(role: Role, src: &[u8], dest: &mut [u8]) -> Result<usize, WireError> {
    let out_len = encoded_size(src.len())?;
    if dest.len() < out_len {
        return Err(WireError::BufferTooSmall);
    }

    let marker = role.marker();
    let mut acc: u16 = 0;
    let mut bits = 0u8;
    let mut written = 0;

    for &byte in src {
        acc |= (byte as u16) << bits;
        bits += 8;
        while bits >= 7 {
            dest[written] = (acc as u8 & DATA_MASK) | marker;
            acc >>= 7;
            bits -= 7;
            written += 1;
        }
    }
    if bits > 0 {
        dest[written] = (acc as u8 & DATA_MASK) | marker;
        written += 1;
    }

    Ok(written)
}

/// Unstuff `src` into `dest`. Bit 7 of each input byte is ignored; callers
/// check markers with [`is_master_byte`] / [`is_slave_byte`].
///
/// Returns the number of bytes written.
pub fn decode(src: &[u8], dest: &mut [u8]) -> Result<usize, WireError> {
    let out_len = decoded_size(src.len())?;
    if dest.len() < out_len {
        return Err(WireError::BufferTooSmall);
    }

    let mut acc: u16 = 0;
    let mut bits = 0u8;
    let mut written = 0;

    for &byte in src {
        acc |= ((byte & DATA_MASK) as u16) << bits;
        bits += 7;
        if bits >= 8 {
            dest[written] = acc as u8;
            acc >>= 8;
            bits -= 8;
            written += 1;
        }
    }

    Ok(written)
}

/// Stuff `src` into a heapless Vec
pub fn encode_to_vec<const N: usize>(role: Role, src: &[u8]) -> Result<Vec<u8, N>, WireError> {
    let len = encoded_size(src.len())?;
    let mut out = Vec::new();
    out.resize(len, 0).map_err(|_| WireError::BufferTooSmall)?;
    encode(role, src, &mut out)?;
    Ok(out)
}

/// Unstuff `src` into a heapless Vec
pub fn decode_to_vec<const N: usize>(src: &[u8]) -> Result<Vec<u8, N>, WireError> {
    let len = decoded_size(src.len())?;
    let mut out = Vec::new();
    out.resize(len, 0).map_err(|_| WireError::BufferTooSmall)?;
    decode(src, &mut out)?;
    Ok(out)
}

/// Single 7-bit value as sent by the master
pub const fn encode_master_byte(value: u8) -> u8 {
    value | ROLE_MARKER
}

pub const fn decode_master_byte(byte: u8) -> u8 {
    byte & DATA_MASK
}

/// Single 7-bit value as sent by a terminal
pub const fn encode_slave_byte(value: u8) -> u8 {
    value & DATA_MASK
}

pub const fn decode_slave_byte(byte: u8) -> u8 {
    byte & DATA_MASK
}

pub const fn is_master_byte(byte: u8) -> bool {
    byte & ROLE_MARKER != 0
}

pub const fn is_slave_byte(byte: u8) -> bool {
    byte & ROLE_MARKER == 0
}
