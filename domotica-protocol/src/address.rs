//! Terminal addressing

/// Highest number of terminals a 7-bit address can reach
pub const MAX_DEVICES: usize = 128;

/// Bus address of a wall terminal (0..=127)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(u8);

impl DeviceId {
    /// Create a device id, rejecting values that do not fit in 7 bits
    pub const fn new(id: u8) -> Option<Self> {
        if (id as usize) < MAX_DEVICES {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Device id carried in the low 7 bits of `raw`
    pub const fn masked(raw: u8) -> Self {
        Self(raw & 0x7F)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<DeviceId> for u8 {
    fn from(id: DeviceId) -> Self {
        id.0
    }
}
