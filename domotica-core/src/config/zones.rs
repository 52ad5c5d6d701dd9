//! Zone identifiers and the output-kind membership table

use core::num::NonZeroU8;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum zones in an installation
pub const MAX_ZONES: usize = 32;

/// Logical output, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZoneId(NonZeroU8);

#[cfg(feature = "defmt")]
impl defmt::Format for ZoneId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Z{}", self.get())
    }
}

impl ZoneId {
    /// Create a zone id; 0 is reserved for "unmapped"
    pub const fn new(id: u8) -> Option<Self> {
        if id == 0 || id as usize > MAX_ZONES {
            return None;
        }
        match NonZeroU8::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// 0-based slot in per-zone arrays
    pub const fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

/// How a zone is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ZoneKind {
    /// On/off output (relay, buzzer, non-dimmable light)
    Digital,
    /// Dimmable output with fades
    Pwm,
}

/// Errors building a zone table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZoneError {
    /// Zone registered twice
    Duplicate(ZoneId),
}

/// Which zones exist and how each one is driven
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTable {
    kinds: [Option<ZoneKind>; MAX_ZONES],
}

impl Default for ZoneTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneTable {
    /// Empty table
    pub const fn new() -> Self {
        Self {
            kinds: [None; MAX_ZONES],
        }
    }

    pub fn insert(&mut self, zone: ZoneId, kind: ZoneKind) -> Result<(), ZoneError> {
        let slot = &mut self.kinds[zone.index()];
        if slot.is_some() {
            return Err(ZoneError::Duplicate(zone));
        }
        *slot = Some(kind);
        Ok(())
    }

    pub fn kind(&self, zone: ZoneId) -> Option<ZoneKind> {
        self.kinds[zone.index()]
    }

    pub fn contains(&self, zone: ZoneId) -> bool {
        self.kind(zone).is_some()
    }

    pub fn is_pwm(&self, zone: ZoneId) -> bool {
        self.kind(zone) == Some(ZoneKind::Pwm)
    }

    pub fn is_digital(&self, zone: ZoneId) -> bool {
        self.kind(zone) == Some(ZoneKind::Digital)
    }

    /// Registered zones in id order
    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, ZoneKind)> + '_ {
        self.kinds.iter().enumerate().filter_map(|(i, kind)| {
            let zone = ZoneId::new(i as u8 + 1)?;
            kind.map(|kind| (zone, kind))
        })
    }

    pub fn len(&self) -> usize {
        self.kinds.iter().filter(|k| k.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: u8) -> ZoneId {
        ZoneId::new(id).unwrap()
    }

    #[test]
    fn test_zone_id_range() {
        assert!(ZoneId::new(0).is_none());
        assert_eq!(ZoneId::new(1).map(ZoneId::index), Some(0));
        assert!(ZoneId::new(MAX_ZONES as u8).is_some());
        assert!(ZoneId::new(MAX_ZONES as u8 + 1).is_none());
        assert_eq!(ZoneId::new(32).map(ZoneId::get), Some(32));
        assert!(ZoneId::new(33).is_none());
    }

    #[test]
    fn test_membership() {
        let mut table = ZoneTable::new();
        table.insert(zone(2), ZoneKind::Pwm).unwrap();
        table.insert(zone(7), ZoneKind::Digital).unwrap();

        assert!(table.is_pwm(zone(2)));
        assert!(table.is_digital(zone(7)));
        assert!(!table.contains(zone(3)));
        assert_eq!(table.len(), 2);

        let listed: heapless::Vec<_, 4> = table.iter().collect();
        assert_eq!(
            listed.as_slice(),
            &[(zone(2), ZoneKind::Pwm), (zone(7), ZoneKind::Digital)]
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut table = ZoneTable::new();
        table.insert(zone(4), ZoneKind::Pwm).unwrap();
        assert_eq!(
            table.insert(zone(4), ZoneKind::Digital),
            Err(ZoneError::Duplicate(zone(4)))
        );
        assert!(table.is_pwm(zone(4)));
    }
}
