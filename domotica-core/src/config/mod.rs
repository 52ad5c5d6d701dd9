//! Configuration types
//!
//! Board-agnostic settings, the zone table and the keymap. The stock
//! installation in [`installation`] is used when nothing else is loaded.

pub mod installation;
pub mod keymap;
pub mod types;
pub mod zones;

pub use installation::{default_keymap, default_zone_table};
pub use keymap::{KeymapBuilder, KeymapError, KeymapTable, TerminalKeymap, ZonePair};
pub use types::*;
pub use zones::{ZoneError, ZoneId, ZoneKind, ZoneTable, MAX_ZONES};
