//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod actuator;
pub mod bus;

pub use actuator::{ActuationError, ZoneActuator};
pub use bus::BusPort;
