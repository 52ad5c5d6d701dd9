//! Input-to-actuation pipeline of the central unit

pub mod dispatcher;
pub mod gamma;

pub use dispatcher::{
    DispatchError, Trigger, ZoneChange, ZoneChanges, ZoneDispatcher, ZoneState, MAX_CHANGES,
};
pub use gamma::gamma_correct;
