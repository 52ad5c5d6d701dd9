//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod bus_poll;
pub mod dimmer;

pub use bus_poll::bus_poll_task;
pub use dimmer::dimmer_task;
