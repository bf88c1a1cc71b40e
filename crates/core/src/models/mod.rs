//! Data models for Roomboard

mod booking;
mod notification;
mod recurrence;
mod role;
mod room;

pub use booking::*;
pub use notification::*;
pub use recurrence::*;
pub use role::*;
pub use room::*;
