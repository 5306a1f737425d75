//! Input controls shared by the 2FA flows.

pub mod pincode;
pub mod select;
pub mod timer;

pub use pincode::{PincodeControl, PincodeKind};
pub use select::{Segment, SelectControl};
pub use timer::Countdown;
