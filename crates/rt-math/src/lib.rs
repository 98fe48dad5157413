//! RollerTap math utilities.

pub mod math;

pub use math::moments::*;
pub use math::regression::*;
pub use math::sequence::*;
