//! Motion: mounts, slots, stepping and revolution planning
//!
//! One full revolution of a mount's motor advances it by exactly one slot,
//! so everything above the stepper works in whole revolutions.

pub mod carousel;
pub mod planner;
pub mod slot;
pub mod stepper;

pub use carousel::Carousel;
pub use planner::revolutions_needed;
pub use slot::{Mount, Slot, MOUNT_COUNT, SLOTS_PER_MOUNT};
pub use stepper::{Direction, Stepper, PHASE_COUNT, PHASE_TABLE};
