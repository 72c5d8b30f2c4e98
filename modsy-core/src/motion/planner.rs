//! Revolution planning
//!
//! Maps (current slot, desired slot) to a count of forward revolutions.
//! Motors only turn forward, so the count is the forward distance around
//! the four-slot cycle. A mount already at its desired slot is planned a
//! full cycle of four revolutions, never zero.

use super::slot::{Slot, SLOTS_PER_MOUNT};

/// Forward revolutions that bring `current` to `desired`, in `1..=4`
pub fn revolutions_needed(current: Slot, desired: Slot) -> u8 {
    let delta = desired.get() as i8 - current.get() as i8;
    if delta <= 0 {
        (delta + SLOTS_PER_MOUNT as i8) as u8
    } else {
        delta as u8
    }
}
