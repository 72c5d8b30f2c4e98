//! What one poll iteration did

use crate::motion::{Mount, Slot, MOUNT_COUNT};
use crate::resolver::SkipReason;
use crate::state::LookIndex;

/// Per-mount result of a look command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountReport {
    Rotated { from: Slot, to: Slot, revolutions: u8 },
    Skipped(SkipReason),
}

/// Result of one poll iteration
///
/// `status_written` reports whether the final status write succeeded. The
/// core never retries it; the app sees whatever the store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// No pending command on either channel
    Idle,
    /// Pending look command with an unusable look value, marked `erro`
    LookRejected { status_written: bool },
    /// The look has no readable document; no motor moved
    LookNotFound { look: LookIndex, status_written: bool },
    /// Look serviced mount by mount
    LookAligned {
        look: LookIndex,
        mounts: [MountReport; MOUNT_COUNT],
        status_written: bool,
    },
    /// Pending section command naming no known section, left untouched
    SectionIgnored,
    /// Every `em_andamento` attempt failed; retried on a later poll
    SectionDeferred { mount: Mount },
    /// Section turned one slot
    SectionRotated { mount: Mount, slot: Slot, status_written: bool },
}

impl PollOutcome {
    /// Check if the iteration found a pending command
    ///
    /// Decides which pause follows the iteration.
    pub fn serviced_command(&self) -> bool {
        !matches!(self, PollOutcome::Idle)
    }
}
