//! Half-step phase sequencing for 4-wire unipolar steppers
//!
//! Each motor keeps its own phase index (0..8) and its logical slot. The
//! shared phase table is applied against the motor's own pin order.

use embedded_hal_async::delay::DelayNs;

use super::slot::Slot;
use crate::config::StepperConfig;
use crate::traits::CoilDriver;

/// Half-step phases in one electrical cycle
pub const PHASE_COUNT: u8 = 8;

/// Coil energization pattern for each half-step phase
pub const PHASE_TABLE: [[bool; 4]; PHASE_COUNT as usize] = [
    [true, false, false, false],
    [true, true, false, false],
    [false, true, false, false],
    [false, true, true, false],
    [false, false, true, false],
    [false, false, true, true],
    [false, false, false, true],
    [true, false, false, true],
];

/// Stepping direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Advance through the phase table
    Forward,
    /// Walk the phase table backwards
    Reverse,
}

/// One mount's motor: coil outputs, phase index and current slot
pub struct Stepper<C> {
    coils: C,
    phase: u8,
    slot: Slot,
    config: StepperConfig,
}

impl<C: CoilDriver> Stepper<C> {
    /// Create a stepper at phase 0, sitting at [`Slot::HOME`]
    pub fn new(coils: C, config: StepperConfig) -> Self {
        Self {
            coils,
            phase: 0,
            slot: Slot::HOME,
            config,
        }
    }

    /// Current phase index in `0..8`
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Current slot
    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    /// Coil outputs (for inspection)
    pub fn coils(&self) -> &C {
        &self.coils
    }

    /// Move one half-step and hold for the step delay
    ///
    /// Only this motor's four outputs change. The slot is not touched.
    pub async fn single_step<D: DelayNs>(&mut self, direction: Direction, delay: &mut D) {
        self.phase = match direction {
            Direction::Forward => (self.phase + 1) % PHASE_COUNT,
            Direction::Reverse => (self.phase + PHASE_COUNT - 1) % PHASE_COUNT,
        };
        self.coils.energize(PHASE_TABLE[self.phase as usize]);
        delay.delay_ms(self.config.step_delay_ms).await;
    }

    /// Turn one full output revolution forward and advance one slot
    ///
    /// Runs to completion once started. Coils are released afterwards.
    pub async fn rotate_full_revolution<D: DelayNs>(&mut self, delay: &mut D) {
        for _ in 0..self.config.steps_per_revolution {
            self.single_step(Direction::Forward, delay).await;
        }
        self.slot = self.slot.next();
        self.coils.release();
    }

    /// De-energize all four outputs
    pub fn release(&mut self) {
        self.coils.release();
    }
}
