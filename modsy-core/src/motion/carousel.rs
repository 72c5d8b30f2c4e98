//! The three mount motors as one owned collection
//!
//! Motors are only ever driven one at a time, by the single control loop
//! holding `&mut Carousel`.

use embedded_hal_async::delay::DelayNs;

use super::slot::{Mount, Slot, MOUNT_COUNT};
use super::stepper::Stepper;
use crate::config::StepperConfig;
use crate::traits::CoilDriver;

/// Steppers for all mounts, indexed by [`Mount::index`]
pub struct Carousel<C> {
    steppers: [Stepper<C>; MOUNT_COUNT],
}

impl<C: CoilDriver> Carousel<C> {
    /// Build from already-constructed steppers
    pub fn new(steppers: [Stepper<C>; MOUNT_COUNT]) -> Self {
        Self { steppers }
    }

    /// Build from coil drivers in mount order, all at [`Slot::HOME`]
    pub fn from_coils(coils: [C; MOUNT_COUNT], config: StepperConfig) -> Self {
        Self::new(coils.map(|c| Stepper::new(c, config)))
    }

    pub fn stepper(&self, mount: Mount) -> &Stepper<C> {
        &self.steppers[mount.index()]
    }

    pub fn stepper_mut(&mut self, mount: Mount) -> &mut Stepper<C> {
        &mut self.steppers[mount.index()]
    }

    /// Current slot of a mount
    pub fn slot(&self, mount: Mount) -> Slot {
        self.stepper(mount).slot()
    }

    /// Current slots of all mounts
    pub fn slots(&self) -> [Slot; MOUNT_COUNT] {
        Mount::ALL.map(|m| self.slot(m))
    }

    /// Turn a mount `revolutions` full revolutions, returning its new slot
    pub async fn rotate<D: DelayNs>(&mut self, mount: Mount, revolutions: u8, delay: &mut D) -> Slot {
        let stepper = self.stepper_mut(mount);
        for _ in 0..revolutions {
            stepper.rotate_full_revolution(delay).await;
        }
        stepper.slot()
    }

    /// De-energize every motor
    pub fn release_all(&mut self) {
        for stepper in &mut self.steppers {
            stepper.release();
        }
    }
}
