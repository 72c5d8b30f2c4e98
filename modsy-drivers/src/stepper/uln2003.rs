//! ULN2003 coil driver
//!
//! The ULN2003 board sinks each coil of a 28BYJ-48 through one darlington
//! channel, so every coil maps to one GPIO. Some carrier boards put an
//! inverter in front of the array; `inverted` covers those.

use embedded_hal::digital::{OutputPin, PinState};
use modsy_core::traits::CoilDriver;

/// Four GPIOs driving one unipolar stepper through a ULN2003
pub struct Uln2003<P> {
    pins: [P; 4],
    /// If true, coil energized = pin LOW
    inverted: bool,
    /// Last pattern written (true = energized)
    pattern: [bool; 4],
}

impl<P: OutputPin> Uln2003<P> {
    /// Create a driver with all coils released
    ///
    /// `pins` are in coil order: index `i` follows column `i` of the phase
    /// table.
    pub fn new(pins: [P; 4], inverted: bool) -> Self {
        let mut driver = Self {
            pins,
            inverted,
            pattern: [false; 4],
        };
        driver.energize([false; 4]);
        driver
    }

    /// Last pattern written
    pub fn pattern(&self) -> [bool; 4] {
        self.pattern
    }

    /// Give the pins back
    pub fn free(self) -> [P; 4] {
        self.pins
    }
}

impl<P: OutputPin> CoilDriver for Uln2003<P> {
    fn energize(&mut self, pattern: [bool; 4]) {
        self.pattern = pattern;
        for (pin, on) in self.pins.iter_mut().zip(pattern) {
            // GPIO writes on the supported boards are infallible
            let _ = pin.set_state(PinState::from(on != self.inverted));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Mock GPIO pin for testing
    #[derive(Default)]
    struct MockPin {
        high: bool,
        writes: usize,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    fn driver(inverted: bool) -> Uln2003<MockPin> {
        Uln2003::new(Default::default(), inverted)
    }

    fn levels(driver: Uln2003<MockPin>) -> [bool; 4] {
        driver.free().map(|p| p.high)
    }

    #[test]
    fn test_new_releases_coils() {
        let uln = driver(false);
        assert_eq!(uln.pattern(), [false; 4]);
        let pins = uln.free();
        assert!(pins.iter().all(|p| !p.high && p.writes == 1));
    }

    #[test]
    fn test_new_inverted_starts_high() {
        let uln = driver(true);
        assert_eq!(uln.pattern(), [false; 4]);
        let pins = uln.free();
        assert!(pins.iter().all(|p| p.high && p.writes == 1));
    }

    #[test]
    fn test_active_high_pattern() {
        let mut uln = driver(false);
        uln.energize([true, true, false, false]);
        assert_eq!(uln.pattern(), [true, true, false, false]);
        assert_eq!(levels(uln), [true, true, false, false]);
    }

    #[test]
    fn test_inverted_pattern() {
        let mut uln = driver(true);
        uln.energize([false, false, true, false]);
        assert_eq!(levels(uln), [true, true, false, true]);
    }

    #[test]
    fn test_release_drops_all_coils() {
        let mut uln = driver(false);
        uln.energize([true, false, false, true]);
        uln.release();
        assert_eq!(uln.pattern(), [false; 4]);
        assert_eq!(levels(uln), [false; 4]);

        let mut inverted = driver(true);
        inverted.energize([true; 4]);
        inverted.release();
        assert_eq!(levels(inverted), [true; 4]);
    }
}
