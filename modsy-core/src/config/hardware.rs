//! Hardware configuration types
//!
//! Pin assignments for the three mounts and the whole-carousel config.

use super::types::{LinkConfig, PollConfig, StepperConfig};
use crate::motion::{Mount, MOUNT_COUNT};

/// Number of GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// GPIOs reserved for the bridge UART (TX, RX)
pub const LINK_PINS: [u8; 2] = [0, 1];

/// Coil outputs of one mount's motor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MountConfig {
    /// GPIO numbers for IN1..IN4, in phase-table order
    pub pins: [u8; 4],
    /// Outputs are active-low
    pub inverted: bool,
}

impl MountConfig {
    /// Active-high mount on the given pins
    pub const fn new(pins: [u8; 4]) -> Self {
        Self {
            pins,
            inverted: false,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// GPIO number does not exist on the chip
    PinOutOfRange { mount: Mount, pin: u8 },
    /// GPIO is reserved for the bridge link
    PinReserved { mount: Mount, pin: u8 },
    /// GPIO assigned twice
    DuplicatePin { mount: Mount, pin: u8 },
    /// A revolution must take at least one step
    ZeroStepsPerRevolution,
    /// The section channel needs at least one status-write attempt
    NoStatusWriteAttempts,
}

/// Complete carousel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CarouselConfig {
    /// Per-mount pins, indexed by [`Mount::index`]
    pub mounts: [MountConfig; MOUNT_COUNT],
    pub stepper: StepperConfig,
    pub poll: PollConfig,
    pub link: LinkConfig,
}

impl CarouselConfig {
    /// Wiring and timing of the reference carousel
    pub const DEFAULT: Self = Self {
        mounts: [
            MountConfig::new([5, 18, 19, 21]),
            MountConfig::new([22, 23, 2, 4]),
            MountConfig::new([13, 15, 12, 27]),
        ],
        stepper: StepperConfig::DEFAULT,
        poll: PollConfig::DEFAULT,
        link: LinkConfig::DEFAULT,
    };

    /// Pin config for a mount
    pub fn mount(&self, mount: Mount) -> &MountConfig {
        &self.mounts[mount.index()]
    }

    /// Check pin assignments and parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut used = [false; GPIO_COUNT as usize];

        for mount in Mount::ALL {
            for &pin in &self.mount(mount).pins {
                if pin >= GPIO_COUNT {
                    return Err(ConfigError::PinOutOfRange { mount, pin });
                }
                if LINK_PINS.contains(&pin) {
                    return Err(ConfigError::PinReserved { mount, pin });
                }
                if used[pin as usize] {
                    return Err(ConfigError::DuplicatePin { mount, pin });
                }
                used[pin as usize] = true;
            }
        }

        if self.stepper.steps_per_revolution == 0 {
            return Err(ConfigError::ZeroStepsPerRevolution);
        }
        if self.poll.status_write_attempts == 0 {
            return Err(ConfigError::NoStatusWriteAttempts);
        }

        Ok(())
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(CarouselConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_mount_lookup() {
        let config = CarouselConfig::default();
        assert_eq!(config.mount(Mount::Upper).pins, [5, 18, 19, 21]);
        assert_eq!(config.mount(Mount::Lower).pins, [22, 23, 2, 4]);
        assert_eq!(config.mount(Mount::Footwear).pins, [13, 15, 12, 27]);
    }

    #[test]
    fn test_pin_out_of_range() {
        let mut config = CarouselConfig::default();
        config.mounts[2].pins[3] = 30;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PinOutOfRange {
                mount: Mount::Footwear,
                pin: 30
            })
        );
    }

    #[test]
    fn test_link_pins_reserved() {
        let mut config = CarouselConfig::default();
        config.mounts[0].pins[0] = 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::PinReserved {
                mount: Mount::Upper,
                pin: 1
            })
        );
    }

    #[test]
    fn test_duplicate_pin_within_mount() {
        let mut config = CarouselConfig::default();
        config.mounts[0].pins = [5, 5, 19, 21];
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicatePin {
                mount: Mount::Upper,
                pin: 5
            })
        );
    }

    #[test]
    fn test_duplicate_pin_across_mounts() {
        let mut config = CarouselConfig::default();
        config.mounts[1].pins[0] = 21;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicatePin {
                mount: Mount::Lower,
                pin: 21
            })
        );
    }

    #[test]
    fn test_zero_parameters_rejected() {
        let mut config = CarouselConfig::default();
        config.stepper.steps_per_revolution = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroStepsPerRevolution));

        let mut config = CarouselConfig::default();
        config.poll.status_write_attempts = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoStatusWriteAttempts));
    }
}
