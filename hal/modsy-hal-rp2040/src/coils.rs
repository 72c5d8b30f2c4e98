//! ULN2003 coil drivers on RP2040 GPIOs

use embassy_rp::gpio::{Level, Output};
use modsy_core::config::MountConfig;
use modsy_drivers::stepper::Uln2003;

use crate::pins::{PinBank, PinError};

/// Coil driver type used for every mount
pub type MountCoils = Uln2003<Output<'static>>;

/// Claim a mount's four pins and build its coil driver, coils released
pub fn mount_coils(bank: &mut PinBank, config: &MountConfig) -> Result<MountCoils, PinError> {
    // Outputs start at the released level
    let idle = if config.inverted { Level::High } else { Level::Low };
    let [a, b, c, d] = config.pins;
    let pins = [
        Output::new(bank.take(a)?, idle),
        Output::new(bank.take(b)?, idle),
        Output::new(bank.take(c)?, idle),
        Output::new(bank.take(d)?, idle),
    ];
    Ok(Uln2003::new(pins, config.inverted))
}
