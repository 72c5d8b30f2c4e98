//! Coil output trait for 4-wire unipolar steppers
//!
//! Abstracts over how the four coil outputs are driven (ULN2003 darlington
//! arrays on GPIOs, shift registers, mocks in tests).

/// Four coil outputs of one stepper motor
///
/// Index `i` of every pattern maps to the i-th configured output, so the
/// pin order of a motor defines how the phase table lines up with its coils.
pub trait CoilDriver {
    /// Drive the four outputs to `pattern` (true = energized)
    fn energize(&mut self, pattern: [bool; 4]);

    /// De-energize all four outputs
    ///
    /// Called between commands so the motor holds no current.
    fn release(&mut self) {
        self.energize([false; 4]);
    }
}
