//! RP2040-specific HAL for the garment carousel firmware
//!
//! - Config-driven GPIO allocation
//! - Coil driver construction for each mount
//! - Hand-off of the bridge UART and its pins

#![no_std]

pub mod coils;
pub mod pins;

pub use coils::{mount_coils, MountCoils};
pub use pins::{LinkPeripherals, PinBank, PinError};
