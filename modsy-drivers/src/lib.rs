//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in modsy-core:
//!
//! - Stepper coil drivers (ULN2003 darlington array on four GPIOs)

#![no_std]
#![deny(unsafe_code)]

pub mod stepper;
