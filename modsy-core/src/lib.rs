//! Board-agnostic core logic for the garment carousel firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware or network implementations:
//!
//! - Hardware and remote store traits
//! - Mount/slot model, stepper phase sequencing and revolution planning
//! - Command lifecycle and decoding of the remote documents
//! - Look resolution (look -> garments -> slots)
//! - The command poller that ties it together
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod motion;
pub mod poller;
pub mod remote;
pub mod resolver;
pub mod state;
pub mod traits;

#[cfg(test)]
mod testing;
