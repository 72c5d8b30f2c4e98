//! Hardware and service abstraction traits
//!
//! These traits define the interface between the application logic
//! and board-specific or transport-specific implementations.

pub mod coils;
pub mod store;

pub use coils::CoilDriver;
pub use store::{RemoteStore, StoreError};
