//! Configuration types
//!
//! Board-agnostic configuration structures. The firmware compiles one
//! `CarouselConfig` in from `carousel.toml` at build time.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;
