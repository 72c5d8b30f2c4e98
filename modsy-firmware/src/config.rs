//! Carousel configuration compiled in from carousel.toml
//!
//! Edit carousel.toml and rebuild to change wiring or timing.

use modsy_core::config::{CarouselConfig, LinkConfig, MountConfig, PollConfig, StepperConfig};

include!(concat!(env!("OUT_DIR"), "/carousel_config.rs"));
