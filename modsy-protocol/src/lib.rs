//! Store bridge protocol
//!
//! The controller has no network stack of its own. A Wi-Fi co-processor
//! (the bridge) owns the connection to the remote store and answers path
//! reads and writes over UART. This crate defines that link.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Every request carries a sequence number that the bridge echoes in its
//! response. The controller issues one request at a time.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{BridgeResponse, MessageError, StoreRequest};
