//! Command lifecycle and decoding
//!
//! Commands live entirely in the remote store. Their status field walks
//! `pendente -> em_andamento -> concluido | erro`; the controller only
//! acts on a command whose status is `pendente`.

pub mod command;
pub mod status;

pub use command::{DecodeError, LookCommand, LookIndex, SectionCommand};
pub use status::CommandStatus;
