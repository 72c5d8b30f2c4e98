//! Decoding of the two command documents
//!
//! Each field is decoded on its own so a malformed or mistyped field only
//! invalidates that field. Fields written by the app that the controller
//! does not use (for example `timestamp`) are ignored.

use serde::Deserialize;

use super::status::CommandStatus;
use crate::motion::Mount;

/// Supported looks
pub const LOOK_COUNT: u8 = 4;

/// Errors decoding a command document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Not a JSON object of the expected shape
    Malformed,
}

/// Look number in `1..=4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LookIndex(u8);

impl LookIndex {
    pub const fn new(n: u8) -> Option<Self> {
        if n >= 1 && n <= LOOK_COUNT {
            Some(LookIndex(n))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Parse the wire value: exactly `"1"` to `"4"`
    pub fn parse(s: &str) -> Option<Self> {
        match s.as_bytes() {
            [digit @ b'1'..=b'4'] => Some(LookIndex(digit - b'0')),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct StatusField<'a> {
    #[serde(borrow)]
    status: Option<&'a str>,
}

#[derive(Deserialize)]
struct LookField<'a> {
    #[serde(borrow)]
    look: Option<&'a str>,
}

#[derive(Deserialize)]
struct SectionField<'a> {
    #[serde(borrow)]
    secao: Option<&'a str>,
}

fn decode<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, DecodeError> {
    serde_json_core::from_slice::<T>(body)
        .map(|(value, _)| value)
        .map_err(|_| DecodeError::Malformed)
}

fn decode_status(body: &[u8]) -> Result<Option<CommandStatus>, DecodeError> {
    let field: StatusField = decode(body)?;
    Ok(field.status.and_then(CommandStatus::from_wire))
}

/// `/comandoLook` document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LookCommand {
    pub status: Option<CommandStatus>,
    /// `None` when the field is missing or not one of `"1"`..`"4"`
    pub look: Option<LookIndex>,
}

impl LookCommand {
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        let status = decode_status(body)?;
        let look = decode::<LookField>(body)
            .ok()
            .and_then(|field| field.look)
            .and_then(LookIndex::parse);
        Ok(Self { status, look })
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_some_and(CommandStatus::is_pending)
    }
}

/// `/comandoGirar` document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SectionCommand {
    pub status: Option<CommandStatus>,
    /// `None` when the field is missing or not a known section
    pub section: Option<Mount>,
}

impl SectionCommand {
    pub fn decode(body: &[u8]) -> Result<Self, DecodeError> {
        let status = decode_status(body)?;
        let section = decode::<SectionField>(body)
            .ok()
            .and_then(|field| field.secao)
            .and_then(Mount::from_key);
        Ok(Self { status, section })
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_some_and(CommandStatus::is_pending)
    }
}
