//! Message types for the bridge link
//!
//! Message types are divided into two categories:
//! - Controller → Bridge: store requests
//! - Bridge → Controller: responses, echoing the request's sequence number

use crate::frame::{Frame, FrameError};

// Message type IDs: Controller → Bridge
pub const MSG_READ: u8 = 0x10;
pub const MSG_WRITE: u8 = 0x11;

// Message type IDs: Bridge → Controller
pub const MSG_VALUE: u8 = 0x90;
pub const MSG_ABSENT: u8 = 0x91;
pub const MSG_WRITE_OK: u8 = 0x92;
pub const MSG_WRITE_FAILED: u8 = 0x93;
pub const MSG_LINK_DOWN: u8 = 0x9F;

/// Errors building or reading a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// Frame-level failure
    Frame(FrameError),
    /// Type byte not defined for this direction
    UnknownType(u8),
    /// Payload shorter than the type requires
    Truncated,
    /// Path longer than a WRITE can describe
    PathTooLong,
    /// Path is not UTF-8
    InvalidPath,
}

impl From<FrameError> for MessageError {
    fn from(e: FrameError) -> Self {
        MessageError::Frame(e)
    }
}

/// Requests from the controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreRequest<'a> {
    /// Fetch the JSON value at `path`
    Read { seq: u8, path: &'a str },
    /// Replace the value at `path` with `value` (JSON text)
    Write { seq: u8, path: &'a str, value: &'a [u8] },
}

impl<'a> StoreRequest<'a> {
    pub fn seq(&self) -> u8 {
        match self {
            StoreRequest::Read { seq, .. } | StoreRequest::Write { seq, .. } => *seq,
        }
    }

    /// Encode this request into a frame
    pub fn to_frame(&self) -> Result<Frame, MessageError> {
        match self {
            // Payload: [seq][path...]
            StoreRequest::Read { seq, path } => Ok(Frame::from_parts(MSG_READ, &[&[*seq], path.as_bytes()])?),
            // Payload: [seq][path_len][path...][json...]
            StoreRequest::Write { seq, path, value } => {
                let path_len = u8::try_from(path.len()).map_err(|_| MessageError::PathTooLong)?;
                Ok(Frame::from_parts(
                    MSG_WRITE,
                    &[&[*seq, path_len], path.as_bytes(), *value],
                )?)
            }
        }
    }

    /// Parse a request from a frame (bridge side and tests)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, MessageError> {
        let (&seq, rest) = frame.payload.split_first().ok_or(MessageError::Truncated)?;
        match frame.kind {
            MSG_READ => Ok(StoreRequest::Read {
                seq,
                path: as_path(rest)?,
            }),
            MSG_WRITE => {
                let (&path_len, rest) = rest.split_first().ok_or(MessageError::Truncated)?;
                let path_len = path_len as usize;
                if rest.len() < path_len {
                    return Err(MessageError::Truncated);
                }
                let (path, value) = rest.split_at(path_len);
                Ok(StoreRequest::Write {
                    seq,
                    path: as_path(path)?,
                    value,
                })
            }
            other => Err(MessageError::UnknownType(other)),
        }
    }
}

fn as_path(bytes: &[u8]) -> Result<&str, MessageError> {
    core::str::from_utf8(bytes).map_err(|_| MessageError::InvalidPath)
}

/// Responses from the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeResponse<'a> {
    /// Body of a read, exactly as the store returned it
    Value { seq: u8, body: &'a [u8] },
    /// Nothing stored at the path
    Absent { seq: u8 },
    /// Write accepted
    WriteOk { seq: u8 },
    /// Write answered with a non-success HTTP status (0 if none)
    WriteFailed { seq: u8, http_status: u16 },
    /// Bridge has no network connection
    LinkDown { seq: u8 },
}

impl<'a> BridgeResponse<'a> {
    pub fn seq(&self) -> u8 {
        match self {
            BridgeResponse::Value { seq, .. }
            | BridgeResponse::Absent { seq }
            | BridgeResponse::WriteOk { seq }
            | BridgeResponse::WriteFailed { seq, .. }
            | BridgeResponse::LinkDown { seq } => *seq,
        }
    }

    /// Parse a response from a frame
    pub fn from_frame(frame: &'a Frame) -> Result<Self, MessageError> {
        let (&seq, rest) = frame.payload.split_first().ok_or(MessageError::Truncated)?;
        match frame.kind {
            MSG_VALUE => Ok(BridgeResponse::Value { seq, body: rest }),
            MSG_ABSENT => Ok(BridgeResponse::Absent { seq }),
            MSG_WRITE_OK => Ok(BridgeResponse::WriteOk { seq }),
            MSG_WRITE_FAILED => match rest {
                [hi, lo, ..] => Ok(BridgeResponse::WriteFailed {
                    seq,
                    http_status: u16::from_be_bytes([*hi, *lo]),
                }),
                _ => Err(MessageError::Truncated),
            },
            MSG_LINK_DOWN => Ok(BridgeResponse::LinkDown { seq }),
            other => Err(MessageError::UnknownType(other)),
        }
    }

    /// Encode this response into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Result<Frame, MessageError> {
        let frame = match self {
            BridgeResponse::Value { seq, body } => Frame::from_parts(MSG_VALUE, &[&[*seq], *body])?,
            BridgeResponse::Absent { seq } => Frame::new(MSG_ABSENT, &[*seq])?,
            BridgeResponse::WriteOk { seq } => Frame::new(MSG_WRITE_OK, &[*seq])?,
            BridgeResponse::WriteFailed { seq, http_status } => {
                let [hi, lo] = http_status.to_be_bytes();
                Frame::new(MSG_WRITE_FAILED, &[*seq, hi, lo])?
            }
            BridgeResponse::LinkDown { seq } => Frame::new(MSG_LINK_DOWN, &[*seq])?,
        };
        Ok(frame)
    }
}
