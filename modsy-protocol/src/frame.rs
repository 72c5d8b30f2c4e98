//! Frame encoding and decoding for the bridge link.
//!
//! Frame format:
//! - START (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-250 bytes): type-specific data
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// START + LENGTH + TYPE + CHECKSUM
const OVERHEAD: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = OVERHEAD + MAX_PAYLOAD_SIZE;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// LENGTH byte above the payload limit
    InvalidLength,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub kind: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame from payload parts laid end to end
    pub fn from_parts(kind: u8, parts: &[&[u8]]) -> Result<Self, FrameError> {
        let mut payload = Vec::new();
        for part in parts {
            payload
                .extend_from_slice(part)
                .map_err(|_| FrameError::PayloadTooLarge)?;
        }
        Ok(Self { kind, payload })
    }

    /// Create a frame with the given message type and payload
    pub fn new(kind: u8, payload: &[u8]) -> Result<Self, FrameError> {
        Self::from_parts(kind, &[payload])
    }

    fn checksum(length: u8, kind: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ kind, |acc, b| acc ^ b)
    }

    /// Size of the encoded frame
    pub fn encoded_len(&self) -> usize {
        OVERHEAD + self.payload.len()
    }

    /// Encode this frame into `buffer`, returning the bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let len = self.encoded_len();
        let out = buffer.get_mut(..len).ok_or(FrameError::BufferTooSmall)?;

        let length = self.payload.len() as u8;
        let (head, rest) = out.split_at_mut(3);
        head.copy_from_slice(&[FRAME_START, length, self.kind]);
        let (body, tail) = rest.split_at_mut(self.payload.len());
        body.copy_from_slice(&self.payload);
        tail[0] = Self::checksum(length, self.kind, &self.payload);

        Ok(len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Vec<u8, MAX_FRAME_SIZE> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        // A frame always fits MAX_FRAME_SIZE
        let len = self.encode(&mut buffer).unwrap_or(0);
        Vec::from_slice(&buffer[..len]).unwrap_or_default()
    }
}

/// Byte-at-a-time frame decoder
///
/// Bytes before a START are dropped, so the parser resynchronizes on its
/// own after line noise or a partial frame.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
    length: u8,
    kind: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    Length,
    Kind,
    Payload,
    Checksum,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Start,
            payload: Vec::new(),
            length: 0,
            kind: 0,
        }
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.state = ParseState::Start;
        self.payload.clear();
        self.length = 0;
        self.kind = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when the partial
    /// frame was discarded.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::Start => {
                if byte == FRAME_START {
                    self.state = ParseState::Length;
                }
            }
            ParseState::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidLength);
                }
                self.length = byte;
                self.state = ParseState::Kind;
            }
            ParseState::Kind => {
                self.kind = byte;
                self.payload.clear();
                self.state = if self.length == 0 {
                    ParseState::Checksum
                } else {
                    ParseState::Payload
                };
            }
            ParseState::Payload => {
                // Bounded by the LENGTH check
                let _ = self.payload.push(byte);
                if self.payload.len() == self.length as usize {
                    self.state = ParseState::Checksum;
                }
            }
            ParseState::Checksum => {
                let expected = Frame::checksum(self.length, self.kind, &self.payload);
                let frame = Frame {
                    kind: self.kind,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                if byte != expected {
                    return Err(FrameError::InvalidChecksum);
                }
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse_all(bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        let mut parser = FrameParser::new();
        for &byte in bytes {
            if let Some(frame) = parser.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }

    #[test]
    fn test_encode_empty_payload() {
        let frame = Frame::new(0x92, &[]).unwrap();
        let mut buffer = [0u8; 8];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 4);
        assert_eq!(&buffer[..4], &[FRAME_START, 0, 0x92, 0x92]);
    }

    #[test]
    fn test_encode_layout() {
        let frame = Frame::from_parts(0x10, &[&[7], b"/a"]).unwrap();
        let encoded = frame.encode_to_vec();

        assert_eq!(encoded.len(), 7);
        assert_eq!(&encoded[..6], &[FRAME_START, 3, 0x10, 7, b'/', b'a']);
        assert_eq!(encoded[6], 3 ^ 0x10 ^ 7 ^ b'/' ^ b'a');
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(0x10, b"/comandoLook").unwrap();
        let mut buffer = [0u8; 8];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let half = [0u8; MAX_PAYLOAD_SIZE / 2 + 1];
        assert_eq!(
            Frame::from_parts(0x11, &[&half, &half]),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_invalid_checksum() {
        let mut encoded = Frame::new(0x90, b"null").unwrap().encode_to_vec();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;
        assert_eq!(parse_all(&encoded), Err(FrameError::InvalidChecksum));
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(parse_all(&[FRAME_START, 251]), Err(FrameError::InvalidLength));
    }

    #[test]
    fn test_parser_recovers_after_bad_frame() {
        let good = Frame::new(0x91, &[3]).unwrap();
        let mut parser = FrameParser::new();
        let _ = parser.feed(FRAME_START);
        assert!(parser.feed(255).is_err());

        let mut parsed = None;
        for byte in good.encode_to_vec() {
            if let Some(frame) = parser.feed(byte).unwrap() {
                parsed = Some(frame);
            }
        }
        assert_eq!(parsed, Some(good));
    }

    proptest! {
        #[test]
        fn prop_frames_survive_leading_noise(
            noise in proptest::collection::vec(any::<u8>().prop_filter("not START", |b| *b != FRAME_START), 0..16),
            kind in any::<u8>(),
            payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_SIZE),
        ) {
            let frame = Frame::new(kind, &payload).unwrap();
            let mut bytes = noise.clone();
            bytes.extend_from_slice(&frame.encode_to_vec());

            prop_assert_eq!(parse_all(&bytes), Ok(Some(frame)));
        }
    }
}
