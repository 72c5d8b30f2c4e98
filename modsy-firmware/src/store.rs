//! Remote store over the bridge UART
//!
//! One request is in flight at a time. Each request carries a fresh
//! sequence number; responses with any other number are leftovers from an
//! exchange that already timed out and are dropped.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{with_timeout, Duration};
use embedded_io_async::{Read, Write};

use modsy_core::config::LinkConfig;
use modsy_core::traits::{RemoteStore, StoreError};
use modsy_protocol::{BridgeResponse, Frame, FrameParser, StoreRequest};

/// [`RemoteStore`] backed by the network bridge
pub struct UartStore {
    tx: BufferedUartTx,
    rx: BufferedUartRx,
    parser: FrameParser,
    seq: u8,
    config: LinkConfig,
}

impl UartStore {
    pub fn new(tx: BufferedUartTx, rx: BufferedUartRx, config: LinkConfig) -> Self {
        Self {
            tx,
            rx,
            parser: FrameParser::new(),
            seq: 0,
            config,
        }
    }

    fn next_seq(&mut self) -> u8 {
        self.seq = self.seq.wrapping_add(1);
        self.seq
    }

    /// Send `request` and wait for the frame answering it
    async fn exchange(&mut self, request: &StoreRequest<'_>, timeout_ms: u32) -> Result<Frame, StoreError> {
        let frame = request.to_frame().map_err(|e| {
            warn!("Request does not fit a frame: {:?}", e);
            StoreError::Protocol
        })?;
        let timeout = Duration::from_millis(timeout_ms as u64);
        match with_timeout(timeout, self.send_and_receive(&frame, request.seq())).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Bridge timeout (seq {})", request.seq());
                Err(StoreError::Timeout)
            }
        }
    }

    async fn send_and_receive(&mut self, frame: &Frame, seq: u8) -> Result<Frame, StoreError> {
        self.parser.reset();
        self.tx
            .write_all(&frame.encode_to_vec())
            .await
            .map_err(|_| StoreError::Transport)?;

        let mut byte = [0u8; 1];
        loop {
            let n = self.rx.read(&mut byte).await.map_err(|_| StoreError::Transport)?;
            if n == 0 {
                continue;
            }
            let frame = match self.parser.feed(byte[0]) {
                Ok(Some(frame)) => frame,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Bridge frame error: {:?}", e);
                    continue;
                }
            };
            let answered = match BridgeResponse::from_frame(&frame) {
                Ok(response) => response.seq(),
                Err(e) => {
                    warn!("Bad bridge response: {:?}", e);
                    continue;
                }
            };
            if answered == seq {
                return Ok(frame);
            }
            trace!("Dropping stale response (seq {}, want {})", answered, seq);
        }
    }
}

impl RemoteStore for UartStore {
    async fn read(&mut self, path: &str, buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        let seq = self.next_seq();
        let frame = self
            .exchange(&StoreRequest::Read { seq, path }, self.config.read_timeout_ms)
            .await?;
        match BridgeResponse::from_frame(&frame) {
            Ok(BridgeResponse::Value { body, .. }) => {
                let dst = buf.get_mut(..body.len()).ok_or(StoreError::Overflow)?;
                dst.copy_from_slice(body);
                Ok(Some(body.len()))
            }
            Ok(BridgeResponse::Absent { .. }) => Ok(None),
            Ok(BridgeResponse::LinkDown { .. }) => Err(StoreError::Transport),
            _ => Err(StoreError::Protocol),
        }
    }

    async fn write(&mut self, path: &str, value: &[u8]) -> Result<(), StoreError> {
        let seq = self.next_seq();
        let frame = self
            .exchange(&StoreRequest::Write { seq, path, value }, self.config.write_timeout_ms)
            .await?;
        match BridgeResponse::from_frame(&frame) {
            Ok(BridgeResponse::WriteOk { .. }) => Ok(()),
            Ok(BridgeResponse::WriteFailed { http_status, .. }) => {
                warn!("Write to {} refused (HTTP {})", path, http_status);
                Err(StoreError::Rejected)
            }
            Ok(BridgeResponse::LinkDown { .. }) => Err(StoreError::Transport),
            _ => Err(StoreError::Protocol),
        }
    }
}
