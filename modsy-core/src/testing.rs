//! Test doubles shared by the unit tests

use std::string::{String, ToString};
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::traits::{CoilDriver, RemoteStore, StoreError};

/// Coil driver that remembers what it was told
#[derive(Debug, Default)]
pub struct RecordingCoils {
    pub pattern: [bool; 4],
    pub energize_count: usize,
    pub releases: usize,
}

impl CoilDriver for RecordingCoils {
    fn energize(&mut self, pattern: [bool; 4]) {
        self.pattern = pattern;
        self.energize_count += 1;
    }

    fn release(&mut self) {
        self.releases += 1;
        self.energize([false; 4]);
    }
}

/// Delay that returns immediately and accounts for requested time
#[derive(Debug, Default)]
pub struct CountingDelay {
    total_ns: u64,
    /// Every non-zero millisecond delay, in order
    pub pauses: Vec<u32>,
}

impl CountingDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for CountingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
        if ms > 0 {
            self.pauses.push(ms);
        }
    }
}

/// In-memory store keyed by exact path
#[derive(Debug, Default)]
pub struct MockStore {
    values: Vec<(String, String)>,
    /// Paths read, in order
    pub reads: Vec<String>,
    /// Attempted writes (path, value), in order, including failed ones
    pub writes: Vec<(String, String)>,
    failing_writes: usize,
    failing_reads: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a JSON value at `path`
    pub fn with(mut self, path: &str, json: &str) -> Self {
        self.values.push((path.to_string(), json.to_string()));
        self
    }

    /// Make the next `count` writes fail
    pub fn failing_writes(mut self, count: usize) -> Self {
        self.failing_writes = count;
        self
    }

    /// Make every read fail at the transport
    pub fn failing_reads(mut self) -> Self {
        self.failing_reads = true;
        self
    }

    /// Values written to `path`, in order
    pub fn written(&self, path: &str) -> Vec<&str> {
        self.writes
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

impl RemoteStore for MockStore {
    async fn read(&mut self, path: &str, buf: &mut [u8]) -> Result<Option<usize>, StoreError> {
        self.reads.push(path.to_string());
        if self.failing_reads {
            return Err(StoreError::Transport);
        }
        let Some((_, value)) = self.values.iter().find(|(p, _)| p == path) else {
            return Ok(None);
        };
        let bytes = value.as_bytes();
        if bytes.len() > buf.len() {
            return Err(StoreError::Overflow);
        }
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Some(bytes.len()))
    }

    async fn write(&mut self, path: &str, value: &[u8]) -> Result<(), StoreError> {
        let value = String::from_utf8_lossy(value).into_owned();
        self.writes.push((path.to_string(), value));
        if self.failing_writes > 0 {
            self.failing_writes -= 1;
            return Err(StoreError::Rejected);
        }
        Ok(())
    }
}
