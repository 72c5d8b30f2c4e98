//! Remote store access helpers
//!
//! Wraps [`RemoteStore`] with the absence rules the control loop relies on:
//! a failed read, an empty body and a literal `null` all mean "absent".

pub mod paths;

use crate::state::CommandStatus;
use crate::traits::{RemoteStore, StoreError};

/// Largest document the core reads in one go
pub const MAX_DOCUMENT_LEN: usize = 256;

/// Read the value at `path`, mapping every kind of absence to `None`
pub async fn fetch<'b, S: RemoteStore>(store: &mut S, path: &str, buf: &'b mut [u8]) -> Option<&'b [u8]> {
    let len = match store.read(path, buf).await {
        Ok(Some(len)) => len,
        Ok(None) => return None,
        Err(_e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("read {} failed: {:?}", path, _e);
            return None;
        }
    };
    let buf: &'b [u8] = buf;
    let body = trim_ascii(buf.get(..len)?);
    if body.is_empty() || body == b"null" {
        None
    } else {
        Some(body)
    }
}

/// Write a command status as a bare JSON string literal
pub async fn write_status<S: RemoteStore>(store: &mut S, path: &str, status: CommandStatus) -> Result<(), StoreError> {
    store.write(path, status.json().as_bytes()).await
}

fn trim_ascii(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if first.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    while let [rest @ .., last] = bytes {
        if last.is_ascii_whitespace() {
            bytes = rest;
        } else {
            break;
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockStore;
    use embassy_futures::block_on;

    fn fetch_from(store: &mut MockStore, path: &str) -> Option<std::vec::Vec<u8>> {
        let mut buf = [0u8; MAX_DOCUMENT_LEN];
        block_on(fetch(store, path, &mut buf)).map(|b| b.to_vec())
    }

    #[test]
    fn test_fetch_present_value() {
        let mut store = MockStore::new().with("/a", " {\"x\":1}\n");
        assert_eq!(fetch_from(&mut store, "/a").as_deref(), Some(&b"{\"x\":1}"[..]));
    }

    #[test]
    fn test_fetch_absent_forms() {
        let mut store = MockStore::new().with("/null", "null").with("/empty", "  ");
        assert_eq!(fetch_from(&mut store, "/null"), None);
        assert_eq!(fetch_from(&mut store, "/empty"), None);
        assert_eq!(fetch_from(&mut store, "/missing"), None);
    }

    #[test]
    fn test_fetch_failure_is_absent() {
        let mut store = MockStore::new().with("/a", "1").failing_reads();
        assert_eq!(fetch_from(&mut store, "/a"), None);
    }

    #[test]
    fn test_write_status_is_bare_string_literal() {
        let mut store = MockStore::new();
        block_on(write_status(&mut store, "/comandoLook/status", CommandStatus::InProgress)).unwrap();
        assert_eq!(store.written("/comandoLook/status"), ["\"em_andamento\""]);
    }
}
