//! Remote key-value store trait
//!
//! The store is addressed by slash-separated paths and holds JSON values.
//! The transport behind it (bridge link, HTTPS, mocks) is not the core's
//! concern; only "read value at path" and "write value at path" are.

/// Errors reported by a store implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// No response within the configured timeout
    Timeout,
    /// The link or network underneath failed
    Transport,
    /// The remote endpoint answered with a non-success status
    Rejected,
    /// The value does not fit in the caller's buffer
    Overflow,
    /// Unexpected or malformed response
    Protocol,
}

/// Path-addressed JSON store
///
/// Every call suspends the caller until it completes or times out; there
/// is no pipelining.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Read the JSON value at `path` into `buf`
    ///
    /// Returns `Ok(None)` when the store reports nothing at `path`, or
    /// `Ok(Some(len))` with the body copied into `buf[..len]`.
    async fn read(&mut self, path: &str, buf: &mut [u8]) -> Result<Option<usize>, StoreError>;

    /// Replace the value at `path` with the JSON text `value`
    async fn write(&mut self, path: &str, value: &[u8]) -> Result<(), StoreError>;
}
