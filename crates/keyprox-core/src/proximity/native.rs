use super::contract::ProximityContract;
use crate::error::KpResult;
use std::fmt;
use std::num::NonZeroU64;
use tracing::debug;

/// Opaque identifier of a decoder-side proximity structure. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(NonZeroU64);

impl NativeHandle {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The external decoder across the FFI boundary.
pub trait NativeDecoder {
    /// Builds the decoder-side structure from `contract`.
    fn create(&self, contract: &ProximityContract) -> KpResult<NativeHandle>;

    /// Frees a handle returned by `create`. Called exactly once per handle.
    fn release(&self, handle: NativeHandle);
}

/// Decoder type of a geometry-only index. Uninhabited, so such an index can
/// never hold a native handle.
#[derive(Debug)]
pub enum NoDecoder {}

impl NativeDecoder for NoDecoder {
    fn create(&self, _contract: &ProximityContract) -> KpResult<NativeHandle> {
        match *self {}
    }

    fn release(&self, _handle: NativeHandle) {
        match *self {}
    }
}

/// Sole owner of a native handle. Dropping it releases the handle; there is no
/// other way to release it and it cannot be cloned.
pub struct NativeProximityInfo<D: NativeDecoder> {
    decoder: D,
    handle: NativeHandle,
}

impl<D: NativeDecoder> NativeProximityInfo<D> {
    pub fn create(decoder: D, contract: &ProximityContract) -> KpResult<Self> {
        let handle = decoder.create(contract)?;
        debug!(
            "Native proximity info {} created ({} keys, {} cells)",
            handle,
            contract.key_count(),
            contract.grid_size()
        );
        Ok(Self { decoder, handle })
    }

    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }
}

impl<D: NativeDecoder> Drop for NativeProximityInfo<D> {
    fn drop(&mut self) {
        debug!("Releasing native proximity info {}", self.handle);
        self.decoder.release(self.handle);
    }
}

impl<D: NativeDecoder> fmt::Debug for NativeProximityInfo<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeProximityInfo")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
