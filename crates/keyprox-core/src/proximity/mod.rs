pub mod builder;
pub mod contract;
pub mod ffi;
pub mod grid;
pub mod native;
pub mod query;
pub mod sweet_spot;

pub use self::builder::ProximityBuildParams;
pub use self::contract::ProximityContract;
pub use self::ffi::{ExternDecoder, RawProximityInfo};
pub use self::grid::{GridParams, ProximityGrid};
pub use self::native::{NativeDecoder, NativeHandle, NativeProximityInfo, NoDecoder};
pub use self::query::NeighborList;
pub use self::sweet_spot::{SweetSpot, SweetSpots};

use crate::config::ProximityConfig;
use crate::consts::NOT_A_COORDINATE;
use crate::geometry::KeyNode;
use crate::layout::KeyboardLayout;
use fnv::FnvHashMap;

/// Spatial proximity index of one keyboard. Immutable once built.
///
/// Queries need only `&self`, so the index can be shared between threads. A
/// native handle, if any, is released when the index is dropped.
#[derive(Debug)]
pub struct ProximityInfo<D: NativeDecoder = NoDecoder> {
    pub(crate) config: ProximityConfig,
    pub(crate) most_common_key_width: i32,
    pub(crate) most_common_key_height: i32,
    pub(crate) grid: ProximityGrid,
    pub(crate) contract: Option<ProximityContract>,
    pub(crate) native: Option<NativeProximityInfo<D>>,
    pub(crate) code_index: FnvHashMap<i32, u32>,
}

impl<D: NativeDecoder> ProximityInfo<D> {
    /// Keys near `(x, y)`, in key order. Empty outside the keyboard.
    pub fn nearest_keys(&self, x: i32, y: i32) -> NeighborList<'_> {
        self.grid.nearest_keys(x, y)
    }

    /// Like [`Self::nearest_keys`], with the point first clamped onto the keyboard.
    pub fn nearest_keys_clamped(&self, x: i32, y: i32) -> NeighborList<'_> {
        if self.is_degenerate() {
            return NeighborList::empty();
        }
        let params = self.grid.params();
        let x = x.clamp(0, params.keyboard_min_width - 1);
        let y = y.clamp(0, params.keyboard_height - 1);
        self.grid.nearest_keys(x, y)
    }

    pub fn fill_nearest_key_codes(&self, x: i32, y: i32, primary_key_code: i32, dest: &mut [i32]) -> usize {
        self.grid.fill_nearest_key_codes(x, y, primary_key_code, dest)
    }

    /// Center of the first key with each code, or `NOT_A_COORDINATE` twice.
    pub fn key_coordinates(&self, codes: &[i32]) -> Vec<(i32, i32)> {
        codes
            .iter()
            .map(|code| match self.key_for_code(*code) {
                Some(k) => (k.x + k.w / 2, k.y + k.h / 2),
                None => (NOT_A_COORDINATE, NOT_A_COORDINATE),
            })
            .collect()
    }

    pub fn key_for_code(&self, code: i32) -> Option<&KeyNode> {
        self.code_index.get(&code).map(|&i| &self.grid.keys()[i as usize])
    }

    pub fn native_handle(&self) -> Option<NativeHandle> {
        self.native.as_ref().map(NativeProximityInfo::handle)
    }

    pub fn has_native(&self) -> bool {
        self.native.is_some()
    }

    /// True when the keyboard has no area. Such an index answers every query
    /// with an empty result and has no contract.
    pub fn is_degenerate(&self) -> bool {
        self.grid.params().is_degenerate()
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    pub fn grid(&self) -> &ProximityGrid {
        &self.grid
    }

    pub fn params(&self) -> &GridParams {
        self.grid.params()
    }

    pub fn keys(&self) -> &[KeyNode] {
        self.grid.keys()
    }

    pub fn most_common_key_size(&self) -> (i32, i32) {
        (self.most_common_key_width, self.most_common_key_height)
    }

    pub fn contract(&self) -> Option<&ProximityContract> {
        self.contract.as_ref()
    }

    pub fn sweet_spots(&self) -> Option<&SweetSpots> {
        self.contract.as_ref().and_then(|c| c.sweet_spots.as_ref())
    }

    pub fn keyboard_layout(&self) -> KeyboardLayout {
        let params = self.grid.params();
        KeyboardLayout::new(
            self.grid.keys(),
            self.most_common_key_width,
            self.most_common_key_height,
            params.keyboard_min_width,
            params.keyboard_height,
        )
    }
}
