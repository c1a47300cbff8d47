//! C view of a [`ProximityContract`] and a decoder backed by C entry points.

use super::contract::ProximityContract;
use super::native::{NativeDecoder, NativeHandle};
use crate::error::{KpResult, ProximityError};
use std::marker::PhantomData;
use std::ptr;

/// Borrowed, `#[repr(C)]` view of a contract. Valid only while the contract
/// it was made from is alive; the decoder must copy what it keeps.
#[repr(C)]
#[derive(Debug)]
pub struct RawProximityInfo<'a> {
    pub version: u32,
    pub display_width: i32,
    pub display_height: i32,
    pub grid_width: i32,
    pub grid_height: i32,
    pub most_common_key_width: i32,
    pub most_common_key_height: i32,
    pub max_proximity_chars: i32,
    pub proximity_chars: *const i32,
    pub proximity_chars_len: usize,
    pub key_count: i32,
    pub key_x: *const i32,
    pub key_y: *const i32,
    pub key_widths: *const i32,
    pub key_heights: *const i32,
    pub key_char_codes: *const i32,
    /// Null in uncorrected mode, like the two arrays after it.
    pub sweet_spot_center_x: *const f32,
    pub sweet_spot_center_y: *const f32,
    pub sweet_spot_radii: *const f32,
    _contract: PhantomData<&'a ProximityContract>,
}

impl<'a> RawProximityInfo<'a> {
    pub fn new(contract: &'a ProximityContract) -> Self {
        let (center_x, center_y, radii) = match &contract.sweet_spots {
            Some(spots) => (
                spots.center_x.as_ptr(),
                spots.center_y.as_ptr(),
                spots.radius.as_ptr(),
            ),
            None => (ptr::null(), ptr::null(), ptr::null()),
        };

        Self {
            version: contract.version,
            display_width: contract.display_width,
            display_height: contract.display_height,
            grid_width: contract.grid_width,
            grid_height: contract.grid_height,
            most_common_key_width: contract.most_common_key_width,
            most_common_key_height: contract.most_common_key_height,
            max_proximity_chars: contract.max_proximity_chars as i32,
            proximity_chars: contract.proximity_chars.as_ptr(),
            proximity_chars_len: contract.proximity_chars.len(),
            key_count: contract.key_count() as i32,
            key_x: contract.key_x.as_ptr(),
            key_y: contract.key_y.as_ptr(),
            key_widths: contract.key_widths.as_ptr(),
            key_heights: contract.key_heights.as_ptr(),
            key_char_codes: contract.key_char_codes.as_ptr(),
            sweet_spot_center_x: center_x,
            sweet_spot_center_y: center_y,
            sweet_spot_radii: radii,
            _contract: PhantomData,
        }
    }
}

/// Returns a nonzero handle, or 0 on failure.
pub type CreateFn = for<'a> unsafe extern "C" fn(info: *const RawProximityInfo<'a>) -> u64;
pub type ReleaseFn = unsafe extern "C" fn(handle: u64);

/// Decoder reached through a pair of C entry points.
#[derive(Debug, Clone, Copy)]
pub struct ExternDecoder {
    create: CreateFn,
    release: ReleaseFn,
}

impl ExternDecoder {
    /// # Safety
    ///
    /// `create` must only read through the pointers it is given and must not
    /// keep them after returning. `release` must accept every nonzero handle
    /// `create` returns, exactly once.
    pub unsafe fn new(create: CreateFn, release: ReleaseFn) -> Self {
        Self { create, release }
    }
}

impl NativeDecoder for ExternDecoder {
    fn create(&self, contract: &ProximityContract) -> KpResult<NativeHandle> {
        let view = RawProximityInfo::new(contract);
        // SAFETY: `view` and the arrays it points into outlive the call, and the
        // contract of `ExternDecoder::new` forbids retaining them.
        let handle = unsafe { (self.create)(&view) };
        NativeHandle::new(handle)
            .ok_or_else(|| ProximityError::Decoder("native create returned a null handle".to_string()))
    }

    fn release(&self, handle: NativeHandle) {
        // SAFETY: handles only come from `create` and `NativeProximityInfo`
        // releases each one once.
        unsafe { (self.release)(handle.get()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::native::NativeProximityInfo;
    use crate::proximity::sweet_spot::SweetSpots;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn contract(sweet_spots: Option<SweetSpots>) -> ProximityContract {
        ProximityContract {
            version: 1,
            display_width: 200,
            display_height: 100,
            grid_width: 2,
            grid_height: 1,
            most_common_key_width: 100,
            most_common_key_height: 100,
            max_proximity_chars: 2,
            proximity_chars: vec!['a' as i32, 'b' as i32, 'a' as i32, 'b' as i32],
            key_x: vec![0, 100],
            key_y: vec![0, 0],
            key_widths: vec![100, 100],
            key_heights: vec![100, 100],
            key_char_codes: vec!['a' as i32, 'b' as i32],
            sweet_spots,
        }
    }

    #[test]
    fn test_raw_view_points_into_contract() {
        let c = contract(None);
        let raw = RawProximityInfo::new(&c);
        assert_eq!(raw.key_count, 2);
        assert_eq!(raw.proximity_chars_len, 4);
        assert_eq!(raw.key_char_codes, c.key_char_codes.as_ptr());
        assert!(raw.sweet_spot_radii.is_null());

        let spots = SweetSpots {
            center_x: vec![50.0, 150.0],
            center_y: vec![50.0, 50.0],
            radius: vec![10.0, 10.0],
        };
        let c = contract(Some(spots));
        let raw = RawProximityInfo::new(&c);
        assert!(!raw.sweet_spot_radii.is_null());
    }

    static CREATED_KEYS: AtomicU64 = AtomicU64::new(0);
    static RELEASED: AtomicU64 = AtomicU64::new(0);

    unsafe extern "C" fn create_ok(info: *const RawProximityInfo<'_>) -> u64 {
        let info = unsafe { &*info };
        let codes = unsafe { std::slice::from_raw_parts(info.key_char_codes, info.key_count as usize) };
        CREATED_KEYS.store(codes.len() as u64, Ordering::SeqCst);
        0xbeef
    }

    unsafe extern "C" fn create_fail(_info: *const RawProximityInfo<'_>) -> u64 {
        0
    }

    unsafe extern "C" fn release(handle: u64) {
        RELEASED.store(handle, Ordering::SeqCst);
    }

    #[test]
    fn test_extern_decoder_lifecycle() {
        let c = contract(None);
        let decoder = unsafe { ExternDecoder::new(create_ok, release) };
        let native = NativeProximityInfo::create(decoder, &c).unwrap();
        assert_eq!(native.handle().get(), 0xbeef);
        assert_eq!(CREATED_KEYS.load(Ordering::SeqCst), 2);
        drop(native);
        assert_eq!(RELEASED.load(Ordering::SeqCst), 0xbeef);
    }

    #[test]
    fn test_null_handle_is_error() {
        let decoder = unsafe { ExternDecoder::new(create_fail, release) };
        let res = decoder.create(&contract(None));
        assert!(matches!(res, Err(ProximityError::Decoder(_))));
    }
}
