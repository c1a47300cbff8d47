mod common;

use common::qwerty_geom;
use keyprox_core::error::{KpResult, ProximityError};
use keyprox_core::proximity::{NativeDecoder, NativeHandle, ProximityContract};
use keyprox_core::{ProximityBuildParams, ProximityInfo};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Hands out increasing handles and records every release.
#[derive(Debug, Default)]
struct CountingDecoder {
    next: AtomicU64,
    created: AtomicUsize,
    released: Mutex<Vec<u64>>,
    reject: bool,
}

impl NativeDecoder for &CountingDecoder {
    fn create(&self, contract: &ProximityContract) -> KpResult<NativeHandle> {
        if self.reject {
            return Err(ProximityError::Decoder("resource exhausted".to_string()));
        }
        assert_eq!(contract.key_count(), 26);
        self.created.fetch_add(1, Ordering::SeqCst);
        let raw = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        NativeHandle::new(raw).ok_or_else(|| ProximityError::Decoder("zero handle".to_string()))
    }

    fn release(&self, handle: NativeHandle) {
        self.released.lock().unwrap().push(handle.get());
    }
}

fn build_with(decoder: &CountingDecoder) -> ProximityInfo<&CountingDecoder> {
    ProximityBuildParams::builder()
        .geometry(qwerty_geom())
        .build()
        .build_with_decoder(decoder)
        .unwrap()
}

#[test]
fn test_handle_released_exactly_once() {
    let decoder = CountingDecoder::default();
    let info = build_with(&decoder);
    let handle = info.native_handle().unwrap();
    assert!(info.has_native());

    // Queries never touch the handle.
    for _ in 0..10 {
        assert!(!info.nearest_keys(50, 50).is_empty());
    }
    assert!(decoder.released.lock().unwrap().is_empty());

    drop(info);
    assert_eq!(*decoder.released.lock().unwrap(), vec![handle.get()]);
    assert_eq!(decoder.created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_rebuild_releases_each_handle() {
    let decoder = CountingDecoder::default();
    let mut info = build_with(&decoder);
    assert_eq!(info.native_handle().map(NativeHandle::get), Some(1));
    for _ in 0..3 {
        // Replacing the keyboard drops the previous index.
        info = build_with(&decoder);
    }
    let last = info.native_handle().unwrap().get();
    assert_eq!(*decoder.released.lock().unwrap(), vec![1, 2, 3]);
    drop(info);
    assert_eq!(*decoder.released.lock().unwrap(), vec![1, 2, 3, last]);
}

#[test]
fn test_rejected_contract_keeps_geometry() {
    let decoder = CountingDecoder {
        reject: true,
        ..Default::default()
    };
    let info = build_with(&decoder);
    assert!(!info.has_native());
    assert_eq!(info.native_handle(), None);
    assert!(info.contract().is_some());

    let mut dest = [0; 4];
    assert!(info.fill_nearest_key_codes(50, 50, 'q' as i32, &mut dest) > 1);

    drop(info);
    assert!(decoder.released.lock().unwrap().is_empty());
}

#[test]
fn test_concurrent_reads() {
    let decoder = CountingDecoder::default();
    let info = build_with(&decoder);

    let points: Vec<(i32, i32)> = (0..300)
        .flat_map(|y| (0..1000).step_by(7).map(move |x| (x, y)))
        .collect();
    let sequential: Vec<Vec<u32>> = points
        .iter()
        .map(|&(x, y)| info.nearest_keys(x, y).indices().to_vec())
        .collect();
    let parallel: Vec<Vec<u32>> = points
        .par_iter()
        .map(|&(x, y)| info.nearest_keys(x, y).indices().to_vec())
        .collect();

    assert_eq!(sequential, parallel);
    drop(info);
    assert_eq!(decoder.released.lock().unwrap().len(), 1);
}
