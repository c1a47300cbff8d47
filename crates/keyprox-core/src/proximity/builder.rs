use super::contract::ProximityContract;
use super::grid::{GridParams, ProximityGrid};
use super::native::{NativeDecoder, NativeProximityInfo, NoDecoder};
use super::sweet_spot::compute_sweet_spots;
use super::ProximityInfo;
use crate::config::ProximityConfig;
use crate::consts::MAX_COORDINATE;
use crate::correction::TouchPositionCorrection;
use crate::error::{KpResult, ProximityError};
use crate::geometry::{KeyNode, KeyboardDefinition, KeyboardGeometry};
use crate::keycodes::CommandCode;
use fnv::FnvHashMap;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, error, info};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct ProximityBuildParams {
    pub geometry: KeyboardGeometry,
    #[builder(default)]
    pub config: ProximityConfig,
    #[builder(default)]
    pub correction: TouchPositionCorrection,
}

impl ProximityBuildParams {
    pub fn from_definition(def: KeyboardDefinition, config: ProximityConfig) -> Self {
        let correction = TouchPositionCorrection::from_flat(&def.touch_position_correction);
        ProximityBuildParams::builder()
            .geometry(def.geometry)
            .config(config)
            .correction(correction)
            .build()
    }

    /// Reads a JSON keyboard definition. A definition without a most common
    /// key size gets one computed from its keys.
    pub fn load_from_file<P: AsRef<Path>>(path: P, config: Option<ProximityConfig>) -> KpResult<Self> {
        let content = fs::read_to_string(&path)?;
        let mut def: KeyboardDefinition = serde_json::from_str(&content)?;

        let geometry = &mut def.geometry;
        if geometry.most_common_key_width == 0 && geometry.most_common_key_height == 0 {
            geometry.calculate_common_key_size(0, 0);
            debug!(
                "Derived most common key size {}x{} from {} keys",
                geometry.most_common_key_width,
                geometry.most_common_key_height,
                geometry.key_count()
            );
        }

        info!(
            "Loaded keyboard '{}' ({} keys, {}x{} px)",
            def.meta.name,
            def.geometry.key_count(),
            def.geometry.min_width,
            def.geometry.height
        );
        Ok(Self::from_definition(def, config.unwrap_or_default()))
    }

    /// Builds a geometry-only index.
    pub fn build(self) -> KpResult<ProximityInfo> {
        self.assemble(None::<NoDecoder>)
    }

    /// Builds the index and hands its contract to `decoder`. A decoder failure
    /// leaves the index without a native handle; it is not returned as an error.
    pub fn build_with_decoder<D: NativeDecoder>(self, decoder: D) -> KpResult<ProximityInfo<D>> {
        self.assemble(Some(decoder))
    }

    fn assemble<D: NativeDecoder>(self, decoder: Option<D>) -> KpResult<ProximityInfo<D>> {
        self.config.validate().map_err(ProximityError::Config)?;

        let Self {
            geometry,
            config,
            correction,
        } = self;
        let KeyboardGeometry {
            min_width,
            height,
            most_common_key_width,
            most_common_key_height,
            keys,
        } = geometry;

        let threshold = search_threshold(most_common_key_width, config.search_distance)?;
        check_extents(min_width, height, &keys, threshold)?;
        let params = GridParams::new(config.grid_width, config.grid_height, min_width, height);
        let code_index = index_codes(&keys);
        let grid = ProximityGrid::build(params, keys, threshold);

        let mut info = ProximityInfo {
            config,
            most_common_key_width,
            most_common_key_height,
            grid,
            contract: None,
            native: None,
            code_index,
        };

        if params.is_degenerate() {
            debug!("Keyboard is {}x{}, no proximity index", min_width, height);
            return Ok(info);
        }

        let sweet_spots = compute_sweet_spots(
            info.grid.keys(),
            &correction,
            info.config.default_sweet_spot_radius,
            most_common_key_width,
            most_common_key_height,
        );
        let contract = ProximityContract::assemble(
            &info.grid,
            most_common_key_width,
            most_common_key_height,
            info.config.max_proximity_chars,
            sweet_spots,
        );

        info.native = decoder.and_then(|d| create_native(d, &contract));
        info.contract = Some(contract);
        Ok(info)
    }
}

/// Search radius in pixels, truncated toward zero.
fn search_threshold(most_common_key_width: i32, search_distance: f32) -> KpResult<i32> {
    let threshold = most_common_key_width as f32 * search_distance;
    if !threshold.is_finite() || threshold.abs() > MAX_COORDINATE as f32 {
        return Err(ProximityError::Validation(format!(
            "Search threshold {} px (key width {} x {}) is out of range",
            threshold, most_common_key_width, search_distance
        )));
    }
    Ok(threshold as i32)
}

/// Rejects geometry whose edges, widened by `threshold`, leave `±MAX_COORDINATE`.
fn check_extents(min_width: i32, height: i32, keys: &[KeyNode], threshold: i32) -> KpResult<()> {
    let limit = MAX_COORDINATE as i64;
    let in_range = |v: i64| (-limit..=limit).contains(&v);

    if !in_range(min_width as i64) || !in_range(height as i64) {
        return Err(ProximityError::Validation(format!(
            "Keyboard size {}x{} is out of range",
            min_width, height
        )));
    }

    let reach = (threshold as i64).abs();
    for key in keys {
        let (x, y) = (key.x as i64, key.y as i64);
        let (right, bottom) = (x + key.w as i64, y + key.h as i64);
        let hit_box_edges = key
            .hit_box
            .into_iter()
            .flat_map(|hb| [hb.left, hb.top, hb.right, hb.bottom].map(i64::from));
        let mut edges = [x - reach, y - reach, right + reach, bottom + reach]
            .into_iter()
            .chain(hit_box_edges);
        if !edges.all(in_range) {
            return Err(ProximityError::Validation(format!(
                "Key '{}' at ({}, {}) size {}x{} is out of range",
                key.id, key.x, key.y, key.w, key.h
            )));
        }
    }
    Ok(())
}

/// First key for each code, as positions in the key list. Code 0 means no
/// code and is never indexed.
fn index_codes(keys: &[KeyNode]) -> FnvHashMap<i32, u32> {
    let mut index = FnvHashMap::default();
    let unspecified = CommandCode::Unspecified.code();
    for (i, key) in keys.iter().enumerate().filter(|(_, k)| k.code != unspecified) {
        index.entry(key.code).or_insert(i as u32);
    }
    index
}

fn create_native<D: NativeDecoder>(decoder: D, contract: &ProximityContract) -> Option<NativeProximityInfo<D>> {
    match panic::catch_unwind(AssertUnwindSafe(move || NativeProximityInfo::create(decoder, contract))) {
        Ok(Ok(native)) => Some(native),
        Ok(Err(e)) => {
            error!("Native proximity info construction failed: {}", e);
            None
        }
        Err(_) => {
            error!("Native decoder panicked during construction");
            None
        }
    }
}
