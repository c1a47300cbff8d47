use super::grid::ProximityGrid;
use super::sweet_spot::SweetSpots;
use crate::consts::{CONTRACT_VERSION, NOT_A_CODE};
use crate::keycodes::{needs_proximity_info, printable_code};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{enabled, trace, Level};

/// Fixed-shape arrays handed to the native decoder.
///
/// Every per-key array has one entry per key that `needs_proximity_info`, in
/// original key order. `proximity_chars` holds `max_proximity_chars` slots per
/// grid cell, padded with `NOT_A_CODE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityContract {
    pub version: u32,
    pub display_width: i32,
    pub display_height: i32,
    pub grid_width: i32,
    pub grid_height: i32,
    pub most_common_key_width: i32,
    pub most_common_key_height: i32,
    pub max_proximity_chars: usize,
    pub proximity_chars: Vec<i32>,
    pub key_x: Vec<i32>,
    pub key_y: Vec<i32>,
    pub key_widths: Vec<i32>,
    pub key_heights: Vec<i32>,
    pub key_char_codes: Vec<i32>,
    pub sweet_spots: Option<SweetSpots>,
}

impl ProximityContract {
    pub fn assemble(
        grid: &ProximityGrid,
        most_common_key_width: i32,
        most_common_key_height: i32,
        max_proximity_chars: usize,
        sweet_spots: Option<SweetSpots>,
    ) -> Self {
        let params = grid.params();
        let proximity_chars = flatten_proximity_chars(grid, max_proximity_chars);

        let indexed: Vec<_> = grid.keys().iter().filter(|k| needs_proximity_info(k)).collect();
        let contract = Self {
            version: CONTRACT_VERSION,
            display_width: params.keyboard_min_width,
            display_height: params.keyboard_height,
            grid_width: params.grid_width,
            grid_height: params.grid_height,
            most_common_key_width,
            most_common_key_height,
            max_proximity_chars,
            proximity_chars,
            key_x: indexed.iter().map(|k| k.x).collect(),
            key_y: indexed.iter().map(|k| k.y).collect(),
            key_widths: indexed.iter().map(|k| k.w).collect(),
            key_heights: indexed.iter().map(|k| k.h).collect(),
            key_char_codes: indexed.iter().map(|k| k.code).collect(),
            sweet_spots,
        };

        if enabled!(Level::TRACE) {
            for cell in 0..contract.grid_size() {
                trace!(
                    "proximityChars[{}]: {}",
                    cell,
                    contract.cell_codes(cell).iter().map(|&c| printable_code(c)).join(" ")
                );
            }
        }
        contract
    }

    pub fn key_count(&self) -> usize {
        self.key_char_codes.len()
    }

    pub fn grid_size(&self) -> usize {
        (self.grid_width * self.grid_height) as usize
    }

    /// Codes stored for `cell`, up to the first `NOT_A_CODE`.
    pub fn cell_codes(&self, cell: usize) -> &[i32] {
        let start = cell * self.max_proximity_chars;
        let Some(slots) = self.proximity_chars.get(start..start + self.max_proximity_chars) else {
            return &[];
        };
        let len = slots.iter().position(|&c| c == NOT_A_CODE).unwrap_or(slots.len());
        &slots[..len]
    }

    pub fn has_sweet_spots(&self) -> bool {
        self.sweet_spots.is_some()
    }
}

/// One row of `max_proximity_chars` codes per cell, in frozen neighbor order.
/// Keys that do not need proximity info are skipped; overflow is dropped.
pub fn flatten_proximity_chars(grid: &ProximityGrid, max_proximity_chars: usize) -> Vec<i32> {
    let grid_size = grid.params().grid_size();
    let keys = grid.keys();
    let mut table = vec![NOT_A_CODE; grid_size * max_proximity_chars];

    for (cell, row) in table.chunks_exact_mut(max_proximity_chars).enumerate() {
        let codes = grid
            .cell_neighbors(cell)
            .iter()
            .map(|&k| &keys[k as usize])
            .filter(|k| needs_proximity_info(k))
            .map(|k| k.code);
        for (slot, code) in row.iter_mut().zip(codes) {
            *slot = code;
        }
    }
    table
}
