use crate::geometry::KeyNode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Uniform partition of the keyboard rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridParams {
    pub grid_width: i32,
    pub grid_height: i32,
    pub cell_width: i32,
    pub cell_height: i32,
    pub keyboard_min_width: i32,
    pub keyboard_height: i32,
}

impl GridParams {
    /// `grid_width` and `grid_height` must be positive (checked by config validation).
    pub fn new(grid_width: i32, grid_height: i32, min_width: i32, height: i32) -> Self {
        Self {
            grid_width,
            grid_height,
            cell_width: div_ceil(min_width.max(0), grid_width),
            cell_height: div_ceil(height.max(0), grid_height),
            keyboard_min_width: min_width,
            keyboard_height: height,
        }
    }

    #[inline(always)]
    pub fn grid_size(&self) -> usize {
        self.grid_width.max(0) as usize * self.grid_height.max(0) as usize
    }

    pub fn is_degenerate(&self) -> bool {
        self.keyboard_min_width <= 0 || self.keyboard_height <= 0
    }

    /// Cell containing pixel `(x, y)`, or `None` outside `[0, width) x [0, height)`.
    #[inline(always)]
    pub fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.keyboard_min_width || y < 0 || y >= self.keyboard_height {
            return None;
        }
        let index = ((y / self.cell_height) * self.grid_width + (x / self.cell_width)) as usize;
        (index < self.grid_size()).then_some(index)
    }

    /// Pixel the build step tests for `cell`.
    pub fn cell_center(&self, cell: usize) -> (i32, i32) {
        let col = cell as i32 % self.grid_width;
        let row = cell as i32 / self.grid_width;
        (
            col * self.cell_width + self.cell_width / 2,
            row * self.cell_height + self.cell_height / 2,
        )
    }
}

#[inline(always)]
fn div_ceil(value: i32, divisor: i32) -> i32 {
    value / divisor + i32::from(value % divisor != 0)
}

/// Frozen neighbor lists for every grid cell.
///
/// Keys live in a single arena; cell `i` owns `neighbors[cell_starts[i]..cell_starts[i + 1]]`,
/// a run of arena indices in input key order.
#[derive(Debug, Clone)]
pub struct ProximityGrid {
    params: GridParams,
    threshold: i32,
    keys: Vec<KeyNode>,
    cell_starts: Vec<u32>,
    neighbors: Vec<u32>,
}

impl ProximityGrid {
    /// Indexes `keys` against a `params` grid. A key is a neighbor of a cell when
    /// the cell's center lies strictly within `threshold` of the key's edge.
    pub fn build(params: GridParams, keys: Vec<KeyNode>, threshold: i32) -> Self {
        let grid_size = params.grid_size();

        if params.is_degenerate() {
            debug!("Degenerate keyboard, proximity grid left empty");
            return Self {
                params,
                threshold,
                keys,
                cell_starts: vec![0; grid_size + 1],
                neighbors: Vec::new(),
            };
        }

        let (hits, counts) = collect_hits(&params, &keys, threshold);

        // Counting sort by cell. Hits arrive in key order, so each run stays in key order.
        let mut cell_starts = vec![0u32; grid_size + 1];
        let mut offset = 0u32;
        for (i, &count) in counts.iter().enumerate() {
            cell_starts[i] = offset;
            offset += count;
        }
        cell_starts[grid_size] = offset;

        let mut cursor: Vec<u32> = cell_starts[..grid_size].to_vec();
        let mut neighbors = vec![0u32; hits.len()];
        for (cell, key_index) in hits {
            let slot = &mut cursor[cell as usize];
            neighbors[*slot as usize] = key_index;
            *slot += 1;
        }

        debug!(
            "Proximity grid {}x{} (cells {}x{} px), threshold {} px, {} keys, {} neighbor entries",
            params.grid_width,
            params.grid_height,
            params.cell_width,
            params.cell_height,
            threshold,
            keys.len(),
            neighbors.len()
        );

        Self {
            params,
            threshold,
            keys,
            cell_starts,
            neighbors,
        }
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    pub fn keys(&self) -> &[KeyNode] {
        &self.keys
    }

    /// Arena indices of `cell`'s neighbors. Empty for an out-of-range cell.
    #[inline(always)]
    pub fn cell_neighbors(&self, cell: usize) -> &[u32] {
        if cell >= self.params.grid_size() {
            return &[];
        }
        let start = self.cell_starts[cell] as usize;
        let end = self.cell_starts[cell + 1] as usize;
        &self.neighbors[start..end]
    }

    pub fn total_neighbors(&self) -> usize {
        self.neighbors.len()
    }
}

/// Walks each key's threshold window over cell centers, returning `(cell, key)`
/// hits in key order and the per-cell hit count.
fn collect_hits(params: &GridParams, keys: &[KeyNode], threshold: i32) -> (Vec<(u32, u32)>, Vec<u32>) {
    let GridParams {
        grid_width,
        cell_width,
        cell_height,
        ..
    } = *params;
    let threshold_squared = threshold as i64 * threshold as i64;

    // The grid is rounded up, so it may extend past the keyboard.
    let last_pixel_x = params.grid_width * cell_width - 1;
    let last_pixel_y = params.grid_height * cell_height - 1;
    let half_cell_width = cell_width / 2;
    let half_cell_height = cell_height / 2;

    let mut hits = Vec::new();
    let mut counts = vec![0u32; params.grid_size()];

    for (key_index, key) in keys.iter().enumerate() {
        if key.is_spacer {
            continue;
        }

        let y_start = first_center_at_or_after(key.y - threshold, cell_height, half_cell_height);
        let y_end = last_pixel_y.min(key.y + key.h + threshold);
        let x_start = first_center_at_or_after(key.x - threshold, cell_width, half_cell_width);
        let x_end = last_pixel_x.min(key.x + key.w + threshold);

        let mut row_base = (y_start / cell_height) * grid_width + (x_start / cell_width);
        let mut center_y = y_start;
        while center_y <= y_end {
            let mut index = row_base;
            let mut center_x = x_start;
            while center_x <= x_end {
                if key.squared_distance_to_edge(center_x, center_y) < threshold_squared {
                    hits.push((index as u32, key_index as u32));
                    counts[index as usize] += 1;
                }
                index += 1;
                center_x += cell_width;
            }
            row_base += grid_width;
            center_y += cell_height;
        }
    }

    (hits, counts)
}

/// Snaps `pixel` forward to the nearest cell center at or after it, never
/// before the first center. `%` truncates toward zero, so a pixel left of or
/// above the keyboard still lands on the first center.
#[inline(always)]
fn first_center_at_or_after(pixel: i32, cell_size: i32, half_cell: i32) -> i32 {
    let delta_to_grid = pixel % cell_size;
    let middle_of_cell = pixel - delta_to_grid + half_cell;
    let snapped = if delta_to_grid <= half_cell {
        middle_of_cell
    } else {
        middle_of_cell + cell_size
    };
    half_cell.max(snapped)
}
