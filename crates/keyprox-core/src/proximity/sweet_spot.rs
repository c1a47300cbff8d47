use crate::correction::{CorrectionRow, TouchPositionCorrection};
use crate::geometry::KeyNode;
use crate::keycodes::{needs_proximity_info, printable_code};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweetSpot {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

/// Parallel sweet-spot arrays, one entry per indexable key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweetSpots {
    pub center_x: Vec<f32>,
    pub center_y: Vec<f32>,
    pub radius: Vec<f32>,
}

impl SweetSpots {
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<SweetSpot> {
        Some(SweetSpot {
            center_x: *self.center_x.get(i)?,
            center_y: *self.center_y.get(i)?,
            radius: *self.radius.get(i)?,
        })
    }

    fn push(&mut self, spot: SweetSpot) {
        self.center_x.push(spot.center_x);
        self.center_y.push(spot.center_y);
        self.radius.push(spot.radius);
    }
}

#[inline(always)]
fn hypot(w: i32, h: i32) -> f32 {
    (w as f64).hypot(h as f64) as f32
}

/// Radius used for keys outside the calibration table.
pub fn default_radius(radius_factor: f32, most_common_key_width: i32, most_common_key_height: i32) -> f32 {
    radius_factor * hypot(most_common_key_width, most_common_key_height)
}

/// Calibration row a key belongs to, from the top of its hit box. The division
/// truncates toward zero, so a top less than one key height above the keyboard
/// still lands in row 0.
#[inline(always)]
pub fn calibration_row(key: &KeyNode, most_common_key_height: i32) -> Option<usize> {
    if most_common_key_height <= 0 {
        return None;
    }
    usize::try_from(key.hit_box().top / most_common_key_height).ok()
}

/// Sweet spot for one key: the hit-box center, shifted and rescaled by the
/// key's calibration row when the table covers it.
pub fn compute_sweet_spot(key: &KeyNode, row: Option<&CorrectionRow>, default_radius: f32) -> SweetSpot {
    let hit_box = key.hit_box();
    let mut spot = SweetSpot {
        center_x: hit_box.exact_center_x(),
        center_y: hit_box.exact_center_y(),
        radius: default_radius,
    };

    if let Some(row) = row {
        let w = hit_box.width();
        let h = hit_box.height();
        spot.center_x += row.x_offset * w as f32;
        spot.center_y += row.y_offset * h as f32;
        spot.radius = row.radius_factor * hypot(w, h);
    }
    spot
}

/// Sweet spots for every key that `needs_proximity_info`, in key order.
/// `None` in uncorrected mode.
pub fn compute_sweet_spots(
    keys: &[KeyNode],
    correction: &TouchPositionCorrection,
    radius_factor: f32,
    most_common_key_width: i32,
    most_common_key_height: i32,
) -> Option<SweetSpots> {
    let TouchPositionCorrection::Calibrated(rows) = correction else {
        debug!("Touch position correction: OFF");
        return None;
    };
    debug!("Touch position correction: ON ({} rows)", rows.len());

    let default_radius = default_radius(radius_factor, most_common_key_width, most_common_key_height);
    let mut spots = SweetSpots::default();

    for key in keys.iter().filter(|k| needs_proximity_info(k)) {
        let row = calibration_row(key, most_common_key_height);
        let correction_row = row.and_then(|r| rows.get(r));
        let spot = compute_sweet_spot(key, correction_row, default_radius);
        trace!(
            "  [{:2}] row={:?} x/y/r={:7.2}/{:7.2}/{:5.2} {} code={}",
            spots.len(),
            row,
            spot.center_x,
            spot.center_y,
            spot.radius,
            if correction_row.is_some() { "correct" } else { "default" },
            printable_code(key.code)
        );
        spots.push(spot);
    }

    Some(spots)
}
