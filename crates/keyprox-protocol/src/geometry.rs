use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeyboardMeta {
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardDefinition {
    #[serde(default)]
    pub meta: KeyboardMeta,
    pub geometry: KeyboardGeometry,
    /// Flat `x, y, radius` triples, one triple per keyboard row.
    #[serde(default)]
    pub touch_position_correction: Vec<f32>,
}

/// Pixel rectangle. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn exact_center_x(&self) -> f32 {
        (self.left + self.right) as f32 * 0.5
    }

    pub fn exact_center_y(&self) -> f32 {
        (self.top + self.bottom) as f32 * 0.5
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && x >= self.left
            && x < self.right
            && y >= self.top
            && y < self.bottom
    }
}

/// A laid-out key. Geometry is in pixels, `(x, y)` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyNode {
    #[serde(default)]
    pub id: String,
    pub code: i32,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,

    #[serde(default)]
    pub is_spacer: bool,

    /// Touch-sensitive area. Falls back to the key rectangle, one pixel wider,
    /// when absent.
    #[serde(default)]
    pub hit_box: Option<Rect>,
}

impl KeyNode {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }

    pub fn hit_box(&self) -> Rect {
        self.hit_box
            .unwrap_or_else(|| Rect::new(self.x, self.y, self.x + self.w + 1, self.y + self.h))
    }

    /// Squared distance from `(x, y)` to the nearest edge of the key; zero inside.
    #[inline(always)]
    pub fn squared_distance_to_edge(&self, x: i32, y: i32) -> i64 {
        let left = self.x;
        let right = left + self.w;
        let top = self.y;
        let bottom = top + self.h;
        let edge_x = if x < left { left } else { x.min(right) };
        let edge_y = if y < top { top } else { y.min(bottom) };
        let dx = (x - edge_x) as i64;
        let dy = (y - edge_y) as i64;
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyboardGeometry {
    pub min_width: i32,
    pub height: i32,
    pub most_common_key_width: i32,
    pub most_common_key_height: i32,
    /// Keys sorted top-left to bottom-right. Order is significant downstream.
    pub keys: Vec<KeyNode>,
}

impl KeyboardGeometry {
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_degenerate(&self) -> bool {
        self.min_width <= 0 || self.height <= 0
    }

    /// Recomputes the most common key size from the keys, gaps included.
    pub fn calculate_common_key_size(&mut self, horizontal_gap: i32, vertical_gap: i32) {
        let (w, h) = common_key_dimensions(&self.keys, horizontal_gap, vertical_gap);
        self.most_common_key_width = w;
        self.most_common_key_height = h;
    }
}

/// Modal `(width + horizontal_gap, height + vertical_gap)` over `keys`.
///
/// A size only takes over when its count strictly exceeds the current best, so
/// the earliest key wins a tie.
pub fn common_key_dimensions(keys: &[KeyNode], horizontal_gap: i32, vertical_gap: i32) -> (i32, i32) {
    let mut width_histogram: HashMap<i32, usize> = HashMap::new();
    let mut height_histogram: HashMap<i32, usize> = HashMap::new();
    let (mut best_width, mut max_width_count) = (0, 0);
    let (mut best_height, mut max_height_count) = (0, 0);

    for key in keys {
        let height = key.h + vertical_gap;
        let count = bump(&mut height_histogram, height);
        if count > max_height_count {
            max_height_count = count;
            best_height = height;
        }

        let width = key.w + horizontal_gap;
        let count = bump(&mut width_histogram, width);
        if count > max_width_count {
            max_width_count = count;
            best_width = width;
        }
    }

    (best_width, best_height)
}

fn bump(histogram: &mut HashMap<i32, usize>, value: i32) -> usize {
    let count = histogram.entry(value).or_insert(0);
    *count += 1;
    *count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(x: i32, y: i32, w: i32, h: i32) -> KeyNode {
        KeyNode {
            id: String::new(),
            code: 'a' as i32,
            x,
            y,
            w,
            h,
            is_spacer: false,
            hit_box: None,
        }
    }

    #[test]
    fn test_distance_to_edge_inside_is_zero() {
        let k = key(50, 50, 100, 100);
        assert_eq!(k.squared_distance_to_edge(100, 100), 0);
        assert_eq!(k.squared_distance_to_edge(150, 150), 0);
    }

    #[test]
    fn test_distance_to_edge_outside() {
        let k = key(50, 50, 100, 100);
        // 10 px left of the left edge
        assert_eq!(k.squared_distance_to_edge(40, 100), 100);
        // diagonal off the bottom-right corner: (3, 4)
        assert_eq!(k.squared_distance_to_edge(153, 154), 25);
        assert_eq!(k.squared_distance_to_edge(500, 500), 350 * 350 * 2);
    }

    #[test]
    fn test_hit_box_defaults_to_widened_key_rect() {
        let mut k = key(10, 20, 30, 40);
        assert_eq!(k.rect(), Rect::new(10, 20, 40, 60));
        assert_eq!(k.hit_box(), Rect::new(10, 20, 41, 60));
        assert_eq!(k.hit_box().width(), 31);
        assert_eq!(k.hit_box().exact_center_x(), 25.5);
        assert!(k.hit_box().contains(40, 20));
        k.hit_box = Some(Rect::new(0, 0, 50, 70));
        assert_eq!(k.hit_box().width(), 50);
        assert_eq!(k.hit_box().exact_center_y(), 35.0);
        assert!(k.hit_box().contains(49, 69));
        assert!(!k.hit_box().contains(50, 69));
    }

    #[test]
    fn test_common_key_dimensions() {
        let keys = vec![
            key(0, 0, 90, 100),
            key(100, 0, 90, 100),
            key(200, 0, 190, 120),
            key(0, 120, 190, 120),
        ];
        // widths: 100 x2, 200 x2 -> first to reach 2 wins
        assert_eq!(common_key_dimensions(&keys, 10, 0), (100, 100));
        assert_eq!(common_key_dimensions(&[], 10, 10), (0, 0));
    }

    #[test]
    fn test_definition_json() {
        let json = r#"{
            "meta": { "name": "mini" },
            "geometry": {
                "min_width": 200, "height": 100,
                "most_common_key_width": 100, "most_common_key_height": 100,
                "keys": [ { "code": 97, "x": 0, "y": 0, "w": 100, "h": 100 } ]
            }
        }"#;
        let def: KeyboardDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.meta.name, "mini");
        assert_eq!(def.geometry.key_count(), 1);
        assert!(!def.geometry.keys[0].is_spacer);
        assert!(def.touch_position_correction.is_empty());
    }
}
