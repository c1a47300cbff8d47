#![allow(dead_code)]

use keyprox_core::config::ProximityConfig;
use keyprox_core::geometry::{KeyNode, KeyboardGeometry, Rect};
use keyprox_core::{ProximityBuildParams, ProximityInfo};

/// Builder for KeyNode to keep test fixtures short.
pub struct KeyBuilder {
    node: KeyNode,
}

impl KeyBuilder {
    pub fn new(code: char) -> Self {
        Self::code(code as i32).id(&code.to_string())
    }

    pub fn code(code: i32) -> Self {
        Self {
            node: KeyNode {
                id: format!("k_{}", code),
                code,
                x: 0,
                y: 0,
                w: 100,
                h: 100,
                is_spacer: false,
                hit_box: None,
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.node.id = id.to_string();
        self
    }

    pub fn pos(mut self, x: i32, y: i32) -> Self {
        self.node.x = x;
        self.node.y = y;
        self
    }

    pub fn size(mut self, w: i32, h: i32) -> Self {
        self.node.w = w;
        self.node.h = h;
        self
    }

    pub fn spacer(mut self) -> Self {
        self.node.is_spacer = true;
        self
    }

    pub fn hit_box(mut self, left: i32, top: i32, right: i32, bottom: i32) -> Self {
        self.node.hit_box = Some(Rect::new(left, top, right, bottom));
        self
    }

    pub fn build(self) -> KeyNode {
        self.node
    }
}

pub fn create_geom(min_width: i32, height: i32, keys: Vec<KeyNode>) -> KeyboardGeometry {
    let mut geom = KeyboardGeometry {
        min_width,
        height,
        most_common_key_width: 0,
        most_common_key_height: 0,
        keys,
    };
    geom.calculate_common_key_size(0, 0);
    geom
}

pub fn grid_config(grid_width: i32, grid_height: i32) -> ProximityConfig {
    ProximityConfig {
        grid_width,
        grid_height,
        ..Default::default()
    }
}

/// Three rows of 100x100 keys: "qwertyuiop", "asdfghjkl", "zxcvbnm".
/// The second and third rows are indented by half a key.
pub fn qwerty_keys() -> Vec<KeyNode> {
    let rows = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];
    let mut keys = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        let indent = if r == 0 { 0 } else { 50 * r as i32 };
        for (c, ch) in row.chars().enumerate() {
            keys.push(KeyBuilder::new(ch).pos(indent + 100 * c as i32, 100 * r as i32).build());
        }
    }
    keys
}

pub fn qwerty_geom() -> KeyboardGeometry {
    create_geom(1000, 300, qwerty_keys())
}

pub fn build(geom: KeyboardGeometry, config: ProximityConfig) -> ProximityInfo {
    ProximityBuildParams::builder()
        .geometry(geom)
        .config(config)
        .build()
        .build()
        .expect("valid test config")
}
