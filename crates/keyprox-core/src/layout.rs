use crate::geometry::KeyNode;
use crate::keycodes::needs_proximity_info;
use serde::{Deserialize, Serialize};

/// Per-key arrays the gesture decoder works from. Covers the keys that need
/// proximity info, minus the comma key. Codes are lower-cased.
///
/// Widths and heights exclude the gaps between keys; the most common key size
/// includes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyboardLayout {
    pub codes: Vec<i32>,
    pub x: Vec<i32>,
    pub y: Vec<i32>,
    pub widths: Vec<i32>,
    pub heights: Vec<i32>,
    pub most_common_key_width: i32,
    pub most_common_key_height: i32,
    pub keyboard_width: i32,
    pub keyboard_height: i32,
}

impl KeyboardLayout {
    pub fn new(
        keys: &[KeyNode],
        most_common_key_width: i32,
        most_common_key_height: i32,
        keyboard_width: i32,
        keyboard_height: i32,
    ) -> Self {
        let mut layout = Self {
            most_common_key_width,
            most_common_key_height,
            keyboard_width,
            keyboard_height,
            ..Default::default()
        };

        for key in keys
            .iter()
            .filter(|k| needs_proximity_info(k) && k.code != ',' as i32)
        {
            layout.codes.push(to_lower_code(key.code));
            layout.x.push(key.x);
            layout.y.push(key.y);
            layout.widths.push(key.w);
            layout.heights.push(key.h);
        }
        layout
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Single-char lower case of `code`. Codes that are not scalar values, or whose
/// lower case expands to several chars, are kept as they are.
fn to_lower_code(code: i32) -> i32 {
    let Some(c) = u32::try_from(code).ok().and_then(char::from_u32) else {
        return code;
    };
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l as i32,
        _ => code,
    }
}
