use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper bound on `grid_width * grid_height`.
pub const MAX_GRID_CELLS: usize = 1 << 20;
/// Upper bound on the flattened table, `grid cells * max_proximity_chars`.
pub const MAX_PROXIMITY_TABLE_LEN: usize = 1 << 24;
/// Upper bound on `search_distance`, in most-common key widths.
pub const MAX_SEARCH_DISTANCE: f32 = 16.0;

/// Tunables shared between the proximity index and the native decoder.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Grid columns.
    #[arg(long, default_value_t = 32)]
    pub grid_width: i32,
    /// Grid rows.
    #[arg(long, default_value_t = 16)]
    pub grid_height: i32,
    /// Search radius, in most-common key widths.
    #[arg(long, default_value_t = 1.2)]
    pub search_distance: f32,
    /// Slots per cell in the flattened proximity table.
    #[arg(long, default_value_t = 16)]
    pub max_proximity_chars: usize,
    /// Default sweet-spot radius, as a fraction of the common key diagonal.
    #[arg(long, default_value_t = 0.15)]
    pub default_sweet_spot_radius: f32,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            grid_width: 32,
            grid_height: 16,
            search_distance: 1.2,
            max_proximity_chars: 16,
            default_sweet_spot_radius: 0.15,
        }
    }
}

impl ProximityConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read proximity config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse proximity config JSON: {}", e))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width <= 0 || self.grid_height <= 0 {
            return Err(format!(
                "Grid must have positive dimensions, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }
        let cells = self
            .grid_width
            .checked_mul(self.grid_height)
            .map(|c| c as usize)
            .filter(|&c| c <= MAX_GRID_CELLS)
            .ok_or_else(|| {
                format!(
                    "Grid {}x{} exceeds {} cells",
                    self.grid_width, self.grid_height, MAX_GRID_CELLS
                )
            })?;
        if self.max_proximity_chars == 0 {
            return Err("max_proximity_chars must be at least 1".to_string());
        }
        if cells
            .checked_mul(self.max_proximity_chars)
            .map_or(true, |len| len > MAX_PROXIMITY_TABLE_LEN)
        {
            return Err(format!(
                "Proximity table of {} cells x {} chars exceeds {} slots",
                cells, self.max_proximity_chars, MAX_PROXIMITY_TABLE_LEN
            ));
        }
        if !self.search_distance.is_finite()
            || !(0.0..=MAX_SEARCH_DISTANCE).contains(&self.search_distance)
        {
            return Err(format!(
                "Invalid search_distance: {} (expected 0..={})",
                self.search_distance, MAX_SEARCH_DISTANCE
            ));
        }
        if !self.default_sweet_spot_radius.is_finite() || self.default_sweet_spot_radius < 0.0 {
            return Err(format!(
                "Invalid default_sweet_spot_radius: {}",
                self.default_sweet_spot_radius
            ));
        }
        Ok(())
    }

    pub fn grid_size(&self) -> usize {
        self.grid_width.max(0) as usize * self.grid_height.max(0) as usize
    }

    pub fn merge_from_cli(&mut self, cli: &ProximityConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(grid_width, "grid_width");
        update_if_present!(grid_height, "grid_height");
        update_if_present!(search_distance, "search_distance");
        update_if_present!(max_proximity_chars, "max_proximity_chars");
        update_if_present!(default_sweet_spot_radius, "default_sweet_spot_radius");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let cfg = ProximityConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.grid_size(), 32 * 16);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let cfg = ProximityConfig {
            grid_width: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ProximityConfig {
            max_proximity_chars: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ProximityConfig {
            search_distance: f32::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[rstest]
    #[case::grid_product_overflows(100_000, 100_000, 1.2, 16)]
    #[case::too_many_cells(2048, 1024, 1.2, 16)]
    #[case::negative_height(32, -16, 1.2, 16)]
    #[case::table_too_long(1024, 1024, 1.2, 32)]
    #[case::table_len_overflows(32, 16, 1.2, usize::MAX)]
    #[case::huge_search_distance(32, 16, 1.0e9, 16)]
    #[case::infinite_search_distance(32, 16, f32::INFINITY, 16)]
    #[case::negative_search_distance(32, 16, -0.5, 16)]
    fn test_rejects_unbuildable(
        #[case] grid_width: i32,
        #[case] grid_height: i32,
        #[case] search_distance: f32,
        #[case] max_proximity_chars: usize,
    ) {
        let cfg = ProximityConfig {
            grid_width,
            grid_height,
            search_distance,
            max_proximity_chars,
            ..Default::default()
        };
        assert!(cfg.validate().is_err(), "{:?} should be rejected", cfg);
    }

    #[test]
    fn test_accepts_bounds() {
        let cfg = ProximityConfig {
            grid_width: 1024,
            grid_height: 1024,
            search_distance: MAX_SEARCH_DISTANCE,
            max_proximity_chars: 16,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.grid_size(), MAX_GRID_CELLS);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_width": 10, "grid_height": 4 }}"#).unwrap();

        let cfg = ProximityConfig::load_from_file(file.path()).unwrap();
        assert_eq!(cfg.grid_width, 10);
        assert_eq!(cfg.grid_height, 4);
        assert_eq!(cfg.max_proximity_chars, 16);
        assert_eq!(cfg.search_distance, 1.2);
    }

    #[test]
    fn test_missing_file() {
        let err = ProximityConfig::load_from_file("/definitely/not/here.json").unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
