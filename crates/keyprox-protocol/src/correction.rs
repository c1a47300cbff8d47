use serde::{Deserialize, Serialize};
use tracing::warn;

/// Values per calibration row: x offset, y offset, radius factor.
pub const CORRECTION_RECORD_SIZE: usize = 3;

/// Per-row touch bias, as fractions of the key's hit box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionRow {
    pub x_offset: f32,
    pub y_offset: f32,
    pub radius_factor: f32,
}

/// Row-indexed calibration table for sweet-spot computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum TouchPositionCorrection {
    #[default]
    Uncorrected,
    Calibrated(Vec<CorrectionRow>),
}

impl TouchPositionCorrection {
    /// Builds the table from flat `x, y, radius` triples.
    ///
    /// An empty slice, or one whose length is not a multiple of three, yields
    /// `Uncorrected`.
    pub fn from_flat(data: &[f32]) -> Self {
        if data.is_empty() || data.len() % CORRECTION_RECORD_SIZE != 0 {
            if !data.is_empty() {
                warn!(
                    "Touch position correction has {} values, not a multiple of {}. Ignoring.",
                    data.len(),
                    CORRECTION_RECORD_SIZE
                );
            }
            return Self::Uncorrected;
        }

        let rows = data
            .chunks_exact(CORRECTION_RECORD_SIZE)
            .map(|c| CorrectionRow {
                x_offset: c[0],
                y_offset: c[1],
                radius_factor: c[2],
            })
            .collect();
        Self::Calibrated(rows)
    }

    /// Parses string resources (as shipped with a keyboard theme).
    pub fn parse(tokens: &[&str]) -> Self {
        let mut values = Vec::with_capacity(tokens.len());
        for token in tokens {
            match token.trim().parse::<f32>() {
                Ok(v) => values.push(v),
                Err(e) => {
                    warn!("Invalid touch position correction value '{}': {}", token, e);
                    return Self::Uncorrected;
                }
            }
        }
        Self::from_flat(&values)
    }

    pub fn is_calibrated(&self) -> bool {
        matches!(self, Self::Calibrated(_))
    }

    pub fn rows(&self) -> usize {
        match self {
            Self::Uncorrected => 0,
            Self::Calibrated(rows) => rows.len(),
        }
    }

    pub fn row(&self, index: usize) -> Option<&CorrectionRow> {
        match self {
            Self::Uncorrected => None,
            Self::Calibrated(rows) => rows.get(index),
        }
    }
}
