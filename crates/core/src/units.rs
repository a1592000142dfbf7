//! DrawingML length units.
//!
//! Every position and size in a PPTX package is an integer count of
//! English Metric Units (EMU). Font sizes and paragraph spacing use
//! hundredths of a point instead.

use serde::{Deserialize, Serialize};

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMU per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

/// A length in English Metric Units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Length(i64);

impl Length {
    /// Length from a raw EMU count.
    pub const fn from_emu(emu: i64) -> Self {
        Self(emu)
    }

    /// Length from inches, rounded to the nearest EMU.
    pub fn inches(value: f64) -> Self {
        Self((value * EMU_PER_INCH as f64).round() as i64)
    }

    /// Length from points, rounded to the nearest EMU.
    pub fn pt(value: f64) -> Self {
        Self((value * EMU_PER_POINT as f64).round() as i64)
    }

    /// Raw EMU count.
    pub const fn emu(self) -> i64 {
        self.0
    }

    /// Hundredths of a point, as used by `sz` and `spcPts`.
    pub const fn centipoints(self) -> i64 {
        self.0 / 127
    }
}
