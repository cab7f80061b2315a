//! Height bands owned by each input.

use serde::Serialize;

/// Half-open height intervals, one per input, built from sorted splits.
///
/// Band 0 is `[0, s0)`, band i is `[s(i-1), s(i))` and the last band is
/// open upwards. A height equal to a split belongs to the upper band.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    splits: Vec<f64>,
}

/// Bounds of one band, `upper` is `None` when unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub index: usize,
    pub lower: f64,
    pub upper: Option<f64>,
}

impl Bands {
    pub fn from_splits(mut splits: Vec<f64>) -> Self {
        splits.sort_by(f64::total_cmp);
        Self { splits }
    }

    /// Number of bands (one more than the number of splits).
    pub fn len(&self) -> usize {
        self.splits.len() + 1
    }

    pub fn splits(&self) -> &[f64] {
        &self.splits
    }

    /// `(lower, upper)` of band `index`, which must be below [`Bands::len`].
    pub fn bounds(&self, index: usize) -> (f64, f64) {
        debug_assert!(index < self.len(), "band {} of {}", index, self.len());
        let lower = match index {
            0 => 0.0,
            i => self.splits[i - 1],
        };
        let upper = self.splits.get(index).copied().unwrap_or(f64::INFINITY);
        (lower, upper)
    }

    /// True when `height` falls into band `index`.
    pub fn contains(&self, index: usize, height: f64) -> bool {
        let (lower, upper) = self.bounds(index);
        lower <= height && height < upper
    }

    pub fn iter(&self) -> impl Iterator<Item = Band> + '_ {
        (0..self.len()).map(|index| {
            let (lower, upper) = self.bounds(index);
            Band {
                index,
                lower,
                upper: upper.is_finite().then_some(upper),
            }
        })
    }
}
