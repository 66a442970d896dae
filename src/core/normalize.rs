/// Map a raw metric into [0, 1] given the observed population bounds
///
/// A degenerate population (`min >= max`) yields 0 for every input. Values
/// outside `[min, max]` are clamped to the boundary.
#[inline]
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn normalize(raw: f64, min: f64, max: f64) -> f64 {
    // also rejects NaN bounds
    if !(min < max) {
        return 0.0;
    }

    ((raw - min) / (max - min)).clamp(0.0, 1.0)
}

/// Running minimum and maximum over a population
///
/// Seeded from +inf / -inf so the first observation sets both bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Normalize `raw` against the observed bounds
    #[inline]
    pub fn normalize(&self, raw: f64) -> f64 {
        normalize(raw, self.min, self.max)
    }
}

impl Default for MinMax {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<f64> for MinMax {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut bounds = Self::new();
        for value in iter {
            bounds.observe(value);
        }
        bounds
    }
}
