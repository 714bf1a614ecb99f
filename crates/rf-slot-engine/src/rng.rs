//! Random symbol generation
//!
//! Every draw takes the random source as an argument. Nothing here owns a
//! generator, so a seeded [`SpinRng`] reproduces a spin exactly.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::{ConfigError, ConfigResult};
use crate::symbols::{ReelStrip, SymbolId};

/// Seedable random source used by tests and the simulator
pub type SpinRng = ChaCha8Rng;

/// Create a deterministic random source
pub fn seeded(seed: u64) -> SpinRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Strip-indexed draw: uniform index into the strip.
///
/// The strip's composition carries the weighting.
pub fn draw_from_strip<R: Rng + ?Sized>(strip: &ReelStrip, rng: &mut R) -> SymbolId {
    strip.symbol_at(rng.random_range(0..strip.len()))
}

/// Cumulative-weight selection table
#[derive(Debug, Clone)]
pub struct WeightTable<T> {
    items: Vec<T>,
    cumulative: Vec<f64>,
    total: f64,
    /// Index of the last entry with positive weight
    last_positive: usize,
}

impl<T> WeightTable<T> {
    /// Build a table from `(item, weight)` pairs.
    ///
    /// `name` identifies the table in error messages.
    pub fn new(name: &str, entries: impl IntoIterator<Item = (T, f64)>) -> ConfigResult<Self> {
        let mut items = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0.0;
        let mut last_positive = None;

        for (item, weight) in entries {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "{name}: weight {weight} must be finite and non-negative"
                )));
            }
            if weight > 0.0 {
                last_positive = Some(items.len());
            }
            total += weight;
            items.push(item);
            cumulative.push(total);
        }

        let last_positive =
            last_positive.ok_or_else(|| ConfigError::ZeroWeightSum(name.to_string()))?;

        Ok(Self {
            items,
            cumulative,
            total,
            last_positive,
        })
    }

    /// Draw one entry
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.items[self.draw_index(rng)]
    }

    /// Draw the index of one entry
    pub fn draw_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let roll = rng.random::<f64>() * self.total;
        let idx = self.cumulative.partition_point(|&c| c <= roll);
        // Float rounding can push the roll onto the total
        idx.min(self.last_positive)
    }

    /// Probability of drawing the entry at `idx`
    pub fn probability(&self, idx: usize) -> f64 {
        let prev = if idx == 0 { 0.0 } else { self.cumulative[idx - 1] };
        (self.cumulative[idx] - prev) / self.total
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
