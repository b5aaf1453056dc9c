//! Injectable randomness for lane and page selection

use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::StdRng;

/// Source of the two random draws a tick can make
pub trait RandomSource {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `[0, bound)`; `bound` is at least 1
    fn next_index(&mut self, bound: usize) -> usize;
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn next_index(&mut self, bound: usize) -> usize {
        self.random_range(0..bound.max(1))
    }
}

/// Replays fixed draws, for tests and simulations that need exact outcomes.
///
/// When a queue runs dry it keeps returning `0.0` / `0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    units: VecDeque<f64>,
    indices: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue values for `next_unit`
    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(units);
        self
    }

    /// Queue values for `next_index`
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.0).clamp(0.0, 1.0 - f64::EPSILON)
    }

    fn next_index(&mut self, bound: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % bound.max(1)
    }
}
