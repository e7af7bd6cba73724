//! Injectable source of random choices.
//!
//! Collapsing picks a random neighbor at every merge. Taking the choice
//! through this trait lets tests script exact merge sequences while the
//! WASM exports plug in a seeded or entropy-backed [`rand`] generator.

use rand::Rng;

/// Supplies uniform indices.
pub trait RandomSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng> RandomSource for R {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}
