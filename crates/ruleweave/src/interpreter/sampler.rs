//! Index sampling for choice rules.

use rand::Rng;

/// Picks an index in an inclusive range.
///
/// The grammar calls this once per choice rule expansion with
/// `low = 0` and `high = len - 1`. Implementations may ignore `rng`, which
/// makes scripted choices easy to write in tests.
pub trait RangeSampler<R: ?Sized> {
    fn sample(&mut self, rng: &mut R, low: usize, high: usize) -> usize;
}

/// Uniform sampling using the random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSampler;

impl<R: Rng + ?Sized> RangeSampler<R> for UniformSampler {
    fn sample(&mut self, rng: &mut R, low: usize, high: usize) -> usize {
        rng.gen_range(low..=high)
    }
}

impl<R: ?Sized, F: FnMut(usize, usize) -> usize> RangeSampler<R> for F {
    fn sample(&mut self, _rng: &mut R, low: usize, high: usize) -> usize {
        self(low, high)
    }
}
