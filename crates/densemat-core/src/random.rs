//! Gaussian draws for weight initialization

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Produces one independent standard normal draw per call
pub trait GaussianSource {
    fn next_gaussian(&mut self) -> f32;
}

impl<R: Rng + ?Sized> GaussianSource for R {
    #[inline]
    fn next_gaussian(&mut self) -> f32 {
        StandardNormal.sample(self)
    }
}
