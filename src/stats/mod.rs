//! Running statistics over repeated counter snapshots.


/// Online mean and variance, Welford's method.
///
/// Numerically stable where the naive sum-of-squares form cancels
/// catastrophically, and needs no sample history.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunningStats {
    count: f64,
    mean: f64,
    sum_sq_dev: f64,
}

impl RunningStats {
    /// Folds one sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        self.count += 1.0;
        let delta = value - self.mean;
        self.mean += delta / self.count;
        self.sum_sq_dev += delta * (value - self.mean);
    }

    /// Running mean, zero before the first sample.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Number of folded samples.
    pub fn count(&self) -> u64 {
        self.count as u64
    }

    /// Sample variance, zero until two samples exist.
    pub fn variance(&self) -> f64 {
        if self.count < 2.0 {
            0.0
        } else {
            self.sum_sq_dev / (self.count - 1.0)
        }
    }
}
