// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::common::random::RandomSource;
use crate::error::Error;
use crate::error::ErrorKind;

/// Accumulator of real-valued observations for fitting a Gaussian.
///
/// The sketch keeps only the running sum, sum of squares, and count, which
/// is everything the fit needs. Merging adds the three fields, so
/// observations can be partitioned arbitrarily across sketches and the
/// fitted distribution is identical to a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaussianSketch {
    sum: f64,
    sum_of_squares: f64,
    count: u64,
}

impl GaussianSketch {
    /// Creates an empty sketch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconstitutes a sketch from previously exported moments.
    pub fn from_moments(sum: f64, sum_of_squares: f64, count: u64) -> Self {
        Self { sum, sum_of_squares, count }
    }

    /// Records one observation.
    pub fn observe(&mut self, value: f64) {
        self.sum += value;
        self.sum_of_squares += value * value;
        self.count += 1;
    }

    /// Adds the other sketch's observations into this one.
    pub fn merge(&mut self, other: &GaussianSketch) {
        self.sum += other.sum;
        self.sum_of_squares += other.sum_of_squares;
        self.count += other.count;
    }

    /// Running sum of observations.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Running sum of squared observations.
    pub fn sum_of_squares(&self) -> f64 {
        self.sum_of_squares
    }

    /// Number of observations recorded.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns true if no observations have been recorded.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fits a distribution with the sample mean and the population standard
    /// deviation. The fit is a snapshot; the sketch may keep accumulating.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-state error if fewer than two observations were
    /// recorded, or if the observations have no variance; neither determines
    /// a Gaussian.
    pub fn fit(&self) -> Result<GaussianDistribution, Error> {
        if self.count < 2 {
            return Err(
                Error::new(
                    ErrorKind::InvalidState,
                    "at least two observations are required to fit a gaussian",
                )
                .with_context("count", self.count),
            );
        }
        let count = self.count as f64;
        let mu = self.sum / count;
        // Population variance; floating point rounding can push it a hair
        // negative for constant inputs, which the <= 0 check also catches.
        let variance = self.sum_of_squares / count - mu * mu;
        if variance <= 0.0 {
            return Err(
                Error::new(
                    ErrorKind::InvalidState,
                    "observations have no variance",
                )
                .with_context("count", self.count)
                .with_context("mu", mu),
            );
        }
        GaussianDistribution::new(mu, variance.sqrt())
    }
}

impl Extend<f64> for GaussianSketch {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.observe(value);
        }
    }
}

impl FromIterator<f64> for GaussianSketch {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut sketch = Self::new();
        sketch.extend(iter);
        sketch
    }
}

/// A normal distribution with mean `mu` and standard deviation `sigma`.
///
/// Immutable and generator-free, like the discrete distributions; sampling
/// borrows a [`RandomSource`] and applies the Box-Muller transform.
///
/// # Examples
///
/// ```
/// use deltasketch::continuous::GaussianSketch;
///
/// let sketch: GaussianSketch = [1.0, 2.0, 3.0].into_iter().collect();
/// let dist = sketch.fit().unwrap();
/// assert!((dist.mu() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianDistribution {
    mu: f64,
    sigma: f64,
}

impl GaussianDistribution {
    /// Creates a distribution from explicit parameters.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-argument error unless `mu` is finite and
    /// `sigma` is finite and positive.
    pub fn new(mu: f64, sigma: f64) -> Result<Self, Error> {
        if !mu.is_finite() {
            return Err(
                Error::new(ErrorKind::InvalidArgument, "mu must be finite")
                    .with_context("mu", mu),
            );
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(
                Error::new(ErrorKind::InvalidArgument, "sigma must be finite and positive")
                    .with_context("sigma", sigma),
            );
        }
        Ok(Self { mu, sigma })
    }

    /// Fits a distribution to raw observations in one pass.
    ///
    /// # Errors
    ///
    /// Fails like [`GaussianSketch::fit`] on degenerate inputs.
    pub fn fit<I: IntoIterator<Item = f64>>(items: I) -> Result<Self, Error> {
        items.into_iter().collect::<GaussianSketch>().fit()
    }

    /// Draws a value from the distribution.
    pub fn sample<R: RandomSource>(&self, rng: &mut R) -> f64 {
        self.mu + self.sigma * rng.next_gaussian()
    }

    /// The mean.
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// The standard deviation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}
