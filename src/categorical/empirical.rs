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

use crate::categorical::CategoricalDistribution;
use crate::categorical::CategoricalSketch;
use crate::common::random::RandomSource;
use crate::error::Error;

/// A categorical distribution whose weights are observed occurrence counts.
///
/// Structurally this is just a [`CategoricalDistribution`]; the separate type
/// records provenance. An empirical distribution answers "sample like the
/// data did", whereas a general categorical distribution may carry weights
/// from any source.
///
/// # Examples
///
/// ```
/// use deltasketch::categorical::EmpiricalDistribution;
///
/// let dist = EmpiricalDistribution::fit(["rain", "sun", "sun", "sun"]).unwrap();
/// assert_eq!(dist.total(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmpiricalDistribution<T>(CategoricalDistribution<T>);

impl<T: Ord> EmpiricalDistribution<T> {
    /// Fits a distribution to raw observations, counting occurrences.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-state error if the iterator is empty.
    pub fn fit<I: IntoIterator<Item = T>>(items: I) -> Result<Self, Error>
    where
        T: Clone,
    {
        items.into_iter().collect::<CategoricalSketch<T>>().fit().map(Self)
    }
}

impl<T> EmpiricalDistribution<T> {
    /// Fits a distribution to pre-counted observations.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-state error if no category has a positive
    /// count.
    pub fn fit_from_counts<I>(counts: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        CategoricalDistribution::from_weights(counts).map(Self)
    }

    /// Draws a category with probability proportional to its observed count.
    pub fn sample<R: RandomSource>(&self, rng: &mut R) -> &T {
        self.0.sample(rng)
    }

    /// Enumerates `(category, count)` pairs in cumulative-offset order.
    pub fn categories(&self) -> impl Iterator<Item = (&T, u64)> {
        self.0.categories()
    }

    /// Number of distinct categories observed.
    pub fn size(&self) -> usize {
        self.0.size()
    }

    /// Total number of observations behind the distribution.
    pub fn total(&self) -> u64 {
        self.0.total()
    }

    /// Borrows the underlying categorical distribution.
    pub fn as_categorical(&self) -> &CategoricalDistribution<T> {
        &self.0
    }

    /// Unwraps into the underlying categorical distribution.
    pub fn into_categorical(self) -> CategoricalDistribution<T> {
        self.0
    }
}

impl<T> From<CategoricalDistribution<T>> for EmpiricalDistribution<T> {
    fn from(distribution: CategoricalDistribution<T>) -> Self {
        Self(distribution)
    }
}
