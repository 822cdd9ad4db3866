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

use std::collections::BTreeSet;

use crate::common::random::RandomSource;
use crate::error::Error;
use crate::error::ErrorKind;

/// Accumulator of distinct values for a uniform distribution.
///
/// Duplicates collapse: a value observed once and a value observed a
/// thousand times end up equally likely. Merging is set union, so values can
/// be partitioned arbitrarily across sketches without changing the fitted
/// distribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniformSketch<T: Ord> {
    values: BTreeSet<T>,
}

impl<T: Ord> UniformSketch<T> {
    /// Creates an empty sketch.
    pub fn new() -> Self {
        Self { values: BTreeSet::new() }
    }

    /// Records a value. Observing an already-known value changes nothing.
    pub fn observe(&mut self, value: T) {
        self.values.insert(value);
    }

    /// Unions the other sketch's values into this one.
    pub fn merge(&mut self, other: UniformSketch<T>) {
        self.values.extend(other.values);
    }

    /// Returns true if no values have been observed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct values observed.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Iterates the distinct values observed so far, in ascending order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// Fits a distribution to the values observed so far.
    ///
    /// The fit is a snapshot: the sketch is unchanged and may keep
    /// accumulating afterwards.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-state error if the sketch is empty.
    pub fn fit(&self) -> Result<UniformDistribution<T>, Error>
    where
        T: Clone,
    {
        if self.values.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidState,
                "cannot fit a distribution to an empty sketch",
            ));
        }
        Ok(UniformDistribution { values: self.values.iter().cloned().collect() })
    }
}

impl<T: Ord> Extend<T> for UniformSketch<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

impl<T: Ord> FromIterator<T> for UniformSketch<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

/// A uniform distribution over a fixed set of distinct values.
///
/// Sampling is one bounded uniform draw and an index, `O(1)`. Values are held
/// sorted, so two distributions over the same set compare equal regardless of
/// the order values were observed in.
///
/// # Examples
///
/// ```
/// use deltasketch::categorical::UniformDistribution;
/// use deltasketch::common::random::XorShift64;
///
/// let dist = UniformDistribution::fit(["c", "a", "b", "a"]).unwrap();
/// assert_eq!(dist.size(), 3);
///
/// let mut rng = XorShift64::seeded(5);
/// assert!(["a", "b", "c"].contains(dist.sample(&mut rng)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformDistribution<T> {
    /// Distinct values in ascending order.
    values: Vec<T>,
}

impl<T: Ord> UniformDistribution<T> {
    /// Fits a distribution to raw observations, collapsing duplicates.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-state error if the iterator is empty.
    pub fn fit<I: IntoIterator<Item = T>>(items: I) -> Result<Self, Error> {
        let sketch: UniformSketch<T> = items.into_iter().collect();
        if sketch.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidState,
                "cannot fit a distribution to an empty sketch",
            ));
        }
        Ok(Self { values: sketch.values.into_iter().collect() })
    }
}

impl<T> UniformDistribution<T> {
    /// Builds a distribution directly from values the caller has already
    /// made distinct. Used where no usable ordering exists on `T`; such
    /// distributions keep the caller's value order.
    pub(crate) fn from_distinct_values(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Draws one of the values, each equally likely.
    pub fn sample<R: RandomSource>(&self, rng: &mut R) -> &T {
        &self.values[rng.next_u64_below(self.values.len() as u64) as usize]
    }

    /// The distinct values, in ascending order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of distinct values.
    pub fn size(&self) -> usize {
        self.values.len()
    }
}
