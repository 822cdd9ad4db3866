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

//! Discrete distributions over categories.
//!
//! Three flavours share one lifecycle: observations accumulate in a mutable
//! sketch, a `fit` call snapshots the sketch into an immutable distribution,
//! and the distribution samples. [`CategoricalDistribution`] weights each
//! category explicitly; [`EmpiricalDistribution`] derives the weights from
//! observed occurrence counts; [`UniformDistribution`] collapses duplicates
//! and weighs every distinct value equally.

mod distribution;
mod empirical;
mod serialization;
mod sketch;
mod uniform;

pub use self::distribution::CategoricalDistribution;
pub use self::empirical::EmpiricalDistribution;
pub use self::sketch::CategoricalSketch;
pub use self::uniform::UniformDistribution;
pub use self::uniform::UniformSketch;

pub(crate) use self::serialization::CATEGORICAL_TAG;
pub(crate) use self::serialization::EMPIRICAL_TAG;
pub(crate) use self::serialization::UNIFORM_TAG;
