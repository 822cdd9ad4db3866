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

//! Mergeable probabilistic and statistical primitives.
//!
//! This crate provides a [Bloom filter](bloom::BloomFilter) for set
//! membership testing and a family of samplable distributions (categorical,
//! empirical, uniform, and Gaussian), all built for partitioned data.
//!
//! # Lifecycle
//!
//! Distributions follow a two-phase lifecycle. A mutable *sketch*
//! accumulates observations; a `fit` call snapshots the sketch into an
//! immutable *distribution* that can be sampled and serialized but never
//! changed, while the sketch may keep accumulating. Sketches (and Bloom
//! filters) merge commutatively and
//! associatively, so observations can be split across workers in any way and
//! the combined result is identical to a single pass over the data.
//!
//! # Concurrency
//!
//! Nothing in the crate carries interior mutability. Mutable phases take
//! `&mut self`; frozen distributions are plain data, freely shared across
//! threads. Sampling borrows a [`common::random::RandomSource`] from the
//! caller, typically one generator per worker.
//!
//! # Serialization
//!
//! Every distribution serializes through [serde] with a `type` tag; the
//! [`json`] module decodes mixed collections by inspecting the tag.
//!
//! # Examples
//!
//! ```
//! use deltasketch::categorical::CategoricalSketch;
//! use deltasketch::common::random::XorShift64;
//!
//! // Two workers observe disjoint shards of the data.
//! let mut left: CategoricalSketch<_> = ["a", "b", "a"].into_iter().collect();
//! let right: CategoricalSketch<_> = ["b", "a"].into_iter().collect();
//! left.merge(right);
//!
//! let dist = left.fit().unwrap();
//! assert_eq!(dist.total(), 5);
//!
//! let mut rng = XorShift64::seeded(42);
//! assert!(["a", "b"].contains(dist.sample(&mut rng)));
//! ```

pub mod bloom;
pub mod categorical;
pub mod common;
pub mod continuous;
pub mod error;
pub mod hash;
pub mod json;
