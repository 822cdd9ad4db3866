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

use deltasketch::categorical::CategoricalDistribution;
use deltasketch::categorical::CategoricalSketch;
use deltasketch::categorical::EmpiricalDistribution;
use deltasketch::categorical::UniformDistribution;
use deltasketch::common::random::XorShift64;
use deltasketch::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::contains_substring;

#[test]
fn test_sampling_frequencies_track_weights() {
    let dist = CategoricalDistribution::from_weights([("rare", 1), ("common", 3)]).unwrap();
    let mut rng = XorShift64::seeded(101);

    let draws = 100_000;
    let mut common = 0u32;
    for _ in 0..draws {
        if *dist.sample(&mut rng) == "common" {
            common += 1;
        }
    }
    let fraction = common as f64 / draws as f64;
    assert!(
        (0.72..=0.78).contains(&fraction),
        "common drawn with fraction {fraction}, expected near 0.75"
    );
}

#[test]
fn test_zero_weight_categories_are_never_sampled() {
    let dist =
        CategoricalDistribution::from_weights([("live", 5), ("dead", 0)]).unwrap();
    assert_eq!(dist.size(), 1);

    let mut rng = XorShift64::seeded(7);
    for _ in 0..10_000 {
        assert_eq!(*dist.sample(&mut rng), "live");
    }
}

#[test]
fn test_fitting_is_partition_invariant() {
    let observations: Vec<String> =
        (0..1_000).map(|i| format!("category-{}", i % 13)).collect();

    let single_pass: CategoricalSketch<String> =
        observations.iter().cloned().collect();
    let expected = serde_json::to_vec(&single_pass.fit().unwrap()).unwrap();

    for shards in [2usize, 7] {
        let mut merged: CategoricalSketch<String> = CategoricalSketch::new();
        for shard in observations.chunks(observations.len().div_ceil(shards)) {
            merged.merge(shard.iter().cloned().collect());
        }
        let actual = serde_json::to_vec(&merged.fit().unwrap()).unwrap();
        assert_eq!(actual, expected, "{shards}-way partition produced different bytes");
    }
}

#[test]
fn test_map_preserves_weight_structure() {
    let dist =
        CategoricalDistribution::from_weights([(1u32, 4), (2u32, 1), (3u32, 5)]).unwrap();
    let total = dist.total();
    let size = dist.size();

    let mapped = dist.map(|n| format!("bucket-{n}"));
    assert_eq!(mapped.total(), total);
    assert_eq!(mapped.size(), size);

    let mut rng = XorShift64::seeded(43);
    let draw = mapped.sample(&mut rng);
    assert!(draw.starts_with("bucket-"));
}

#[test]
fn test_empirical_fit_matches_manual_counts() {
    let observations = ["a", "b", "a", "c", "a", "b"];
    let fitted = EmpiricalDistribution::fit(observations).unwrap();
    let counted =
        EmpiricalDistribution::fit_from_counts([("a", 3), ("b", 2), ("c", 1)]).unwrap();
    assert_eq!(fitted, counted);
}

#[test]
fn test_uniform_equality_is_order_independent() {
    let forward = UniformDistribution::fit(["x", "y", "z"]).unwrap();
    let shuffled = UniformDistribution::fit(["z", "x", "y", "x"]).unwrap();
    assert_eq!(forward, shuffled);
    assert_eq!(
        serde_json::to_string(&forward).unwrap(),
        serde_json::to_string(&shuffled).unwrap()
    );
}

#[test]
fn test_empty_fits_are_rejected() {
    let sketch: CategoricalSketch<String> = CategoricalSketch::new();
    let err = sketch.fit().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_that!(err.message(), contains_substring("empty sketch"));

    let err = CategoricalDistribution::<&str>::from_weights([]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_that!(err.message(), contains_substring("positive weight"));
}
