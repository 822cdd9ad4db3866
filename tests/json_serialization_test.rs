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
use deltasketch::categorical::EmpiricalDistribution;
use deltasketch::categorical::UniformDistribution;
use deltasketch::continuous::GaussianDistribution;
use deltasketch::error::ErrorKind;
use deltasketch::json::Distribution;
use deltasketch::json::distribution_from_str;
use deltasketch::json::dynamic_distribution_from_str;
use googletest::assert_that;
use googletest::prelude::contains_substring;

fn round_trip(dist: Distribution<String>) {
    let json = serde_json::to_string(&dist).unwrap();
    let restored: Distribution<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(dist, restored, "round trip changed {json}");
}

#[test]
fn test_every_kind_round_trips() {
    round_trip(
        CategoricalDistribution::from_weights([("a".to_string(), 1), ("b".to_string(), 2)])
            .unwrap()
            .into(),
    );
    round_trip(
        EmpiricalDistribution::fit(["x".to_string(), "x".to_string(), "y".to_string()])
            .unwrap()
            .into(),
    );
    round_trip(
        UniformDistribution::fit(["p".to_string(), "q".to_string()]).unwrap().into(),
    );
    round_trip(GaussianDistribution::new(0.5, 2.0).unwrap().into());
}

#[test]
fn test_mixed_collections_decode_by_tag() {
    let json = r#"[
        {"type":"categorical","categories":[{"category":"a","count":2}]},
        {"type":"uniform","categories":["u","v"]},
        {"type":"gaussian","mu":1.0,"sigma":2.0}
    ]"#;

    let dists: Vec<Distribution<String>> = serde_json::from_str(json).unwrap();
    let kinds: Vec<_> = dists.iter().map(Distribution::kind).collect();
    assert_eq!(kinds, vec!["categorical", "uniform", "gaussian"]);
}

#[test]
fn test_unknown_and_missing_tags_are_rejected() {
    let err = distribution_from_str::<String>(r#"{"type":"zipf","s":1.2}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("unknown distribution type"));

    let err = distribution_from_str::<String>(r#"{"mu":0.0,"sigma":1.0}"#).unwrap_err();
    assert_that!(err.message(), contains_substring("missing its type tag"));
}

#[test]
fn test_dynamic_decoding_accepts_mixed_category_types() {
    let json =
        r#"{"type":"empirical","categories":[{"category":1,"count":3},{"category":"one","count":1}]}"#;
    let Distribution::Empirical(dist) = dynamic_distribution_from_str(json).unwrap() else {
        panic!("expected an empirical distribution");
    };
    assert_eq!(dist.total(), 4);
    assert_eq!(dist.size(), 2);
}

#[test]
fn test_dynamic_gaussian_matches_typed_decoding() {
    let json = r#"{"type":"gaussian","mu":7.0,"sigma":0.25}"#;

    let typed: Distribution<String> = distribution_from_str(json).unwrap();
    let dynamic = dynamic_distribution_from_str(json).unwrap();

    let Distribution::Gaussian(typed) = typed else {
        panic!("expected a gaussian distribution");
    };
    let Distribution::Gaussian(dynamic) = dynamic else {
        panic!("expected a gaussian distribution");
    };
    assert_eq!(typed, dynamic);
}

#[test]
fn test_payload_errors_surface_as_decoding_errors() {
    // Right tag, wrong payload shape.
    let err =
        distribution_from_str::<String>(r#"{"type":"gaussian","mu":"zero"}"#).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
}
