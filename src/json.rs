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

//! Mixed-kind distribution decoding.
//!
//! Every distribution serializes with a `type` tag; this module reads the tag
//! and dispatches to the matching concrete type, so callers can round-trip a
//! [`Distribution`] without knowing its kind in advance.
//!
//! When the category type is not known either, the dynamic entry points
//! decode categories as raw [`serde_json::Value`]s. That path loses type
//! fidelity (for example, every number becomes a JSON number, and values
//! that differ only in their original Rust type collapse), so it logs a
//! warning on every use; prefer the typed entry points wherever the category
//! type is known.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::categorical::CATEGORICAL_TAG;
use crate::categorical::CategoricalDistribution;
use crate::categorical::EMPIRICAL_TAG;
use crate::categorical::EmpiricalDistribution;
use crate::categorical::UNIFORM_TAG;
use crate::categorical::UniformDistribution;
use crate::continuous::GAUSSIAN_TAG;
use crate::continuous::GaussianDistribution;
use crate::error::Error;
use crate::error::ErrorKind;

/// A distribution of any supported kind, as found in mixed collections.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution<T> {
    Categorical(CategoricalDistribution<T>),
    Empirical(EmpiricalDistribution<T>),
    Uniform(UniformDistribution<T>),
    Gaussian(GaussianDistribution),
}

impl<T> Distribution<T> {
    /// The `type` tag this distribution serializes under.
    pub fn kind(&self) -> &'static str {
        match self {
            Distribution::Categorical(_) => CATEGORICAL_TAG,
            Distribution::Empirical(_) => EMPIRICAL_TAG,
            Distribution::Uniform(_) => UNIFORM_TAG,
            Distribution::Gaussian(_) => GAUSSIAN_TAG,
        }
    }
}

impl<T> From<CategoricalDistribution<T>> for Distribution<T> {
    fn from(distribution: CategoricalDistribution<T>) -> Self {
        Distribution::Categorical(distribution)
    }
}

impl<T> From<EmpiricalDistribution<T>> for Distribution<T> {
    fn from(distribution: EmpiricalDistribution<T>) -> Self {
        Distribution::Empirical(distribution)
    }
}

impl<T> From<UniformDistribution<T>> for Distribution<T> {
    fn from(distribution: UniformDistribution<T>) -> Self {
        Distribution::Uniform(distribution)
    }
}

impl<T> From<GaussianDistribution> for Distribution<T> {
    fn from(distribution: GaussianDistribution) -> Self {
        Distribution::Gaussian(distribution)
    }
}

impl<T: Serialize> Serialize for Distribution<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Distribution::Categorical(d) => d.serialize(serializer),
            Distribution::Empirical(d) => d.serialize(serializer),
            Distribution::Uniform(d) => d.serialize(serializer),
            Distribution::Gaussian(d) => d.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned + Ord> Deserialize<'de> for Distribution<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        distribution_from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Decodes a distribution of any kind from a JSON value by its `type` tag.
///
/// # Errors
///
/// Fails with a decoding error if the tag is missing or unknown, or if the
/// tagged payload is malformed.
pub fn distribution_from_value<T>(value: Value) -> Result<Distribution<T>, Error>
where
    T: DeserializeOwned + Ord,
{
    match kind_of(&value)?.as_str() {
        CATEGORICAL_TAG => serde_json::from_value(value)
            .map(Distribution::Categorical)
            .map_err(decode_error),
        EMPIRICAL_TAG => serde_json::from_value(value)
            .map(Distribution::Empirical)
            .map_err(decode_error),
        UNIFORM_TAG => serde_json::from_value(value)
            .map(Distribution::Uniform)
            .map_err(decode_error),
        GAUSSIAN_TAG => serde_json::from_value(value)
            .map(Distribution::Gaussian)
            .map_err(decode_error),
        other => Err(unknown_kind(other)),
    }
}

/// Decodes a distribution of any kind from a JSON string by its `type` tag.
///
/// # Errors
///
/// Fails like [`distribution_from_value`], or if the string is not JSON.
pub fn distribution_from_str<T>(json: &str) -> Result<Distribution<T>, Error>
where
    T: DeserializeOwned + Ord,
{
    distribution_from_value(serde_json::from_str(json).map_err(decode_error)?)
}

/// Decodes a distribution whose category type is unknown, keeping categories
/// as raw JSON values.
///
/// Logs a warning on every call: dynamic categories lose type fidelity, and
/// uniform distributions additionally lose their canonical value order, so
/// this is a last resort for callers that genuinely cannot name the type.
///
/// # Errors
///
/// Fails like [`distribution_from_value`].
pub fn dynamic_distribution_from_value(value: Value) -> Result<Distribution<Value>, Error> {
    tracing::warn!(
        "decoding a distribution with dynamic category typing; type fidelity is lost"
    );
    match kind_of(&value)?.as_str() {
        CATEGORICAL_TAG => serde_json::from_value(value)
            .map(Distribution::Categorical)
            .map_err(decode_error),
        EMPIRICAL_TAG => serde_json::from_value(value)
            .map(Distribution::Empirical)
            .map_err(decode_error),
        // JSON values carry no usable ordering, so the uniform payload is
        // deduplicated by equality and kept in its serialized order.
        UNIFORM_TAG => dynamic_uniform_from_value(value).map(Distribution::Uniform),
        GAUSSIAN_TAG => serde_json::from_value(value)
            .map(Distribution::Gaussian)
            .map_err(decode_error),
        other => Err(unknown_kind(other)),
    }
}

/// Decodes a distribution with dynamic categories from a JSON string.
///
/// # Errors
///
/// Fails like [`dynamic_distribution_from_value`].
pub fn dynamic_distribution_from_str(json: &str) -> Result<Distribution<Value>, Error> {
    dynamic_distribution_from_value(serde_json::from_str(json).map_err(decode_error)?)
}

fn dynamic_uniform_from_value(value: Value) -> Result<UniformDistribution<Value>, Error> {
    let categories = match value.get("categories") {
        Some(Value::Array(categories)) => categories.clone(),
        _ => {
            return Err(Error::new(
                ErrorKind::MalformedDeserializeData,
                "uniform distribution is missing its categories list",
            ));
        }
    };

    let mut distinct: Vec<Value> = Vec::with_capacity(categories.len());
    for category in categories {
        if !distinct.contains(&category) {
            distinct.push(category);
        }
    }
    if distinct.is_empty() {
        return Err(Error::new(
            ErrorKind::MalformedDeserializeData,
            "uniform distribution must have at least one category",
        ));
    }
    Ok(UniformDistribution::from_distinct_values(distinct))
}

fn kind_of(value: &Value) -> Result<String, Error> {
    match value.get("type") {
        Some(Value::String(kind)) => Ok(kind.clone()),
        _ => Err(Error::new(
            ErrorKind::MalformedDeserializeData,
            "distribution is missing its type tag",
        )),
    }
}

fn unknown_kind(kind: &str) -> Error {
    Error::new(ErrorKind::MalformedDeserializeData, "unknown distribution type")
        .with_context("type", kind)
}

fn decode_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::MalformedDeserializeData, "failed to decode distribution")
        .set_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_by_tag() {
        let json = r#"{"type":"gaussian","mu":0.0,"sigma":1.0}"#;
        let dist: Distribution<String> = distribution_from_str(json).unwrap();
        assert_eq!(dist.kind(), "gaussian");

        let json = r#"{"type":"empirical","categories":[{"category":"a","count":2}]}"#;
        let dist: Distribution<String> = distribution_from_str(json).unwrap();
        assert_eq!(dist.kind(), "empirical");
    }

    #[test]
    fn test_missing_tag_is_rejected() {
        let err = distribution_from_str::<String>(r#"{"mu":0.0,"sigma":1.0}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let err = distribution_from_str::<String>(r#"{"type":"poisson"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    }

    #[test]
    fn test_dynamic_decoding_keeps_raw_values() {
        let json = r#"{"type":"categorical","categories":[{"category":5,"count":1},{"category":"five","count":2}]}"#;
        let dist = dynamic_distribution_from_str(json).unwrap();
        let Distribution::Categorical(dist) = dist else {
            panic!("expected a categorical distribution");
        };
        assert_eq!(dist.total(), 3);
    }

    #[test]
    fn test_dynamic_uniform_collapses_duplicates() {
        let json = r#"{"type":"uniform","categories":["a","b","a"]}"#;
        let Distribution::Uniform(dist) = dynamic_distribution_from_str(json).unwrap() else {
            panic!("expected a uniform distribution");
        };
        assert_eq!(dist.size(), 2);
    }
}
