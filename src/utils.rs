// This file is part of the terraform-provider-ckafka project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::borrow::Cow;
use std::cell::RefCell;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use crypto::digest::Digest;
use crypto::sha2::Sha256;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use serde::Serialize;
use time::macros::format_description;
use time::OffsetDateTime;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description, Schema};
use tf_provider::value::{Value, ValueString};
use tf_provider::{AttributePath, Diagnostics};

pub const ID_SEPARATOR: &str = "#";

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

#[async_trait]
pub(crate) trait WithValidate {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath);
}

pub(crate) trait WithNormalize {
    fn normalize(&mut self, diags: &mut Diagnostics);
}

/// Random id tying together the log lines of one handler call
pub fn log_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

/// Split a composite resource id into exactly `N` parts
pub fn split_id<'a, const N: usize>(id: &'a str, resource: &str) -> Result<[&'a str; N]> {
    let parts = id.split(ID_SEPARATOR).collect::<Vec<_>>();
    parts
        .try_into()
        .map_err(|_| anyhow!("id of resource.tencentcloud_{resource} is wrong"))
}

pub fn join_id(parts: &[&str]) -> String {
    parts.iter().join_with(ID_SEPARATOR).to_string()
}

/// Unwrap a state which is expected to be known
pub fn known_state<T>(diags: &mut Diagnostics, state: Value<T>) -> Option<T> {
    match state {
        Value::Value(state) => Some(state),
        Value::Null => {
            root_error(diags, "Missing state", "The resource state is null");
            None
        }
        Value::Unknown => {
            root_error(diags, "Unknown state", "The resource state is not known yet");
            None
        }
    }
}

pub fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

/// The planned value is known and differs from the prior one
pub fn changed<T: PartialEq>(prior: &Value<T>, planned: &Value<T>) -> bool {
    !planned.is_unknown() && prior != planned
}

/// Replace a null value by `Unknown`, to be filled by the next read
pub fn unknown_if_null<T>(value: &mut Value<T>) {
    if value.is_null() {
        *value = Value::Unknown;
    }
}

pub fn root_error(diags: &mut Diagnostics, summary: impl Into<String>, detail: impl Into<String>) {
    diags.error(summary.into(), detail.into(), AttributePath::default());
}

/// Report a failed API call, with the whole error chain as detail
pub fn api_error(diags: &mut Diagnostics, summary: impl Into<String>, err: &anyhow::Error) {
    root_error(diags, summary, format!("{err:#}"));
}

pub fn string_value<'a>(value: Option<String>) -> ValueString<'a> {
    match value {
        Some(value) => Value::Value(Cow::Owned(value)),
        None => Value::Null,
    }
}

pub fn value<T>(value: Option<T>) -> Value<T> {
    match value {
        Some(value) => Value::Value(value),
        None => Value::Null,
    }
}

/// Unix timestamp as `YYYY-MM-DD hh:mm:ss`, UTC
pub fn format_timestamp(timestamp: i64) -> Option<String> {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()?
        .format(format)
        .ok()
}

/// Stable id of a data source, derived from the ids of its results
pub fn ids_hash<S: AsRef<str>>(ids: &[S]) -> String {
    let mut hasher = Sha256::new();
    for id in ids {
        hasher.input_str(id.as_ref());
        hasher.input_str("-");
    }
    hasher.result_str()[..16].to_owned()
}

/// Non empty string content of the value
pub fn non_empty<'a>(value: &'a ValueString<'_>) -> Option<&'a str> {
    value.as_deref_option().filter(|s| !s.is_empty())
}

/// Dump the data source result as indented JSON, when an output file is configured
pub async fn write_result_output_file<T: Serialize + ?Sized>(
    path: &ValueString<'_>,
    result: &T,
) -> Result<()> {
    let Some(path) = non_empty(path) else {
        return Ok(());
    };
    let content = serde_json::to_string_pretty(result)?;
    tokio::fs::write(path, content)
        .await
        .map_err(|err| anyhow!("failed to write {path}: {err}"))
}

pub struct DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    iter: RefCell<T>,
    sep: &'a str,
}

pub trait DisplayJoinable {
    type Joiner<'a>;
    fn join_with(self, sep: &str) -> Self::Joiner<'_>;
}

impl<T, I> DisplayJoinable for T
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    type Joiner<'a> = DisplayJoiner<'a, T, I>;

    fn join_with(self, sep: &str) -> Self::Joiner<'_> {
        DisplayJoiner {
            iter: RefCell::new(self),
            sep,
        }
    }
}

impl<'a, T, I> std::fmt::Display for DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";
        let mut iter = self.iter.try_borrow_mut().or(Err(std::fmt::Error))?;
        for elt in iter.by_ref() {
            f.write_str(sep)?;
            f.write_fmt(format_args!("{elt}"))?;
            sep = self.sep;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_id() {
        let id = join_id(&["ckafka-1", "orders"]);
        assert_eq!(id, "ckafka-1#orders");
        assert_eq!(split_id::<2>(&id, "ckafka_topic").unwrap(), ["ckafka-1", "orders"]);

        let err = split_id::<3>(&id, "ckafka_topic").unwrap_err();
        assert_eq!(err.to_string(), "id of resource.tencentcloud_ckafka_topic is wrong");
    }

    #[test]
    fn joiner() {
        assert_eq!([1, 2, 3].iter().join_with(", ").to_string(), "1, 2, 3");
        assert_eq!(std::iter::empty::<u8>().join_with(",").to_string(), "");
    }

    #[test]
    fn log_ids_are_random() {
        let id = log_id();
        assert_eq!(id.len(), 16);
        assert_ne!(id, log_id());
    }

    #[test]
    fn unknown_state_is_an_error() {
        let mut diags = Diagnostics::default();
        assert_eq!(known_state(&mut diags, Value::Value(3)), Some(3));
        assert!(diags.errors.is_empty());
        assert_eq!(known_state::<i64>(&mut diags, Value::Unknown), None);
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(0).as_deref(), Some("1970-01-01 00:00:00"));
        assert_eq!(
            format_timestamp(1_700_000_000).as_deref(),
            Some("2023-11-14 22:13:20")
        );
    }

    #[test]
    fn data_source_ids() {
        assert_eq!(ids_hash(&["a", "b"]), ids_hash(&["a".to_owned(), "b".to_owned()]));
        assert_ne!(ids_hash(&["a", "b"]), ids_hash(&["ab"]));
        assert_eq!(ids_hash::<&str>(&[]).len(), 16);
    }

    #[test]
    fn change_detection() {
        assert!(changed(&Value::Value(1), &Value::Value(2)));
        assert!(changed(&Value::Null, &Value::Value(2)));
        assert!(!changed(&Value::Value(1), &Value::Value(1)));
        assert!(!changed(&Value::Value(1), &Value::Unknown));

        let mut value = Value::<i64>::Null;
        unknown_if_null(&mut value);
        assert!(value.is_unknown());
    }

    #[tokio::test]
    async fn result_output_file() {
        let path = std::env::temp_dir().join(format!("ckafka-{}.json", log_id()));
        let path_value = Value::Value(Cow::Owned(path.to_string_lossy().into_owned()));
        write_result_output_file(&path_value, &serde_json::json!([{"topic_name": "orders"}]))
            .await
            .unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("\"topic_name\": \"orders\""));
        tokio::fs::remove_file(&path).await.unwrap();

        // No path, nothing written
        write_result_output_file(&Value::Null, &[1, 2]).await.unwrap();
    }
}
