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

//! Nested API objects and their Terraform counterpart.
//!
//! [`flattened!`] declares, from a single field list, the API model of a nested
//! object, the state struct it is flattened into, and the Terraform type of
//! that state. [`config_block!`] does the same for configurable blocks, adding
//! the attribute constraints, the block schema and the conversion back into
//! the API model.

use tf_provider::schema::AttributeType;
use tf_provider::value::Value;

pub(crate) trait Flatten: Sized {
    type Model;

    fn flatten(model: &Self::Model) -> Self;
    fn attribute_type() -> AttributeType;
}

/// Configurable block, converted back into its API model on apply
pub(crate) trait Configure: Flatten {
    fn to_model(&self) -> Self::Model;
    fn apply_defaults(&mut self);
}

pub(crate) fn flatten_value<T: Clone>(value: &Option<T>) -> Value<T> {
    match value {
        Some(value) => Value::Value(value.clone()),
        None => Value::Null,
    }
}

pub(crate) fn flatten_list<T: Flatten>(models: &Option<Vec<T::Model>>) -> Value<Vec<T>> {
    match models {
        Some(models) => Value::Value(models.iter().map(T::flatten).collect()),
        None => Value::Null,
    }
}

/// Single objects are exposed as a list of at most one element
pub(crate) fn flatten_object<T: Flatten>(model: &Option<T::Model>) -> Value<Vec<T>> {
    match model {
        Some(model) => Value::Value(vec![T::flatten(model)]),
        None => Value::Null,
    }
}

pub(crate) fn value_option<T: Clone>(value: &Value<T>) -> Option<T> {
    value.as_ref_option().cloned()
}

macro_rules! model_type {
    (string) => { Option<String> };
    (number) => { Option<i64> };
    (float) => { Option<f64> };
    (bool) => { Option<bool> };
    (strings) => { Option<Vec<String>> };
    (string_set) => { Option<Vec<String>> };
    ([$t:ty]) => { Option<Vec<<$t as $crate::flatten::Flatten>::Model>> };
    ({$t:ty}) => { Option<<$t as $crate::flatten::Flatten>::Model> };
}
pub(crate) use model_type;

macro_rules! state_type {
    (string) => { tf_provider::value::Value<String> };
    (number) => { tf_provider::value::Value<i64> };
    (float) => { tf_provider::value::Value<f64> };
    (bool) => { tf_provider::value::Value<bool> };
    (strings) => { tf_provider::value::Value<Vec<String>> };
    (string_set) => { tf_provider::value::Value<Vec<String>> };
    ([$t:ty]) => { tf_provider::value::Value<Vec<$t>> };
    ({$t:ty}) => { tf_provider::value::Value<Vec<$t>> };
}
pub(crate) use state_type;

macro_rules! attr_type {
    (string) => { tf_provider::schema::AttributeType::String };
    (number) => { tf_provider::schema::AttributeType::Number };
    (float) => { tf_provider::schema::AttributeType::Number };
    (bool) => { tf_provider::schema::AttributeType::Bool };
    (strings) => {
        tf_provider::schema::AttributeType::List(Box::new(tf_provider::schema::AttributeType::String))
    };
    (string_set) => {
        tf_provider::schema::AttributeType::Set(Box::new(tf_provider::schema::AttributeType::String))
    };
    ([$t:ty]) => {
        tf_provider::schema::AttributeType::List(Box::new(
            <$t as $crate::flatten::Flatten>::attribute_type(),
        ))
    };
    ({$t:ty}) => {
        tf_provider::schema::AttributeType::List(Box::new(
            <$t as $crate::flatten::Flatten>::attribute_type(),
        ))
    };
}
pub(crate) use attr_type;

macro_rules! flatten_field {
    ([$t:ty], $value:expr) => { $crate::flatten::flatten_list::<$t>($value) };
    ({$t:ty}, $value:expr) => { $crate::flatten::flatten_object::<$t>($value) };
    ($kind:ident, $value:expr) => { $crate::flatten::flatten_value($value) };
}
pub(crate) use flatten_field;

/// Declare a computed nested object
///
/// ```ignore
/// flattened! {
///     pub struct TableMapping from TableMappingModel {
///         database: string = "Database",
///         topic_id: string = "TopicId",
///     }
/// }
/// ```
macro_rules! flattened {
    ($(
        $(#[$meta:meta])*
        pub struct $name:ident from $model:ident {
            $($field:ident : $kind:tt = $json:literal),* $(,)?
        }
    )*) => {$(
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $model {
            $(
                #[serde(rename = $json, default, skip_serializing_if = "Option::is_none")]
                pub $field: $crate::flatten::model_type!($kind),
            )*
        }

        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $(pub $field: $crate::flatten::state_type!($kind),)*
        }

        impl $crate::flatten::Flatten for $name {
            type Model = $model;

            fn flatten(model: &$model) -> Self {
                Self {
                    $($field: $crate::flatten::flatten_field!($kind, &model.$field),)*
                }
            }

            fn attribute_type() -> tf_provider::schema::AttributeType {
                tf_provider::schema::AttributeType::Object(tf_provider::map! {
                    $(
                        stringify!($field).trim_start_matches("r#")
                            => $crate::flatten::attr_type!($kind),
                    )*
                })
            }
        }
    )*};
}
pub(crate) use flattened;

macro_rules! constraint {
    (required) => { tf_provider::schema::AttributeConstraint::Required };
    (secret) => { tf_provider::schema::AttributeConstraint::Required };
    (optional) => { tf_provider::schema::AttributeConstraint::Optional };
    (optional_secret) => { tf_provider::schema::AttributeConstraint::Optional };
    (optional_computed) => { tf_provider::schema::AttributeConstraint::OptionalComputed };
}
pub(crate) use constraint;

macro_rules! sensitive {
    (secret) => { true };
    (optional_secret) => { true };
    ($constraint:ident) => { false };
}
pub(crate) use sensitive;

macro_rules! apply_default {
    ($field:expr) => {};
    ($field:expr, $default:expr) => {
        if $field.is_null() {
            $field = tf_provider::value::Value::Value($default.into());
        }
    };
}
pub(crate) use apply_default;

/// Declare a configurable block with scalar attributes, and the API object it maps to
///
/// ```ignore
/// config_block! {
///     pub struct KafkaConnectParam for KafkaConnectParamModel {
///         resource: string = "Resource", optional, "Instance id";
///         self_built: bool = "SelfBuilt", optional_computed = false, "Whether it is a self-built cluster";
///     }
/// }
/// ```
macro_rules! config_block {
    ($(
        $(#[$meta:meta])*
        pub struct $name:ident for $model:ident {
            $(
                $field:ident : $kind:ident = $json:literal,
                $constraint:ident $(= $default:expr)?,
                $desc:literal;
            )*
        }
    )*) => {$(
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $model {
            $(
                #[serde(rename = $json, default, skip_serializing_if = "Option::is_none")]
                pub $field: $crate::flatten::model_type!($kind),
            )*
        }

        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $(pub $field: $crate::flatten::state_type!($kind),)*
        }

        impl $name {
            pub fn block(description: &str) -> tf_provider::schema::Block {
                tf_provider::schema::Block {
                    version: 1,
                    description: tf_provider::schema::Description::plain(description),
                    attributes: tf_provider::map! {
                        $(
                            stringify!($field).trim_start_matches("r#") => tf_provider::schema::Attribute {
                                attr_type: $crate::flatten::attr_type!($kind),
                                description: tf_provider::schema::Description::plain($desc),
                                constraint: $crate::flatten::constraint!($constraint),
                                sensitive: $crate::flatten::sensitive!($constraint),
                                ..Default::default()
                            },
                        )*
                    },
                    ..Default::default()
                }
            }
        }

        impl $crate::flatten::Configure for $name {
            fn to_model(&self) -> $model {
                $model {
                    $($field: $crate::flatten::value_option(&self.$field),)*
                }
            }

            fn apply_defaults(&mut self) {
                $($crate::flatten::apply_default!(self.$field $(, $default)?);)*
            }
        }

        impl $crate::flatten::Flatten for $name {
            type Model = $model;

            fn flatten(model: &$model) -> Self {
                Self {
                    $($field: $crate::flatten::flatten_value(&model.$field),)*
                }
            }

            fn attribute_type() -> tf_provider::schema::AttributeType {
                tf_provider::schema::AttributeType::Object(tf_provider::map! {
                    $(
                        stringify!($field).trim_start_matches("r#")
                            => $crate::flatten::attr_type!($kind),
                    )*
                })
            }
        }
    )*};
}
pub(crate) use config_block;
