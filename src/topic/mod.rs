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

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::value::{ValueBool, ValueList, ValueNumber};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::api::ckafka::{CreateTopicRequest, TopicAttributes, TopicDetail};
use crate::utils::{
    attribute, format_timestamp, string_value, unknown_if_null, value, WithNormalize, WithSchema,
    WithValidate,
};

mod data_source;
mod resource;

pub use data_source::CkafkaTopicsDataSource;
pub use resource::CkafkaTopicResource;

pub const CLEAN_UP_POLICIES: [&str; 2] = ["delete", "compact"];
pub const DEFAULT_RETENTION: i64 = 60_480_000;
pub const MAX_MESSAGE_BYTES_RANGE: std::ops::RangeInclusive<i64> = 1024..=12_582_912;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TopicState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub instance_id: ValueString<'a>,
    pub topic_name: ValueString<'a>,
    pub partition_num: ValueNumber,
    pub replica_num: ValueNumber,
    pub note: ValueString<'a>,
    pub enable_white_list: ValueBool,
    pub ip_white_list: ValueList<ValueString<'a>>,
    pub clean_up_policy: ValueString<'a>,
    pub sync_replica_min_num: ValueNumber,
    pub unclean_leader_election_enable: ValueBool,
    pub segment: ValueNumber,
    pub retention: ValueNumber,
    pub max_message_bytes: ValueNumber,
    pub create_time: ValueString<'a>,
    pub forward_cos_bucket: ValueString<'a>,
    pub forward_status: ValueNumber,
    pub forward_interval: ValueNumber,
}

fn flag(value: &ValueBool) -> i64 {
    i64::from(value.as_ref_option().copied().unwrap_or_default())
}

impl<'a> TopicState<'a> {
    pub fn ip_white_list(&self) -> Vec<String> {
        self.ip_white_list
            .iter()
            .flatten()
            .filter_map(|ip| ip.as_deref_option().map(str::to_owned))
            .collect()
    }

    pub fn create_request(&self) -> CreateTopicRequest {
        CreateTopicRequest {
            instance_id: self.instance_id.as_str().to_owned(),
            topic_name: self.topic_name.as_str().to_owned(),
            partition_num: self.partition_num.as_ref_option().copied().unwrap_or_default(),
            replica_num: self.replica_num.as_ref_option().copied().unwrap_or_default(),
            enable_white_list: flag(&self.enable_white_list),
            ip_white_list: self.ip_white_list(),
            clean_up_policy: self.clean_up_policy.as_str().to_owned(),
            note: self
                .note
                .as_deref_option()
                .filter(|note| !note.is_empty())
                .map(str::to_owned),
            min_insync_replicas: self
                .sync_replica_min_num
                .as_ref_option()
                .copied()
                .unwrap_or(1),
            unclean_leader_election_enable: flag(&self.unclean_leader_election_enable),
            retention_ms: self.retention.as_ref_option().copied(),
            segment_ms: self.segment.as_ref_option().copied(),
            max_message_bytes: self.max_message_bytes.as_ref_option().copied(),
        }
    }

    /// Fill the state from the topic listing entry and its attributes
    pub fn set_topic(&mut self, detail: &TopicDetail, attributes: &TopicAttributes) {
        self.topic_name = string_value(detail.topic_name.clone());
        self.partition_num = value(attributes.partition_num.or(detail.partition_num));
        self.replica_num = value(attributes.replica_num.or(detail.replica_num));
        self.note = string_value(
            attributes
                .note
                .clone()
                .or_else(|| detail.note.clone())
                .filter(|note| !note.is_empty()),
        );
        self.create_time = string_value(
            attributes
                .create_time
                .or(detail.create_time)
                .and_then(format_timestamp),
        );
        self.forward_cos_bucket = string_value(detail.forward_cos_bucket.clone());
        self.forward_status = value(detail.forward_status);
        self.forward_interval = value(detail.forward_interval);

        self.enable_white_list = Value::Value(attributes.enable_white_list == Some(1));
        let ip_white_list = attributes.ip_white_list.clone().unwrap_or_default();
        if !ip_white_list.is_empty() || !self.ip_white_list.is_null() {
            self.ip_white_list = Value::Value(
                ip_white_list
                    .into_iter()
                    .map(|ip| Value::Value(Cow::Owned(ip)))
                    .collect(),
            );
        }

        let config = attributes
            .config
            .as_ref()
            .or(detail.config.as_ref())
            .cloned()
            .unwrap_or_default();
        self.clean_up_policy = string_value(config.clean_up_policy);
        self.sync_replica_min_num = value(config.min_insync_replicas);
        self.unclean_leader_election_enable =
            value(config.unclean_leader_election_enable.map(|enable| enable == 1));
        self.segment = value(config.segment_ms);
        self.retention = value(config.retention);
        self.max_message_bytes = value(config.max_message_bytes);
    }

    pub fn mark_computed_unknown(&mut self) {
        self.id = Value::Unknown;
        self.create_time = Value::Unknown;
        self.forward_cos_bucket = Value::Unknown;
        self.forward_status = Value::Unknown;
        self.forward_interval = Value::Unknown;
        unknown_if_null(&mut self.segment);
        unknown_if_null(&mut self.max_message_bytes);
    }
}

impl<'a> WithNormalize for TopicState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.enable_white_list.is_null() {
            self.enable_white_list = Value::Value(false);
        }
        if self.clean_up_policy.is_null() {
            self.clean_up_policy = Value::Value(Cow::Borrowed("delete"));
        }
        if self.sync_replica_min_num.is_null() {
            self.sync_replica_min_num = Value::Value(1);
        }
        if self.unclean_leader_election_enable.is_null() {
            self.unclean_leader_election_enable = Value::Value(false);
        }
        if self.retention.is_null() {
            self.retention = Value::Value(DEFAULT_RETENTION);
        }
    }
}

#[async_trait]
impl<'a> WithValidate for TopicState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if self.enable_white_list.as_ref_option() == Some(&true)
            && !self.ip_white_list.is_unknown()
            && self.ip_white_list.iter().flatten().next().is_none()
        {
            diags.error(
                "Invalid ip white list".to_owned(),
                "ip whitelist cannot be empty when enable_white_list is true".to_owned(),
                attr_path.clone().attribute("ip_white_list"),
            );
        }
        if let Some(policy) = self.clean_up_policy.as_deref_option() {
            if !CLEAN_UP_POLICIES.contains(&policy) {
                diags.error(
                    "Invalid clean up policy".to_owned(),
                    format!("`clean_up_policy` must be `delete` or `compact`, got `{policy}`"),
                    attr_path.clone().attribute("clean_up_policy"),
                );
            }
        }
        if let Some(max_message_bytes) = self.max_message_bytes.as_ref_option() {
            if !MAX_MESSAGE_BYTES_RANGE.contains(max_message_bytes) {
                diags.error(
                    "Invalid max message bytes".to_owned(),
                    format!(
                        "`max_message_bytes` must be between {} and {}, got {max_message_bytes}",
                        MAX_MESSAGE_BYTES_RANGE.start(),
                        MAX_MESSAGE_BYTES_RANGE.end()
                    ),
                    attr_path.clone().attribute("max_message_bytes"),
                );
            }
        }
        if let Some(partition_num) = self.partition_num.as_ref_option() {
            if *partition_num < 1 {
                diags.error(
                    "Invalid partition number".to_owned(),
                    format!("`partition_num` must be positive, got {partition_num}"),
                    attr_path.clone().attribute("partition_num"),
                );
            }
        }
    }
}

impl<'a> WithSchema for TopicState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Use this resource to create a ckafka topic."),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the topic, as `<instance_id>#<topic_name>`."),
                    "instance_id" => attribute(
                        AttributeType::String,
                        Required,
                        "Ckafka instance ID. Changing it recreates the topic.",
                    ),
                    "topic_name" => attribute(
                        AttributeType::String,
                        Required,
                        "Name of the CKafka topic. It must start with a letter, the rest can contain letters, numbers and dashes(-). Changing it recreates the topic.",
                    ),
                    "partition_num" => attribute(
                        AttributeType::Number,
                        Required,
                        "The number of partition. It cannot be reduced.",
                    ),
                    "replica_num" => attribute(
                        AttributeType::Number,
                        Required,
                        "The number of replica. Changing it recreates the topic.",
                    ),
                    "note" => attribute(
                        AttributeType::String,
                        Optional,
                        "The subject note. It must start with a letter, and the remaining part can contain letters, numbers and dashes (-).",
                    ),
                    "enable_white_list" => attribute(
                        AttributeType::Bool,
                        OptionalComputed,
                        "Whether to open the ip whitelist, `true` is open, `false` is close. Defaults to `false`.",
                    ),
                    "ip_white_list" => attribute(
                        AttributeType::List(AttributeType::String.into()),
                        Optional,
                        "Ip whitelist, quota limit, required when enable_white_list=true.",
                    ),
                    "clean_up_policy" => attribute(
                        AttributeType::String,
                        OptionalComputed,
                        "Clear log policy, log clear mode, default is `delete`. `delete`: logs are deleted according to the storage time; `compact`: logs are compressed according to the key.",
                    ),
                    "sync_replica_min_num" => attribute(
                        AttributeType::Number,
                        OptionalComputed,
                        "Min number of sync replicas, defaults to 1.",
                    ),
                    "unclean_leader_election_enable" => attribute(
                        AttributeType::Bool,
                        OptionalComputed,
                        "Whether to allow unsynchronized replicas to be selected as leader, defaults to `false`.",
                    ),
                    "segment" => attribute(
                        AttributeType::Number,
                        OptionalComputed,
                        "Segment scrolling time, in ms, with a range of 1 day to 90 days.",
                    ),
                    "retention" => attribute(
                        AttributeType::Number,
                        OptionalComputed,
                        "Message can be selected. Retention time, unit is ms, the default is 60480000.",
                    ),
                    "max_message_bytes" => attribute(
                        AttributeType::Number,
                        OptionalComputed,
                        "Max message bytes. Value range: 1024-12582912.",
                    ),
                    "create_time" => attribute(AttributeType::String, Computed, "Create time of the CKafka topic."),
                    "forward_cos_bucket" => attribute(AttributeType::String, Computed, "Data backup cos bucket: the bucket address that is dumped to cos."),
                    "forward_status" => attribute(AttributeType::Number, Computed, "Data backup cos status. Valid values: `0`, `1`. `1`: do not open data backup, `0`: open data backup."),
                    "forward_interval" => attribute(AttributeType::Number, Computed, "Periodic frequency of data backup to cos."),
                },
                ..Default::default()
            },
        }
    }
}

/// Entry of the `instance_list` of the topics data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TopicInfo {
    pub topic_name: Value<String>,
    pub topic_id: Value<String>,
    pub partition_num: ValueNumber,
    pub replica_num: ValueNumber,
    pub note: Value<String>,
    pub create_time: Value<String>,
    pub enable_white_list: ValueBool,
    pub ip_white_list_count: ValueNumber,
    pub forward_cos_bucket: Value<String>,
    pub forward_status: ValueNumber,
    pub forward_interval: ValueNumber,
    pub clean_up_policy: Value<String>,
    pub sync_replica_min_num: ValueNumber,
    pub unclean_leader_election_enable: ValueBool,
    pub segment: ValueNumber,
    pub retention: ValueNumber,
    pub segment_bytes: ValueNumber,
    pub max_message_bytes: ValueNumber,
}

impl From<&TopicDetail> for TopicInfo {
    fn from(detail: &TopicDetail) -> Self {
        let config = detail.config.clone().unwrap_or_default();
        Self {
            topic_name: value(detail.topic_name.clone()),
            topic_id: value(detail.topic_id.clone()),
            partition_num: value(detail.partition_num),
            replica_num: value(detail.replica_num),
            note: value(detail.note.clone()),
            create_time: value(detail.create_time.and_then(format_timestamp)),
            enable_white_list: value(detail.enable_white_list),
            ip_white_list_count: value(detail.ip_white_list_count),
            forward_cos_bucket: value(detail.forward_cos_bucket.clone()),
            forward_status: value(detail.forward_status),
            forward_interval: value(detail.forward_interval),
            clean_up_policy: value(config.clean_up_policy),
            sync_replica_min_num: value(config.min_insync_replicas),
            unclean_leader_election_enable: value(
                config.unclean_leader_election_enable.map(|enable| enable == 1),
            ),
            segment: value(config.segment_ms),
            retention: value(config.retention),
            segment_bytes: value(config.segment_bytes),
            max_message_bytes: value(config.max_message_bytes),
        }
    }
}

impl TopicInfo {
    fn attribute_type() -> AttributeType {
        AttributeType::Object(map! {
            "topic_name" => AttributeType::String,
            "topic_id" => AttributeType::String,
            "partition_num" => AttributeType::Number,
            "replica_num" => AttributeType::Number,
            "note" => AttributeType::String,
            "create_time" => AttributeType::String,
            "enable_white_list" => AttributeType::Bool,
            "ip_white_list_count" => AttributeType::Number,
            "forward_cos_bucket" => AttributeType::String,
            "forward_status" => AttributeType::Number,
            "forward_interval" => AttributeType::Number,
            "clean_up_policy" => AttributeType::String,
            "sync_replica_min_num" => AttributeType::Number,
            "unclean_leader_election_enable" => AttributeType::Bool,
            "segment" => AttributeType::Number,
            "retention" => AttributeType::Number,
            "segment_bytes" => AttributeType::Number,
            "max_message_bytes" => AttributeType::Number,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TopicsDataSourceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub instance_id: ValueString<'a>,
    pub topic_name: ValueString<'a>,
    pub result_output_file: ValueString<'a>,
    pub instance_list: ValueList<Value<TopicInfo>>,
}

impl<'a> WithSchema for TopicsDataSourceState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Use this data source to query detailed information of ckafka topic."),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the query."),
                    "instance_id" => attribute(AttributeType::String, Required, "Ckafka instance ID."),
                    "topic_name" => attribute(
                        AttributeType::String,
                        Optional,
                        "Name of the CKafka topic. It must start with a letter, the rest can contain letters, numbers and dashes(-).",
                    ),
                    "result_output_file" => attribute(AttributeType::String, Optional, "Used to store results."),
                    "instance_list" => attribute(
                        AttributeType::List(TopicInfo::attribute_type().into()),
                        Computed,
                        "A list of instances. Each element contains the following attributes.",
                    ),
                },
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn white_list_required_when_enabled() {
        let state = TopicState {
            enable_white_list: Value::Value(true),
            ip_white_list: Value::Value(vec![]),
            clean_up_policy: Value::Value("truncate".into()),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        state.validate(&mut diags, AttributePath::default()).await;
        assert_eq!(diags.errors.len(), 2);

        let state = TopicState {
            enable_white_list: Value::Value(true),
            ip_white_list: Value::Unknown,
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        state.validate(&mut diags, AttributePath::default()).await;
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn create_request_defaults() {
        let mut state = TopicState {
            instance_id: Value::Value("ckafka-1".into()),
            topic_name: Value::Value("orders".into()),
            partition_num: Value::Value(3),
            replica_num: Value::Value(2),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());
        let request = serde_json::to_value(state.create_request()).unwrap();
        assert_eq!(
            request,
            json!({
                "InstanceId": "ckafka-1",
                "TopicName": "orders",
                "PartitionNum": 3,
                "ReplicaNum": 2,
                "EnableWhiteList": 0,
                "CleanUpPolicy": "delete",
                "MinInsyncReplicas": 1,
                "UncleanLeaderElectionEnable": 0,
                "RetentionMs": 60480000,
            })
        );
    }

    #[test]
    fn topic_info_flattens_config() {
        let detail: TopicDetail = serde_json::from_value(json!({
            "TopicName": "orders",
            "TopicId": "topic-1",
            "PartitionNum": 3,
            "CreateTime": 0,
            "Config": {"CleanUpPolicy": "compact", "UncleanLeaderElectionEnable": 1, "SegmentBytes": 1024},
        }))
        .unwrap();
        let info = TopicInfo::from(&detail);
        assert_eq!(info.topic_id, Value::Value("topic-1".to_owned()));
        assert_eq!(info.create_time, Value::Value("1970-01-01 00:00:00".to_owned()));
        assert_eq!(info.clean_up_policy, Value::Value("compact".to_owned()));
        assert_eq!(info.unclean_leader_election_enable, Value::Value(true));
        assert_eq!(info.segment_bytes, Value::Value(1024));
        assert!(info.retention.is_null());
    }
}
