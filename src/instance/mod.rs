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
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::schema::NestedBlock;
use tf_provider::value::{ValueBool, ValueList, ValueNumber};
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueMap, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::api::ckafka::{
    ChargeType, CreateInstanceRequest, DynamicRetentionConfig, InstanceAttributes,
    InstanceDetail, ModifyInstanceConfig, Tag, INSTANCE_TYPE,
};
use crate::utils::{
    attribute, string_value, unknown_if_null, value, WithNormalize, WithSchema, WithValidate,
};

mod resource;

pub use resource::CkafkaInstanceResource;

pub const SPECIFICATIONS_TYPES: [&str; 2] = ["standard", "profession"];
pub const DEFAULT_SPECIFICATIONS_TYPE: &str = "profession";
pub const DEFAULT_UPGRADE_STRATEGY: i64 = 1;
pub const MAX_MESSAGE_BYTE_RANGE: std::ops::RangeInclusive<i64> = 1024..=12 * 1024 * 1024;

/// Attributes which cannot be modified once the instance exists
pub const IMMUTABLE_ATTRIBUTES: [&str; 11] = [
    "zone_id",
    "period",
    "vpc_id",
    "subnet_id",
    "renew_flag",
    "kafka_version",
    "multi_zone_flag",
    "zone_ids",
    "disk_type",
    "specifications_type",
    "instance_type",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InstanceTag {
    pub key: Value<String>,
    pub value: Value<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InstanceConfigBlock {
    pub auto_create_topic_enable: ValueBool,
    pub default_num_partitions: ValueNumber,
    pub default_replication_factor: ValueNumber,
}

impl InstanceConfigBlock {
    fn to_request(&self) -> ModifyInstanceConfig {
        ModifyInstanceConfig {
            auto_create_topic_enable: self.auto_create_topic_enable.as_ref_option().copied(),
            default_num_partitions: self.default_num_partitions.as_ref_option().copied(),
            default_replication_factor: self.default_replication_factor.as_ref_option().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DynamicRetentionBlock {
    pub enable: ValueNumber,
    pub disk_quota_percentage: ValueNumber,
    pub step_forward_percentage: ValueNumber,
    pub bottom_retention: ValueNumber,
}

impl DynamicRetentionBlock {
    fn to_request(&self) -> DynamicRetentionConfig {
        DynamicRetentionConfig {
            enable: self.enable.as_ref_option().copied(),
            disk_quota_percentage: self.disk_quota_percentage.as_ref_option().copied(),
            step_forward_percentage: self.step_forward_percentage.as_ref_option().copied(),
            bottom_retention: self.bottom_retention.as_ref_option().copied(),
        }
    }

    fn mark_unknown(&mut self) {
        unknown_if_null(&mut self.enable);
        unknown_if_null(&mut self.disk_quota_percentage);
        unknown_if_null(&mut self.step_forward_percentage);
        unknown_if_null(&mut self.bottom_retention);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InstanceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub instance_name: ValueString<'a>,
    pub zone_id: ValueNumber,
    pub specifications_type: ValueString<'a>,
    pub charge_type: ValueString<'a>,
    pub period: ValueNumber,
    pub instance_type: ValueNumber,
    pub upgrade_strategy: ValueNumber,
    pub vpc_id: ValueString<'a>,
    pub subnet_id: ValueString<'a>,
    pub msg_retention_time: ValueNumber,
    pub renew_flag: ValueNumber,
    pub kafka_version: ValueString<'a>,
    pub band_width: ValueNumber,
    pub disk_size: ValueNumber,
    pub partition: ValueNumber,
    pub multi_zone_flag: ValueBool,
    pub zone_ids: ValueList<ValueNumber>,
    pub tags: ValueList<Value<InstanceTag>>,
    pub tag_set: ValueMap<'a, ValueString<'a>>,
    pub disk_type: ValueString<'a>,
    pub config: ValueList<Value<InstanceConfigBlock>>,
    pub dynamic_retention_config: ValueList<Value<DynamicRetentionBlock>>,
    pub rebalance_time: ValueNumber,
    pub public_network: ValueNumber,
    pub max_message_byte: ValueNumber,
    pub vip: ValueString<'a>,
    pub vport: ValueString<'a>,
}

fn first<T>(blocks: &ValueList<Value<T>>) -> Option<&T> {
    blocks.as_ref_option()?.first()?.as_ref_option()
}

fn number(value: &ValueNumber) -> Option<i64> {
    value.as_ref_option().copied()
}

fn string(value: &ValueString<'_>) -> Option<String> {
    value
        .as_deref_option()
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

impl<'a> InstanceState<'a> {
    pub fn charge_type(&self) -> ChargeType {
        match self.charge_type.as_deref_option() {
            Some("POSTPAID_BY_HOUR") => ChargeType::Postpaid,
            _ => ChargeType::Prepaid,
        }
    }

    pub fn config_block(&self) -> Option<&InstanceConfigBlock> {
        first(&self.config)
    }

    pub fn dynamic_retention_block(&self) -> Option<&DynamicRetentionBlock> {
        first(&self.dynamic_retention_config)
    }

    pub fn modify_config(&self) -> Option<ModifyInstanceConfig> {
        self.config_block().map(InstanceConfigBlock::to_request)
    }

    pub fn dynamic_retention(&self) -> Option<DynamicRetentionConfig> {
        self.dynamic_retention_block()
            .map(DynamicRetentionBlock::to_request)
            .filter(|config| config != &DynamicRetentionConfig::default())
    }

    /// Tags wanted on the instance: `tag_set` when known, the deprecated `tags` list otherwise
    pub fn desired_tags(&self) -> BTreeMap<String, String> {
        if let Value::Value(tag_set) = &self.tag_set {
            return tag_set
                .iter()
                .filter_map(|(key, value)| {
                    Some((key.to_string(), value.as_deref_option()?.to_owned()))
                })
                .collect();
        }
        self.tags
            .iter()
            .flatten()
            .filter_map(|tag| {
                let tag = tag.as_ref_option()?;
                Some((
                    tag.key.as_ref_option()?.clone(),
                    tag.value.as_ref_option().cloned().unwrap_or_default(),
                ))
            })
            .collect()
    }

    /// Value of an [`IMMUTABLE_ATTRIBUTES`] entry, for change detection
    pub fn immutable_value(&self, name: &str) -> String {
        fn show<T: std::fmt::Debug>(value: &Value<T>) -> String {
            match value {
                Value::Value(value) => format!("{value:?}"),
                Value::Null => "null".to_owned(),
                Value::Unknown => "unknown".to_owned(),
            }
        }
        match name {
            "zone_id" => show(&self.zone_id),
            "period" => show(&self.period),
            "vpc_id" => show(&self.vpc_id),
            "subnet_id" => show(&self.subnet_id),
            "renew_flag" => show(&self.renew_flag),
            "kafka_version" => show(&self.kafka_version),
            "multi_zone_flag" => show(&self.multi_zone_flag),
            "zone_ids" => {
                let mut ids = self
                    .zone_ids
                    .iter()
                    .flatten()
                    .filter_map(|id| id.as_ref_option().copied())
                    .collect::<Vec<_>>();
                ids.sort_unstable();
                format!("{ids:?}")
            }
            "disk_type" => show(&self.disk_type),
            "specifications_type" => show(&self.specifications_type),
            "instance_type" => show(&self.instance_type),
            _ => String::new(),
        }
    }

    pub fn is_known(&self, name: &str) -> bool {
        match name {
            "zone_id" => !self.zone_id.is_unknown(),
            "period" => !self.period.is_unknown(),
            "vpc_id" => !self.vpc_id.is_unknown(),
            "subnet_id" => !self.subnet_id.is_unknown(),
            "renew_flag" => !self.renew_flag.is_unknown(),
            "kafka_version" => !self.kafka_version.is_unknown(),
            "multi_zone_flag" => !self.multi_zone_flag.is_unknown(),
            "zone_ids" => {
                !self.zone_ids.is_unknown()
                    && !self.zone_ids.iter().flatten().any(Value::is_unknown)
            }
            "disk_type" => !self.disk_type.is_unknown(),
            "specifications_type" => !self.specifications_type.is_unknown(),
            "instance_type" => !self.instance_type.is_unknown(),
            _ => true,
        }
    }

    pub fn create_request(&self) -> CreateInstanceRequest {
        let charge_type = self.charge_type();
        let multi_zone = self.multi_zone_flag.as_ref_option().copied() == Some(true);
        CreateInstanceRequest {
            instance_name: self.instance_name.as_str().to_owned(),
            zone_id: number(&self.zone_id).unwrap_or_default(),
            period: match charge_type {
                ChargeType::Prepaid => number(&self.period)
                    .filter(|period| *period != 0)
                    .map(|period| format!("{period}m")),
                ChargeType::Postpaid => None,
            },
            instance_type: number(&self.instance_type).unwrap_or(1),
            vpc_id: string(&self.vpc_id),
            subnet_id: string(&self.subnet_id),
            msg_retention_time: None,
            renew_flag: match charge_type {
                ChargeType::Prepaid => number(&self.renew_flag).filter(|flag| *flag != 0),
                ChargeType::Postpaid => None,
            },
            kafka_version: string(&self.kafka_version),
            specifications_type: string(&self.specifications_type),
            disk_size: number(&self.disk_size).filter(|size| *size != 0),
            band_width: number(&self.band_width).filter(|width| *width != 0),
            partition: number(&self.partition).filter(|partition| *partition != 0),
            tags: self
                .tags
                .iter()
                .flatten()
                .filter_map(|tag| {
                    let tag = tag.as_ref_option()?;
                    Some(Tag {
                        tag_key: tag.key.as_ref_option()?.clone(),
                        tag_value: tag.value.as_ref_option().cloned().unwrap_or_default(),
                    })
                })
                .collect(),
            disk_type: string(&self.disk_type),
            multi_zone_flag: multi_zone.then_some(true),
            zone_ids: if multi_zone {
                self.zone_ids
                    .iter()
                    .flatten()
                    .filter_map(|id| id.as_ref_option().copied())
                    .collect()
            } else {
                Vec::new()
            },
        }
    }

    /// Fill the state from `DescribeInstancesDetail`
    pub fn set_detail(&mut self, detail: &InstanceDetail) {
        self.instance_name = string_value(detail.instance_name.clone());
        self.vip = string_value(detail.vip.clone());
        self.vport = string_value(detail.vport.clone());
        self.zone_id = value(detail.zone_id);
        // Basic network instances report empty network ids
        self.vpc_id = string_value(detail.vpc_id.clone().filter(|id| !id.is_empty()));
        self.subnet_id = string_value(detail.subnet_id.clone().filter(|id| !id.is_empty()));
        self.renew_flag = value(detail.renew_flag);
        self.kafka_version = string_value(detail.version.clone());
        self.disk_size = value(detail.disk_size);
        self.disk_type = string_value(detail.disk_type.clone());
        self.partition = value(detail.max_partition_number);
        // MB/s, the API reports Mbit/s
        self.band_width = value(detail.bandwidth.map(|bandwidth| bandwidth / 8));

        match detail.instance_type.as_deref() {
            Some("profession") => {
                self.specifications_type = Value::Value(Cow::Borrowed("profession"));
                self.instance_type = Value::Value(1);
            }
            Some(instance_type) => {
                self.specifications_type = Value::Value(Cow::Borrowed("standard"));
                self.instance_type = value(INSTANCE_TYPE.get(instance_type).copied());
            }
            None => (),
        }

        if let Some(zone_ids) = detail.zone_ids.as_ref().filter(|ids| ids.len() > 1) {
            self.multi_zone_flag = Value::Value(true);
            self.zone_ids = Value::Value(zone_ids.iter().copied().map(Value::Value).collect());
        } else if self.multi_zone_flag.is_unknown() {
            self.multi_zone_flag = Value::Null;
        }

        self.tags = Value::Value(
            detail
                .tags
                .iter()
                .flatten()
                .map(|tag| {
                    Value::Value(InstanceTag {
                        key: Value::Value(tag.tag_key.clone()),
                        value: Value::Value(tag.tag_value.clone()),
                    })
                })
                .collect(),
        );
    }

    /// Fill the state from `DescribeInstanceAttributes`
    pub fn set_attributes(&mut self, attributes: &InstanceAttributes) {
        self.msg_retention_time = value(attributes.msg_retention_time);
        self.public_network = value(attributes.public_network);

        if let Some(config) = &attributes.config {
            self.config = Value::Value(vec![Value::Value(InstanceConfigBlock {
                auto_create_topic_enable: value(config.auto_create_topics_enable),
                default_num_partitions: value(config.default_num_partitions),
                default_replication_factor: value(config.default_replication_factor),
            })]);
        }

        // A disabled policy stays out of an unconfigured state
        if let Some(retention) = &attributes.retention_time_config {
            let enabled = retention.enable.is_some_and(|enable| enable != 0);
            if enabled || self.dynamic_retention_block().is_some() {
                let block = DynamicRetentionBlock {
                    enable: value(retention.enable),
                    disk_quota_percentage: value(retention.disk_quota_percentage),
                    step_forward_percentage: value(retention.step_forward_percentage),
                    bottom_retention: value(retention.bottom_retention),
                };
                self.dynamic_retention_config = Value::Value(vec![Value::Value(block)]);
            }
        }
    }

    pub fn set_tag_set(&mut self, tags: BTreeMap<String, String>) {
        self.tag_set = Value::Value(
            tags.into_iter()
                .map(|(key, value)| (Cow::Owned(key), Value::Value(Cow::Owned(value))))
                .collect(),
        );
    }

    /// Computed leftovers of the plan which the API did not report
    pub fn resolve_unknowns(&mut self) {
        fn null_if_unknown<T>(value: &mut Value<T>) {
            if value.is_unknown() {
                *value = Value::Null;
            }
        }
        null_if_unknown(&mut self.instance_type);
        null_if_unknown(&mut self.msg_retention_time);
        null_if_unknown(&mut self.renew_flag);
        null_if_unknown(&mut self.kafka_version);
        null_if_unknown(&mut self.band_width);
        null_if_unknown(&mut self.disk_size);
        null_if_unknown(&mut self.partition);
        null_if_unknown(&mut self.tags);
        null_if_unknown(&mut self.tag_set);
        null_if_unknown(&mut self.disk_type);
        null_if_unknown(&mut self.public_network);
        null_if_unknown(&mut self.max_message_byte);
        null_if_unknown(&mut self.vip);
        null_if_unknown(&mut self.vport);
        if let Value::Value(blocks) = &mut self.dynamic_retention_config {
            for block in blocks.iter_mut().flatten() {
                null_if_unknown(&mut block.enable);
                null_if_unknown(&mut block.disk_quota_percentage);
                null_if_unknown(&mut block.step_forward_percentage);
                null_if_unknown(&mut block.bottom_retention);
            }
        }
    }
}

impl<'a> WithNormalize for InstanceState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.specifications_type.is_null() {
            self.specifications_type = Value::Value(Cow::Borrowed(DEFAULT_SPECIFICATIONS_TYPE));
        }
        if self.charge_type.is_null() {
            self.charge_type = Value::Value(Cow::Borrowed(ChargeType::Prepaid.as_str()));
        }
        if self.upgrade_strategy.is_null() {
            self.upgrade_strategy = Value::Value(DEFAULT_UPGRADE_STRATEGY);
        }
    }
}

impl<'a> InstanceState<'a> {
    /// Computed attributes not set in the configuration are known after apply
    pub fn mark_computed_unknown(&mut self) {
        self.id = Value::Unknown;
        self.vip = Value::Unknown;
        self.vport = Value::Unknown;
        unknown_if_null(&mut self.instance_type);
        unknown_if_null(&mut self.msg_retention_time);
        unknown_if_null(&mut self.renew_flag);
        unknown_if_null(&mut self.kafka_version);
        unknown_if_null(&mut self.band_width);
        unknown_if_null(&mut self.disk_size);
        unknown_if_null(&mut self.partition);
        unknown_if_null(&mut self.tags);
        unknown_if_null(&mut self.tag_set);
        unknown_if_null(&mut self.disk_type);
        unknown_if_null(&mut self.public_network);
        if let Value::Value(blocks) = &mut self.dynamic_retention_config {
            for block in blocks.iter_mut().flatten() {
                block.mark_unknown();
            }
        }
    }
}

#[async_trait]
impl<'a> WithValidate for InstanceState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Some(charge_type) = self.charge_type.as_deref_option() {
            if !ChargeType::VALUES.contains(&charge_type) {
                diags.error(
                    "Invalid charge type".to_owned(),
                    format!(
                        "`charge_type` must be one of {}, got `{charge_type}`",
                        ChargeType::VALUES.join(", ")
                    ),
                    attr_path.clone().attribute("charge_type"),
                );
            }
        }
        if let Some(specifications_type) = self.specifications_type.as_deref_option() {
            if !SPECIFICATIONS_TYPES.contains(&specifications_type) {
                diags.error(
                    "Invalid specifications type".to_owned(),
                    format!("`specifications_type` must be one of standard, profession, got `{specifications_type}`"),
                    attr_path.clone().attribute("specifications_type"),
                );
            }
        }
        if let Some(instance_type) = self.instance_type.as_ref_option() {
            if !(1..=9).contains(instance_type) {
                diags.error(
                    "Invalid instance type".to_owned(),
                    format!("`instance_type` must be between 1 and 9, got {instance_type}"),
                    attr_path.clone().attribute("instance_type"),
                );
            }
        }
        if let Some(max_message_byte) = self.max_message_byte.as_ref_option() {
            if !MAX_MESSAGE_BYTE_RANGE.contains(max_message_byte) {
                diags.error(
                    "Invalid max message byte".to_owned(),
                    format!(
                        "`max_message_byte` must be between {} and {}, got {max_message_byte}",
                        MAX_MESSAGE_BYTE_RANGE.start(),
                        MAX_MESSAGE_BYTE_RANGE.end()
                    ),
                    attr_path.clone().attribute("max_message_byte"),
                );
            }
        }
        if let Value::Value(zone_ids) = &self.zone_ids {
            if !zone_ids.is_empty()
                && !self.multi_zone_flag.is_unknown()
                && self.multi_zone_flag.as_ref_option() != Some(&true)
            {
                diags.error(
                    "Missing multi zone flag".to_owned(),
                    "`zone_ids` requires `multi_zone_flag` to be true".to_owned(),
                    attr_path.clone().attribute("zone_ids"),
                );
            }
        }
        if !self.tags.is_null() && !self.tag_set.is_null() {
            diags.error(
                "Conflicting attributes".to_owned(),
                "`tags` conflicts with `tag_set`, use `tag_set` only".to_owned(),
                attr_path.clone().attribute("tags"),
            );
        }
        for (name, count) in [
            ("config", self.config.as_ref_option().map(Vec::len)),
            (
                "dynamic_retention_config",
                self.dynamic_retention_config.as_ref_option().map(Vec::len),
            ),
        ] {
            if count.unwrap_or_default() > 1 {
                diags.error(
                    "Too many blocks".to_owned(),
                    format!("At most one `{name}` block is allowed"),
                    attr_path.clone().attribute(name),
                );
            }
        }
    }
}

fn number_attribute(constraint: AttributeConstraint, description: &str) -> Attribute {
    attribute(AttributeType::Number, constraint, description)
}

fn string_attribute(constraint: AttributeConstraint, description: &str) -> Attribute {
    attribute(AttributeType::String, constraint, description)
}

impl<'a> WithSchema for InstanceState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, OptionalComputed, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Use this resource to create a ckafka instance."),
                attributes: map! {
                    "id" => string_attribute(Computed, "ID of the instance."),
                    "instance_name" => string_attribute(Required, "Instance name."),
                    "zone_id" => number_attribute(Required, "Available zone id."),
                    "specifications_type" => string_attribute(
                        OptionalComputed,
                        "Specifications type of instance. Allowed values are `standard`, `profession`. Default is `profession`.",
                    ),
                    "charge_type" => string_attribute(
                        OptionalComputed,
                        "The charge type of instance. Valid values are `PREPAID` and `POSTPAID_BY_HOUR`. Default is `PREPAID`. Changing it recreates the instance.",
                    ),
                    "period" => number_attribute(
                        Optional,
                        "Prepaid purchase time, such as 1, is one month.",
                    ),
                    "instance_type" => number_attribute(
                        OptionalComputed,
                        "Description of instance type. `profession`: 1, `standard`: 1(general), 2(standard), 3(advanced), 4(capacity), 5(specialized-1), 6(specialized-2), 7(specialized-3), 8(specialized-4), 9(exclusive).",
                    ),
                    "upgrade_strategy" => number_attribute(
                        OptionalComputed,
                        "POSTPAID_BY_HOUR scale-down mode\n- 1: stable transformation;\n- 2: High-speed transformer.",
                    ),
                    "vpc_id" => string_attribute(
                        Optional,
                        "Vpc id, it will be basic network if not set.",
                    ),
                    "subnet_id" => string_attribute(
                        Optional,
                        "Subnet id, it will be basic network if not set.",
                    ),
                    "msg_retention_time" => number_attribute(
                        OptionalComputed,
                        "The maximum retention time of instance logs, unit is minute, the default is 10080 (7 days), the maximum is 30 days.",
                    ),
                    "renew_flag" => number_attribute(
                        OptionalComputed,
                        "Prepaid automatic renewal mark, 0 means the default state, the initial state, 1 means automatic renewal, 2 means clear no automatic renewal (user setting).",
                    ),
                    "kafka_version" => string_attribute(
                        OptionalComputed,
                        "Kafka version (0.10.2/1.1.1/2.4.1).",
                    ),
                    "band_width" => number_attribute(
                        OptionalComputed,
                        "Instance bandwidth in MBps.",
                    ),
                    "disk_size" => number_attribute(
                        OptionalComputed,
                        "Disk Size. Its interval varies with bandwidth, and the input must be within the interval, which can be viewed through the control. If it is not within the interval, the plan will cause a change when first created.",
                    ),
                    "partition" => number_attribute(
                        OptionalComputed,
                        "Partition size, the professional version does not need tag.",
                    ),
                    "multi_zone_flag" => attribute(
                        AttributeType::Bool,
                        Optional,
                        "Indicates whether the instance is multi zones. NOTE: if set to `true`, `zone_ids` must set together.",
                    ),
                    "zone_ids" => attribute(
                        AttributeType::Set(AttributeType::Number.into()),
                        Optional,
                        "List of available zone id. NOTE: this argument must set together with `multi_zone_flag`.",
                    ),
                    "tags" => Attribute {
                        deprecated: true,
                        ..attribute(
                            AttributeType::List(
                                AttributeType::Object(map! {
                                    "key" => AttributeType::String,
                                    "value" => AttributeType::String,
                                })
                                .into(),
                            ),
                            OptionalComputed,
                            "Tag set of instance. It has been deprecated from version 1.78.5, use `tag_set` instead.",
                        )
                    },
                    "tag_set" => attribute(
                        AttributeType::Map(AttributeType::String.into()),
                        OptionalComputed,
                        "Tag set of instance.",
                    ),
                    "disk_type" => string_attribute(
                        OptionalComputed,
                        "Type of instance disk, `CLOUD_BASIC`, `CLOUD_SSD`. Default is `CLOUD_BASIC`.",
                    ),
                    "rebalance_time" => number_attribute(
                        Optional,
                        "Modification of the rebalancing time after upgrade.",
                    ),
                    "public_network" => Attribute {
                        deprecated: true,
                        ..number_attribute(
                            OptionalComputed,
                            "Timestamp. It has been deprecated, the public network bandwidth is managed outside of the instance.",
                        )
                    },
                    "max_message_byte" => number_attribute(
                        OptionalComputed,
                        "The size of a single message in bytes at the instance level. Value range: `1024 - 12*1024*1024` bytes (i.e., 1KB-12MB).",
                    ),
                    "vip" => string_attribute(Computed, "Vip of instance."),
                    "vport" => string_attribute(Computed, "Type of instance."),
                },
                blocks: map! {
                    "config" => NestedBlock::List(Block {
                        version: 1,
                        description: Description::plain("Instance configuration, at most one block."),
                        attributes: map! {
                            "auto_create_topic_enable" => attribute(
                                AttributeType::Bool,
                                Required,
                                "Automatic creation. true: enabled, false: not enabled.",
                            ),
                            "default_num_partitions" => number_attribute(
                                Required,
                                "If auto.create.topic.enable is set to true and this value is not set, 3 will be used by default.",
                            ),
                            "default_replication_factor" => number_attribute(
                                Required,
                                "If auto.create.topic.enable is set to true but this value is not set, 2 will be used by default.",
                            ),
                        },
                        ..Default::default()
                    }),
                    "dynamic_retention_config" => NestedBlock::List(Block {
                        version: 1,
                        description: Description::plain("Dynamic message retention policy configuration, at most one block."),
                        attributes: map! {
                            "enable" => number_attribute(
                                OptionalComputed,
                                "Whether the dynamic message retention time configuration is enabled. 0: disabled; 1: enabled.",
                            ),
                            "disk_quota_percentage" => number_attribute(
                                OptionalComputed,
                                "Disk quota threshold (in percentage) for triggering the message retention time change event.",
                            ),
                            "step_forward_percentage" => number_attribute(
                                OptionalComputed,
                                "Percentage by which the message retention time is shortened each time.",
                            ),
                            "bottom_retention" => number_attribute(
                                OptionalComputed,
                                "Minimum retention time, in minutes.",
                            ),
                        },
                        ..Default::default()
                    }),
                },
                ..Default::default()
            },
        }
    }
}
