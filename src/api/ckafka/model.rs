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

//! Request and response bodies of the CKafka API, version 2019-08-19

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub tag_key: String,
    #[serde(default)]
    pub tag_value: String,
}

/// `Response.Result` of most actions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ResultEnvelope<T> {
    pub result: Option<T>,
}

/// Outcome of the asynchronous operations
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperateResponse {
    pub return_code: Option<String>,
    pub return_message: Option<String>,
    pub data: Option<OperateData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperateData {
    pub flow_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct InstanceIdRequest<'a> {
    pub instance_id: &'a str,
}

// Instances

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateInstanceRequest {
    pub instance_name: String,
    pub zone_id: i64,
    /// Prepaid only, as `<months>m`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    pub instance_type: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg_retention_time: Option<i64>,
    /// Prepaid only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renew_flag: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kafka_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specifications_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_zone_flag: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub zone_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct CreateInstanceResult {
    pub data: Option<CreateInstanceData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct CreateInstanceData {
    pub instance_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceDetail {
    pub instance_id: Option<String>,
    pub instance_name: Option<String>,
    pub vip: Option<String>,
    pub vport: Option<String>,
    pub status: Option<i64>,
    pub bandwidth: Option<i64>,
    pub disk_size: Option<i64>,
    pub zone_id: Option<i64>,
    pub vpc_id: Option<String>,
    pub subnet_id: Option<String>,
    pub renew_flag: Option<i64>,
    pub healthy: Option<i64>,
    pub create_time: Option<i64>,
    pub expire_time: Option<i64>,
    pub tags: Option<Vec<Tag>>,
    pub version: Option<String>,
    pub zone_ids: Option<Vec<i64>>,
    pub instance_type: Option<String>,
    pub disk_type: Option<String>,
    pub max_topic_number: Option<i64>,
    pub max_partition_number: Option<i64>,
    pub rebalance_time: Option<String>,
    pub public_network: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DescribeInstancesDetailRequest<'a> {
    pub instance_id: &'a str,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct InstanceDetailList {
    pub total_count: Option<i64>,
    #[serde(default)]
    pub instance_list: Vec<InstanceDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceAttributes {
    pub instance_id: Option<String>,
    pub instance_name: Option<String>,
    pub status: Option<i64>,
    pub msg_retention_time: Option<i64>,
    pub config: Option<InstanceConfig>,
    pub retention_time_config: Option<DynamicRetentionConfig>,
    pub public_network: Option<i64>,
    pub created_topics: Option<i64>,
    pub created_partitions: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceConfig {
    pub auto_create_topics_enable: Option<bool>,
    pub default_num_partitions: Option<i64>,
    pub default_replication_factor: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DynamicRetentionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_quota_percentage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_forward_percentage: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_retention: Option<i64>,
}

/// Cluster configuration, note the singular `Topic` compared to [`InstanceConfig`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyInstanceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_create_topic_enable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_num_partitions: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_replication_factor: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyInstanceAttributesRequest {
    pub instance_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg_retention_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<ModifyInstanceConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_retention_config: Option<DynamicRetentionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebalance_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_network: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_message_byte: Option<i64>,
}

impl ModifyInstanceAttributesRequest {
    /// Whether the request carries at least one attribute to change
    pub fn has_changes(&self) -> bool {
        self.msg_retention_time.is_some()
            || self.instance_name.is_some()
            || self.config.is_some()
            || self.dynamic_retention_config.is_some()
            || self.rebalance_time.is_some()
            || self.public_network.is_some()
            || self.max_message_byte.is_some()
    }
}

/// Scaling request, for both `InstanceScalingDown` and `ModifyInstancePre`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScaleInstanceRequest {
    pub instance_id: String,
    /// Postpaid only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_strategy: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<i64>,
}

// Topics

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateTopicRequest {
    pub instance_id: String,
    pub topic_name: String,
    pub partition_num: i64,
    pub replica_num: i64,
    pub enable_white_list: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ip_white_list: Vec<String>,
    pub clean_up_policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub min_insync_replicas: i64,
    pub unclean_leader_election_enable: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_message_bytes: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct CreateTopicResult {
    pub topic_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyTopicAttributesRequest {
    pub instance_id: String,
    pub topic_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_white_list: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_insync_replicas: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unclean_leader_election_enable: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_ms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_message_bytes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_up_policy: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DescribeTopicDetailRequest<'a> {
    pub instance_id: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub search_word: &'a str,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct TopicDetailList {
    #[serde(default)]
    pub topic_list: Vec<TopicDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicDetail {
    pub topic_name: Option<String>,
    pub topic_id: Option<String>,
    pub partition_num: Option<i64>,
    pub replica_num: Option<i64>,
    pub note: Option<String>,
    pub create_time: Option<i64>,
    pub enable_white_list: Option<bool>,
    pub ip_white_list_count: Option<i64>,
    pub forward_cos_bucket: Option<String>,
    pub forward_status: Option<i64>,
    pub forward_interval: Option<i64>,
    pub config: Option<TopicConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicConfig {
    pub retention: Option<i64>,
    pub min_insync_replicas: Option<i64>,
    pub clean_up_policy: Option<String>,
    pub segment_ms: Option<i64>,
    pub unclean_leader_election_enable: Option<i64>,
    pub segment_bytes: Option<i64>,
    pub max_message_bytes: Option<i64>,
    pub retention_bytes: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct TopicRequest<'a> {
    pub instance_id: &'a str,
    pub topic_name: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopicAttributes {
    pub topic_id: Option<String>,
    pub create_time: Option<i64>,
    pub note: Option<String>,
    pub partition_num: Option<i64>,
    pub enable_white_list: Option<i64>,
    pub ip_white_list: Option<Vec<String>>,
    pub config: Option<TopicConfig>,
    pub replica_num: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct TopicIpWhiteListRequest<'a> {
    pub instance_id: &'a str,
    pub topic_name: &'a str,
    pub ip_white_list: &'a [String],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct CreatePartitionRequest<'a> {
    pub instance_id: &'a str,
    pub topic_name: &'a str,
    pub partition_num: i64,
}

// Users

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct UserRequest<'a> {
    pub instance_id: &'a str,
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_new: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DescribeUserRequest<'a> {
    pub instance_id: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub search_word: &'a str,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct UserList {
    pub users: Option<Vec<User>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

// ACLs

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AclRequest {
    pub instance_id: String,
    pub resource_type: i64,
    pub resource_name: String,
    pub operation: i64,
    pub permission_type: i64,
    pub host: String,
    pub principal: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DescribeAclRequest<'a> {
    pub instance_id: &'a str,
    pub resource_type: i64,
    pub resource_name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub search_word: &'a str,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct AclList {
    #[serde(default)]
    pub acl_list: Vec<Acl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Acl {
    pub resource_type: Option<i64>,
    pub resource_name: Option<String>,
    pub principal: Option<String>,
    pub host: Option<String>,
    pub operation: Option<i64>,
    pub permission_type: Option<i64>,
}

// Connect resources

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ResourceIdRequest<'a> {
    pub resource_id: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ResourceIdResult {
    pub resource_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct StatusResult {
    pub status: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectResourceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_word: Option<String>,
    pub offset: i64,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_region: Option<String>,
}

// Datahub

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDatahubTopicRequest {
    pub name: String,
    pub partition_num: i64,
    pub retention_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct CreateDatahubTopicResult {
    pub topic_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModifyDatahubTopicRequest {
    pub name: String,
    pub retention_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct NameRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatahubTopic {
    pub name: Option<String>,
    pub topic_name: Option<String>,
    pub topic_id: Option<String>,
    pub partition_num: Option<i64>,
    pub retention_ms: Option<i64>,
    pub note: Option<String>,
    pub user_name: Option<String>,
    pub status: Option<i64>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatahubTaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DatahubTaskPageRequest<'a> {
    #[serde(flatten)]
    pub filter: &'a DatahubTaskFilter,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DatahubTaskList<T> {
    pub task_list: Option<Vec<T>>,
}

// Routes

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateRouteRequest {
    pub instance_id: String,
    pub vip_type: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_flag: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_appid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_network: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct RouteRequest<'a> {
    pub instance_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct FlowRequest {
    pub flow_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct RouteList {
    #[serde(default)]
    pub routers: Vec<Route>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Route {
    pub route_id: Option<i64>,
    pub access_type: Option<i64>,
    pub vip_type: Option<i64>,
    #[serde(default)]
    pub vip_list: Vec<VipEntity>,
    pub domain: Option<String>,
    pub domain_port: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VipEntity {
    pub vip: Option<String>,
    pub vport: Option<String>,
}
