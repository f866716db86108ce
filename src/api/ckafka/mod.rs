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

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use lazy_static::lazy_static;
use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};
use tracing::{error, warn};

use crate::utils::log_id;

use super::retry::{
    retry, retryable, retryable_with, wait_for_state, RetryError, READ_RETRY_TIMEOUT,
    WRITE_RETRY_TIMEOUT,
};
use super::tag::TagService;
use super::{ApiError, Client, CKAFKA};

mod model;
pub use model::*;

/// Page size of the user and ACL listings
pub const DESCRIBE_LIMIT: i64 = 50;
/// Page size of the topic and datahub task listings
pub const PAGE_LIMIT: i64 = 20;
pub const ACL_PRINCIPAL_PREFIX: &str = "User:";
/// Status of a connect resource ready to be used
pub const CONNECT_RESOURCE_READY: &str = "1";
const TASK_SUCCEEDED: &str = "0";
const TASK_RUNNING: &str = "2";

const INSTANCE_NOT_FOUND: &[&str] = &[
    "InvalidParameterValue.InstanceNotExist",
    "ResourceNotFound.InstanceNotExist",
    "FailedOperation",
];

lazy_static! {
    /// Instance types reported by `DescribeInstancesDetail`, for standard instances
    pub static ref INSTANCE_TYPE: HashMap<&'static str, i64> = HashMap::from([
        ("general", 1),
        ("standard", 2),
        ("advanced", 3),
        ("capacity", 4),
        ("specialized-1", 5),
        ("specialized-2", 6),
        ("specialized-3", 7),
        ("specialized-4", 8),
        ("exclusive", 9),
    ]);
    pub static ref ACL_RESOURCE_TYPE: HashMap<&'static str, i64> = HashMap::from([
        ("UNKNOWN", 0),
        ("ANY", 1),
        ("TOPIC", 2),
        ("GROUP", 3),
        ("CLUSTER", 4),
        ("TRANSACTIONAL_ID", 5),
    ]);
    pub static ref ACL_OPERATION: HashMap<&'static str, i64> = HashMap::from([
        ("UNKNOWN", 0),
        ("ANY", 1),
        ("ALL", 2),
        ("READ", 3),
        ("WRITE", 4),
        ("CREATE", 5),
        ("DELETE", 6),
        ("ALTER", 7),
        ("DESCRIBE", 8),
        ("CLUSTER_ACTION", 9),
        ("DESCRIBE_CONFIGS", 10),
        ("ALTER_CONFIGS", 11),
        ("IDEMPOTEN_WRITE", 12),
    ]);
    pub static ref ACL_PERMISSION_TYPE: HashMap<&'static str, i64> = HashMap::from([
        ("UNKNOWN", 0),
        ("ANY", 1),
        ("DENY", 2),
        ("ALLOW", 3),
    ]);
}

/// Reverse lookup of the enumeration maps above
pub fn enum_name(map: &HashMap<&'static str, i64>, value: i64) -> Option<&'static str> {
    map.iter()
        .find_map(|(name, v)| (*v == value).then_some(*name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeType {
    Prepaid,
    Postpaid,
}

impl ChargeType {
    pub const VALUES: [&'static str; 2] = ["PREPAID", "POSTPAID_BY_HOUR"];

    pub fn as_str(self) -> &'static str {
        match self {
            ChargeType::Prepaid => "PREPAID",
            ChargeType::Postpaid => "POSTPAID_BY_HOUR",
        }
    }
}

impl FromStr for ChargeType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PREPAID" => Ok(ChargeType::Prepaid),
            "POSTPAID_BY_HOUR" => Ok(ChargeType::Postpaid),
            _ => Err(anyhow!("invalid `charge_type` value")),
        }
    }
}

fn has_code(err: &anyhow::Error, codes: &[&str]) -> bool {
    err.downcast_ref::<ApiError>()
        .is_some_and(|api| codes.contains(&api.code()))
}

/// The API reports a missing object with a `ResourceNotFound` family code
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ApiError>()
        .is_some_and(|api| api.code().starts_with("ResourceNotFound"))
}

fn flow_id(action: &str, result: Option<OperateResponse>) -> Result<i64> {
    result
        .and_then(|result| result.data)
        .and_then(|data| data.flow_id)
        .ok_or_else(|| anyhow!("TencentCloud SDK returns empty flow ID, {action}"))
}

fn check_operation(action: &str, result: Option<OperateResponse>) -> Result<()> {
    match result {
        Some(OperateResponse {
            return_code: Some(code),
            ..
        }) if code == "0" => Ok(()),
        Some(OperateResponse {
            return_code,
            return_message,
            ..
        }) => Err(anyhow!(
            "{action} failed with return code {}: {}",
            return_code.unwrap_or_default(),
            return_message.unwrap_or_default()
        )),
        None => Err(anyhow!("TencentCloud SDK return nil response, {action}")),
    }
}

#[derive(Debug, Clone)]
pub struct CkafkaService {
    client: Arc<Client>,
    log_id: String,
}

impl CkafkaService {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            log_id: log_id(),
        }
    }

    pub fn region(&self) -> &str {
        self.client.region()
    }

    pub fn tags(&self) -> TagService {
        TagService::new(self.client.clone(), self.log_id.clone())
    }

    async fn invoke<Req, Resp>(&self, action: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        Ok(self
            .client
            .call(&self.log_id, CKAFKA, action, request)
            .await?)
    }

    /// Call `action` and extract `Response.Result`
    async fn invoke_result<Req, T>(&self, action: &str, request: &Req) -> Result<Option<T>>
    where
        Req: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let envelope: ResultEnvelope<T> = self.invoke(action, request).await?;
        Ok(envelope.result)
    }

    /// Call `action` until it goes through, or a non retryable error is raised
    async fn invoke_retry<Req, T>(
        &self,
        timeout: Duration,
        action: &str,
        request: &Req,
    ) -> Result<Option<T>>
    where
        Req: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        retry(timeout, move || async move {
            self.invoke_result(action, request)
                .await
                .map_err(retryable)
        })
        .await
    }

    // Instances

    pub async fn create_instance(
        &self,
        charge_type: ChargeType,
        request: &CreateInstanceRequest,
    ) -> Result<String> {
        let action = match charge_type {
            ChargeType::Prepaid => "CreateInstancePre",
            ChargeType::Postpaid => "CreatePostPaidInstance",
        };
        let result: Option<CreateInstanceResult> = self.invoke_result(action, request).await?;
        match result.and_then(|result| result.data?.instance_id) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(anyhow!(
                "TencentCloud SDK returns empty ckafka instance ID, {action}"
            )),
        }
    }

    pub async fn describe_instance_detail(&self, instance_id: &str) -> Result<Option<InstanceDetail>> {
        let request = DescribeInstancesDetailRequest {
            instance_id,
            offset: 0,
            limit: 1,
        };
        let list: Option<InstanceDetailList> = self
            .invoke_retry(READ_RETRY_TIMEOUT, "DescribeInstancesDetail", &request)
            .await?;
        Ok(list.and_then(|list| {
            list.instance_list
                .into_iter()
                .find(|instance| instance.instance_id.as_deref() == Some(instance_id))
        }))
    }

    /// Whether the instance exists, and whether it is running
    pub async fn check_instance_ready(&self, instance_id: &str) -> Result<(bool, bool)> {
        let request = DescribeInstancesDetailRequest {
            instance_id,
            offset: 0,
            limit: 1,
        };
        let list: Option<InstanceDetailList> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "DescribeInstancesDetail", &request)
            .await
            .inspect_err(|err| {
                error!("{} read ckafka instance failed, reason: {err:#}", self.log_id)
            })?;
        match list.and_then(|list| list.instance_list.into_iter().next()) {
            Some(instance) => Ok((true, instance.status == Some(1))),
            None => Ok((false, false)),
        }
    }

    pub async fn wait_instance_ready(&self, instance_id: &str, timeout: Duration) -> Result<()> {
        retry(timeout, move || async move {
            match self.check_instance_ready(instance_id).await {
                Err(err) => Err(RetryError::NonRetryable(err)),
                Ok((false, _)) => Err(RetryError::NonRetryable(anyhow!(
                    "ckafka instance not exists."
                ))),
                Ok((true, true)) => Ok(()),
                Ok((true, false)) => Err(RetryError::Retryable(anyhow!(
                    "ckafka instance status is still not ready"
                ))),
            }
        })
        .await
    }

    pub async fn wait_instance_deleted(&self, instance_id: &str, timeout: Duration) -> Result<()> {
        retry(timeout, move || async move {
            match self.check_instance_ready(instance_id).await {
                Err(err) => Err(RetryError::NonRetryable(err)),
                Ok((false, _)) => Ok(()),
                Ok((true, _)) => Err(RetryError::Retryable(anyhow!(
                    "delete ckafka instance task is processing"
                ))),
            }
        })
        .await
    }

    pub async fn describe_instance_attributes(
        &self,
        instance_id: &str,
    ) -> Result<Option<InstanceAttributes>> {
        let request = InstanceIdRequest { instance_id };
        let request = &request;
        retry(READ_RETRY_TIMEOUT, move || async move {
            match self
                .invoke_result("DescribeInstanceAttributes", request)
                .await
            {
                Ok(attributes) => Ok(attributes),
                Err(err) if has_code(&err, INSTANCE_NOT_FOUND) => Ok(None),
                Err(err) => Err(retryable(err)),
            }
        })
        .await
    }

    pub async fn modify_instance_attributes(
        &self,
        request: &ModifyInstanceAttributesRequest,
    ) -> Result<()> {
        let _: Option<IgnoredAny> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "ModifyInstanceAttributes", request)
            .await?;
        Ok(())
    }

    pub async fn scale_instance(
        &self,
        charge_type: ChargeType,
        request: &ScaleInstanceRequest,
    ) -> Result<()> {
        let _: Option<IgnoredAny> = match charge_type {
            ChargeType::Postpaid => self.invoke_result("InstanceScalingDown", request).await?,
            ChargeType::Prepaid => {
                let request = ScaleInstanceRequest {
                    upgrade_strategy: None,
                    ..request.clone()
                };
                self.invoke_result("ModifyInstancePre", &request).await?
            }
        };
        Ok(())
    }

    pub async fn delete_instance(&self, charge_type: ChargeType, instance_id: &str) -> Result<()> {
        let action = match charge_type {
            ChargeType::Prepaid => "DeleteInstancePre",
            ChargeType::Postpaid => "DeleteInstancePost",
        };
        let request = InstanceIdRequest { instance_id };
        let request = &request;
        retry(WRITE_RETRY_TIMEOUT, move || async move {
            self.invoke::<_, IgnoredAny>(action, request)
                .await
                .map(|_| ())
                .map_err(|err| retryable_with(err, &["UnsupportedOperation"]))
        })
        .await
    }

    // Topics

    /// All the topics of the instance matching `search_word`, empty if the instance is gone
    pub async fn describe_topics(
        &self,
        instance_id: &str,
        search_word: &str,
    ) -> Result<Vec<TopicDetail>> {
        if self.describe_instance_attributes(instance_id).await?.is_none() {
            return Ok(Vec::new());
        }

        let mut topics = Vec::new();
        let mut offset = 0;
        loop {
            let request = DescribeTopicDetailRequest {
                instance_id,
                search_word,
                offset,
                limit: PAGE_LIMIT,
            };
            let page: Option<TopicDetailList> =
                self.invoke_result("DescribeTopicDetail", &request).await?;
            let Some(page) = page else {
                bail!("TencentCloud SDK return nil response, DescribeTopicDetail");
            };
            let count = page.topic_list.len() as i64;
            topics.extend(page.topic_list);
            if count < PAGE_LIMIT {
                break;
            }
            offset += PAGE_LIMIT;
        }
        Ok(topics)
    }

    pub async fn describe_topic_by_name(
        &self,
        instance_id: &str,
        topic_name: &str,
    ) -> Result<Option<TopicDetail>> {
        let topics = retry(READ_RETRY_TIMEOUT, move || async move {
            self.describe_topics(instance_id, topic_name)
                .await
                .map_err(retryable)
        })
        .await?;
        Ok(topics
            .into_iter()
            .find(|topic| topic.topic_name.as_deref() == Some(topic_name)))
    }

    pub async fn describe_topic_attributes(
        &self,
        instance_id: &str,
        topic_name: &str,
    ) -> Result<TopicAttributes> {
        let request = TopicRequest {
            instance_id,
            topic_name,
        };
        self.invoke_result("DescribeTopicAttributes", &request)
            .await?
            .ok_or_else(|| anyhow!("TencentCloud SDK return nil response, DescribeTopicAttributes"))
    }

    pub async fn create_topic(&self, request: &CreateTopicRequest) -> Result<String> {
        let result: Option<CreateTopicResult> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "CreateTopic", request)
            .await?;
        match result {
            None => bail!("TencentCloud SDK return nil response, CreateTopic"),
            Some(CreateTopicResult {
                topic_id: Some(id),
            }) if !id.is_empty() => Ok(id),
            Some(_) => bail!("TencentCloud SDK returns empty ckafka topic ID, CreateTopic"),
        }
    }

    pub async fn modify_topic_attributes(
        &self,
        request: &ModifyTopicAttributesRequest,
    ) -> Result<()> {
        let _: IgnoredAny = self
            .invoke_result("ModifyTopicAttributes", request)
            .await?
            .ok_or_else(|| anyhow!("TencentCloud SDK return nil response, ModifyTopicAttributes"))?;
        Ok(())
    }

    pub async fn add_topic_ip_white_list(
        &self,
        instance_id: &str,
        topic_name: &str,
        ip_white_list: &[String],
    ) -> Result<()> {
        let request = TopicIpWhiteListRequest {
            instance_id,
            topic_name,
            ip_white_list,
        };
        let _: IgnoredAny = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "CreateTopicIpWhiteList", &request)
            .await?
            .ok_or_else(|| anyhow!("TencentCloud SDK return nil response, CreateTopicIpWhiteList"))?;
        Ok(())
    }

    pub async fn remove_topic_ip_white_list(
        &self,
        instance_id: &str,
        topic_name: &str,
        ip_white_list: &[String],
    ) -> Result<()> {
        let request = TopicIpWhiteListRequest {
            instance_id,
            topic_name,
            ip_white_list,
        };
        let _: IgnoredAny = self
            .invoke_retry(READ_RETRY_TIMEOUT, "DeleteTopicIpWhiteList", &request)
            .await?
            .ok_or_else(|| anyhow!("TencentCloud SDK return nil response, DeleteTopicIpWhiteList"))?;
        Ok(())
    }

    /// Grow the topic to `partition_num` partitions
    pub async fn add_topic_partition(
        &self,
        instance_id: &str,
        topic_name: &str,
        partition_num: i64,
    ) -> Result<()> {
        let request = CreatePartitionRequest {
            instance_id,
            topic_name,
            partition_num,
        };
        let _: IgnoredAny = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "CreatePartition", &request)
            .await?
            .ok_or_else(|| anyhow!("TencentCloud SDK return nil response, CreatePartition"))?;
        Ok(())
    }

    pub async fn delete_topic(&self, instance_id: &str, topic_name: &str) -> Result<()> {
        let request = TopicRequest {
            instance_id,
            topic_name,
        };
        let _: Option<IgnoredAny> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "DeleteTopic", &request)
            .await?;

        retry(READ_RETRY_TIMEOUT, move || async move {
            let topics = self
                .describe_topics(instance_id, topic_name)
                .await
                .map_err(retryable)?;
            if topics
                .iter()
                .any(|topic| topic.topic_name.as_deref() == Some(topic_name))
            {
                Err(RetryError::Retryable(anyhow!(
                    "this Topic {topic_name} Delete Failed"
                )))
            } else {
                Ok(())
            }
        })
        .await
    }

    // Users

    pub async fn create_user(&self, instance_id: &str, name: &str, password: &str) -> Result<()> {
        let request = UserRequest {
            instance_id,
            name,
            password: Some(password),
            password_new: None,
        };
        let result = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "CreateUser", &request)
            .await?;
        check_operation("CreateUser", result)
    }

    /// Look a user up by its exact name, `None` when the instance or the user is gone
    pub async fn describe_user(&self, instance_id: &str, name: &str) -> Result<Option<User>> {
        if self.describe_instance_attributes(instance_id).await?.is_none() {
            return Ok(None);
        }

        let request = DescribeUserRequest {
            instance_id,
            search_word: name,
            offset: 0,
            limit: DESCRIBE_LIMIT,
        };
        let list: Option<UserList> = self
            .invoke_retry(READ_RETRY_TIMEOUT, "DescribeUser", &request)
            .await?;
        let mut users = list
            .and_then(|list| list.users)
            .unwrap_or_default()
            .into_iter()
            .filter(|user| user.name.as_deref() == Some(name));
        match (users.next(), users.next()) {
            (Some(_), Some(_)) => Err(anyhow!("{} duplicated users found", self.log_id)),
            (user, _) => Ok(user),
        }
    }

    pub async fn describe_users(&self, instance_id: &str, account_name: &str) -> Result<Vec<User>> {
        if self.describe_instance_attributes(instance_id).await?.is_none() {
            return Ok(Vec::new());
        }

        let mut users = Vec::new();
        let mut offset = 0;
        loop {
            let request = DescribeUserRequest {
                instance_id,
                search_word: account_name,
                offset,
                limit: DESCRIBE_LIMIT,
            };
            let page: Option<UserList> = self
                .invoke_retry(READ_RETRY_TIMEOUT, "DescribeUser", &request)
                .await?;
            let page = page.and_then(|page| page.users).unwrap_or_default();
            let count = page.len() as i64;
            users.extend(page);
            if count < DESCRIBE_LIMIT {
                break;
            }
            offset += DESCRIBE_LIMIT;
        }
        Ok(users)
    }

    pub async fn modify_password(
        &self,
        instance_id: &str,
        name: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let request = UserRequest {
            instance_id,
            name,
            password: Some(old_password),
            password_new: Some(new_password),
        };
        let result = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "ModifyPassword", &request)
            .await?;
        check_operation("ModifyPassword", result)
    }

    pub async fn delete_user(&self, instance_id: &str, name: &str) -> Result<()> {
        let request = UserRequest {
            instance_id,
            name,
            password: None,
            password_new: None,
        };
        let result = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "DeleteUser", &request)
            .await?;
        check_operation("DeleteUser", result)
    }

    // ACLs

    pub async fn create_acl(&self, request: &AclRequest) -> Result<()> {
        let result = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "CreateAcl", request)
            .await?;
        check_operation("CreateAcl", result)
    }

    pub async fn describe_acls(
        &self,
        instance_id: &str,
        resource_type: &str,
        resource_name: &str,
        host: &str,
    ) -> Result<Vec<Acl>> {
        if self.describe_instance_attributes(instance_id).await?.is_none() {
            return Ok(Vec::new());
        }
        if resource_type == "TOPIC" {
            if let Err(err) = self
                .describe_topic_attributes(instance_id, resource_name)
                .await
            {
                warn!("{} topic {resource_name} not found: {err:#}", self.log_id);
                return Ok(Vec::new());
            }
        }
        let Some(resource_type) = ACL_RESOURCE_TYPE.get(resource_type).copied() else {
            bail!("invalid ACL resource type {resource_type}");
        };

        let mut acls = Vec::new();
        let mut offset = 0;
        loop {
            let request = DescribeAclRequest {
                instance_id,
                resource_type,
                resource_name,
                search_word: host,
                offset,
                limit: DESCRIBE_LIMIT,
            };
            let page: Option<AclList> = self
                .invoke_retry(READ_RETRY_TIMEOUT, "DescribeACL", &request)
                .await?;
            let page = page.map(|page| page.acl_list).unwrap_or_default();
            let count = page.len() as i64;
            acls.extend(page);
            if count < DESCRIBE_LIMIT {
                break;
            }
            offset += DESCRIBE_LIMIT;
        }
        Ok(acls)
    }

    /// Find the ACL entry matching the request
    pub async fn describe_acl(&self, request: &AclRequest) -> Result<Option<Acl>> {
        let resource_type = enum_name(&ACL_RESOURCE_TYPE, request.resource_type).unwrap_or("UNKNOWN");
        let acls = self
            .describe_acls(
                &request.instance_id,
                resource_type,
                &request.resource_name,
                &request.host,
            )
            .await?;
        Ok(acls.into_iter().find(|acl| {
            acl.permission_type == Some(request.permission_type)
                && acl.principal.as_deref() == Some(request.principal.as_str())
                && acl.operation == Some(request.operation)
        }))
    }

    pub async fn delete_acl(&self, request: &AclRequest) -> Result<()> {
        let result = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "DeleteAcl", request)
            .await?;
        check_operation("DeleteAcl", result)
    }

    // Connect resources

    pub async fn create_connect_resource<Req>(&self, request: &Req) -> Result<String>
    where
        Req: Serialize + Sync,
    {
        let result: Option<ResourceIdResult> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "CreateConnectResource", request)
            .await?;
        match result.and_then(|result| result.resource_id) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => bail!("TencentCloud SDK returns empty connect resource ID, CreateConnectResource"),
        }
    }

    pub async fn describe_connect_resource<T>(&self, resource_id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let request = ResourceIdRequest { resource_id };
        match self.invoke_result("DescribeConnectResource", &request).await {
            Err(err) if is_not_found(&err) => Ok(None),
            result => result,
        }
    }

    pub async fn connect_resource_status(&self, resource_id: &str) -> Result<String> {
        let status: Option<StatusResult> = self.describe_connect_resource(resource_id).await?;
        match status.and_then(|status| status.status) {
            Some(status) => Ok(status.to_string()),
            None => bail!("connect resource {resource_id} not found"),
        }
    }

    /// Wait for the connect resource to be usable
    pub async fn wait_connect_resource(&self, resource_id: &str, timeout: Duration) -> Result<()> {
        wait_for_state(
            timeout,
            Duration::from_secs(1),
            &[],
            &[CONNECT_RESOURCE_READY],
            move || self.connect_resource_status(resource_id),
        )
        .await
    }

    pub async fn describe_connect_resources<T>(&self, filter: &ConnectResourceFilter) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.invoke_result("DescribeConnectResources", filter)
            .await?
            .ok_or_else(|| anyhow!("Response is null"))
    }

    pub async fn modify_connect_resource<Req>(&self, request: &Req) -> Result<()>
    where
        Req: Serialize + Sync,
    {
        let _: Option<IgnoredAny> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "ModifyConnectResource", request)
            .await?;
        Ok(())
    }

    pub async fn delete_connect_resource(&self, resource_id: &str) -> Result<()> {
        let request = ResourceIdRequest { resource_id };
        let _: Option<IgnoredAny> = self
            .invoke_result("DeleteConnectResource", &request)
            .await?;
        Ok(())
    }

    // Routes

    /// Create a route and wait for its flow, returning the id of the new route
    pub async fn create_route(&self, request: &CreateRouteRequest) -> Result<i64> {
        let before = self.describe_routes(&request.instance_id).await?;

        let result: Option<OperateResponse> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "CreateRoute", request)
            .await?;
        let flow_id = flow_id("CreateRoute", result)?;
        self.wait_task_status(flow_id, 3 * READ_RETRY_TIMEOUT).await?;

        let after = self.describe_routes(&request.instance_id).await?;
        after
            .iter()
            .filter_map(|route| route.route_id)
            .find(|id| !before.iter().any(|route| route.route_id == Some(*id)))
            .ok_or_else(|| anyhow!("route of flow {flow_id} not found on instance {}", request.instance_id))
    }

    pub async fn describe_routes(&self, instance_id: &str) -> Result<Vec<Route>> {
        let request = RouteRequest {
            instance_id,
            route_id: None,
        };
        let routes: Option<RouteList> = self.invoke_result("DescribeRoute", &request).await?;
        Ok(routes.unwrap_or_default().routers)
    }

    /// `None` when the instance or the route is gone
    pub async fn describe_route(&self, instance_id: &str, route_id: i64) -> Result<Option<Route>> {
        let request = RouteRequest {
            instance_id,
            route_id: Some(route_id),
        };
        let routes: Option<RouteList> =
            match self.invoke_result("DescribeRoute", &request).await {
                Err(err) if is_not_found(&err) => return Ok(None),
                result => result?,
            };
        Ok(routes
            .unwrap_or_default()
            .routers
            .into_iter()
            .find(|route| route.route_id == Some(route_id)))
    }

    pub async fn delete_route(&self, instance_id: &str, route_id: i64) -> Result<()> {
        let request = RouteRequest {
            instance_id,
            route_id: Some(route_id),
        };
        let result: Option<OperateResponse> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "DeleteRoute", &request)
            .await?;
        let flow_id = flow_id("DeleteRoute", result)?;
        self.wait_task_status(flow_id, 3 * READ_RETRY_TIMEOUT).await
    }

    /// Wait for an asynchronous flow, status `2` is running and `1` failed
    pub async fn wait_task_status(&self, flow_id: i64, timeout: Duration) -> Result<()> {
        wait_for_state(
            timeout,
            Duration::from_secs(3),
            &[TASK_RUNNING],
            &[TASK_SUCCEEDED],
            move || async move {
                let status: Option<StatusResult> = self
                    .invoke_result("DescribeTaskStatus", &FlowRequest { flow_id })
                    .await?;
                match status.and_then(|status| status.status) {
                    Some(status) => Ok(status.to_string()),
                    None => bail!("status of flow {flow_id} not found"),
                }
            },
        )
        .await
    }

    // Datahub

    pub async fn create_datahub_topic(&self, request: &CreateDatahubTopicRequest) -> Result<String> {
        let result: Option<CreateDatahubTopicResult> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "CreateDatahubTopic", request)
            .await?;
        Ok(result
            .and_then(|result| result.topic_name)
            .unwrap_or_else(|| request.name.clone()))
    }

    pub async fn describe_datahub_topic(&self, name: &str) -> Result<Option<DatahubTopic>> {
        let request = NameRequest { name };
        match self.invoke_result("DescribeDatahubTopic", &request).await {
            Err(err) if is_not_found(&err) => Ok(None),
            result => result,
        }
    }

    pub async fn modify_datahub_topic(&self, request: &ModifyDatahubTopicRequest) -> Result<()> {
        let _: Option<IgnoredAny> = self
            .invoke_retry(WRITE_RETRY_TIMEOUT, "ModifyDatahubTopic", request)
            .await?;
        Ok(())
    }

    pub async fn delete_datahub_topic(&self, name: &str) -> Result<()> {
        let request = NameRequest { name };
        let _: Option<IgnoredAny> = self.invoke_result("DeleteDatahubTopic", &request).await?;
        Ok(())
    }

    /// All the datahub tasks matching `filter`
    pub async fn describe_datahub_tasks<T>(&self, filter: &DatahubTaskFilter) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut tasks = Vec::new();
        let mut offset = 0;
        loop {
            let request = DatahubTaskPageRequest {
                filter,
                offset,
                limit: PAGE_LIMIT,
            };
            let page: Option<DatahubTaskList<T>> =
                self.invoke_result("DescribeDatahubTasks", &request).await?;
            let page = page.and_then(|page| page.task_list).unwrap_or_default();
            if page.is_empty() {
                break;
            }
            let count = page.len() as i64;
            tasks.extend(page);
            if count < PAGE_LIMIT {
                break;
            }
            offset += PAGE_LIMIT;
        }
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::MockTransport;

    fn service(transport: &Arc<MockTransport>) -> CkafkaService {
        CkafkaService::new(Arc::new(transport.client()))
    }

    #[test]
    fn enum_reverse_lookup() {
        assert_eq!(enum_name(&ACL_OPERATION, 3), Some("READ"));
        assert_eq!(enum_name(&ACL_PERMISSION_TYPE, 3), Some("ALLOW"));
        assert_eq!(enum_name(&ACL_RESOURCE_TYPE, 42), None);
        assert_eq!(INSTANCE_TYPE.get("exclusive"), Some(&9));
    }

    #[test]
    fn charge_type_parse() {
        assert_eq!(
            "POSTPAID_BY_HOUR".parse::<ChargeType>().unwrap(),
            ChargeType::Postpaid
        );
        assert_eq!(ChargeType::Prepaid.as_str(), "PREPAID");
        assert!("MONTHLY".parse::<ChargeType>().is_err());
    }

    #[tokio::test]
    async fn create_instance_by_charge_type() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "CreatePostPaidInstance",
            json!({"Result": {"ReturnCode": "0", "Data": {"InstanceId": "ckafka-post"}}}),
        );
        transport.reply(
            "CreateInstancePre",
            json!({"Result": {"ReturnCode": "0", "Data": {"InstanceId": "ckafka-pre"}}}),
        );
        let service = service(&transport);

        let request = CreateInstanceRequest {
            instance_name: "kafka".into(),
            zone_id: 100003,
            period: Some("1m".into()),
            instance_type: 1,
            ..Default::default()
        };
        assert_eq!(
            service
                .create_instance(ChargeType::Postpaid, &request)
                .await
                .unwrap(),
            "ckafka-post"
        );
        assert_eq!(
            service
                .create_instance(ChargeType::Prepaid, &request)
                .await
                .unwrap(),
            "ckafka-pre"
        );

        let sent = &transport.requests("CreateInstancePre")[0];
        assert_eq!(sent["Period"], "1m");
        assert_eq!(sent["ZoneId"], 100003);
        assert!(sent.get("Tags").is_none());
        assert!(sent.get("VpcId").is_none());
    }

    #[tokio::test]
    async fn empty_instance_id_is_an_error() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "CreatePostPaidInstance",
            json!({"Result": {"ReturnCode": "0", "Data": {}}}),
        );
        let err = service(&transport)
            .create_instance(ChargeType::Postpaid, &Default::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("empty ckafka instance ID"));
    }

    #[tokio::test]
    async fn instance_readiness() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeInstancesDetail",
            json!({"Result": {"TotalCount": 1, "InstanceList": [{"InstanceId": "ckafka-1", "Status": 0}]}}),
        );
        transport.reply(
            "DescribeInstancesDetail",
            json!({"Result": {"TotalCount": 1, "InstanceList": [{"InstanceId": "ckafka-1", "Status": 1}]}}),
        );
        transport.reply(
            "DescribeInstancesDetail",
            json!({"Result": {"TotalCount": 0, "InstanceList": []}}),
        );
        let service = service(&transport);

        assert_eq!(
            service.check_instance_ready("ckafka-1").await.unwrap(),
            (true, false)
        );
        assert_eq!(
            service.check_instance_ready("ckafka-1").await.unwrap(),
            (true, true)
        );
        assert_eq!(
            service.check_instance_ready("ckafka-1").await.unwrap(),
            (false, false)
        );
    }

    #[tokio::test]
    async fn missing_instance_attributes() {
        let transport = Arc::new(MockTransport::default());
        transport.fail(
            "DescribeInstanceAttributes",
            "InvalidParameterValue.InstanceNotExist",
        );
        let service = service(&transport);
        assert!(service
            .describe_instance_attributes("ckafka-1")
            .await
            .unwrap()
            .is_none());
        // No topic listing on a missing instance
        assert!(service.describe_topics("ckafka-1", "").await.unwrap().is_empty());
        assert!(transport.requests("DescribeTopicDetail").is_empty());
    }

    #[tokio::test]
    async fn topics_are_paginated() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        let full_page: Vec<_> = (0..PAGE_LIMIT)
            .map(|i| json!({"TopicName": format!("topic-{i}")}))
            .collect();
        transport.reply("DescribeTopicDetail", json!({"Result": {"TopicList": full_page}}));
        transport.reply(
            "DescribeTopicDetail",
            json!({"Result": {"TopicList": [{"TopicName": "last"}]}}),
        );
        let service = service(&transport);

        let topics = service.describe_topics("ckafka-1", "").await.unwrap();
        assert_eq!(topics.len() as i64, PAGE_LIMIT + 1);

        let requests = transport.requests("DescribeTopicDetail");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0]["Offset"], 0);
        assert_eq!(requests[1]["Offset"], PAGE_LIMIT);
        assert!(requests[0].get("SearchWord").is_none());
    }

    #[tokio::test]
    async fn user_operation_return_code() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "CreateUser",
            json!({"Result": {"ReturnCode": "0", "ReturnMessage": "ok"}}),
        );
        transport.reply(
            "DeleteUser",
            json!({"Result": {"ReturnCode": "1", "ReturnMessage": "busy"}}),
        );
        let service = service(&transport);

        service.create_user("ckafka-1", "alice", "pass").await.unwrap();
        let sent = &transport.requests("CreateUser")[0];
        assert_eq!(sent, &json!({"InstanceId": "ckafka-1", "Name": "alice", "Password": "pass"}));

        let err = service.delete_user("ckafka-1", "alice").await.unwrap_err();
        assert!(err.to_string().contains("busy"));
    }

    #[tokio::test]
    async fn user_exact_match() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply(
            "DescribeUser",
            json!({"Result": {"TotalCount": 2, "Users": [
                {"Name": "alice10", "CreateTime": "2024-01-01 00:00:00"},
                {"Name": "alice", "CreateTime": "2024-01-02 00:00:00"},
            ]}}),
        );
        let user = service(&transport)
            .describe_user("ckafka-1", "alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.create_time.as_deref(), Some("2024-01-02 00:00:00"));
    }

    #[tokio::test]
    async fn acl_lookup() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply(
            "DescribeTopicAttributes",
            json!({"Result": {"TopicId": "topic-1"}}),
        );
        transport.reply(
            "DescribeACL",
            json!({"Result": {"TotalCount": 2, "AclList": [
                {"ResourceType": 2, "ResourceName": "orders", "Principal": "User:bob", "Host": "*", "Operation": 4, "PermissionType": 3},
                {"ResourceType": 2, "ResourceName": "orders", "Principal": "User:alice", "Host": "*", "Operation": 3, "PermissionType": 3},
            ]}}),
        );
        let request = AclRequest {
            instance_id: "ckafka-1".into(),
            resource_type: 2,
            resource_name: "orders".into(),
            operation: 3,
            permission_type: 3,
            host: "*".into(),
            principal: "User:alice".into(),
        };
        let acl = service(&transport)
            .describe_acl(&request)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(acl.operation, Some(3));

        let sent = &transport.requests("DescribeACL")[0];
        assert_eq!(sent["ResourceType"], 2);
        assert_eq!(sent["SearchWord"], "*");
    }

    #[tokio::test]
    async fn datahub_tasks_stop_on_empty_page() {
        let transport = Arc::new(MockTransport::default());
        let full_page: Vec<_> = (0..PAGE_LIMIT)
            .map(|i| json!({"TaskId": format!("task-{i}")}))
            .collect();
        transport.reply("DescribeDatahubTasks", json!({"Result": {"TaskList": full_page}}));
        transport.reply("DescribeDatahubTasks", json!({"Result": {"TaskList": []}}));

        let filter = DatahubTaskFilter {
            task_type: Some("SOURCE".into()),
            ..Default::default()
        };
        let tasks: Vec<serde_json::Value> = service(&transport)
            .describe_datahub_tasks(&filter)
            .await
            .unwrap();
        assert_eq!(tasks.len() as i64, PAGE_LIMIT);

        let requests = transport.requests("DescribeDatahubTasks");
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1]["TaskType"], "SOURCE");
        assert_eq!(requests[1]["Offset"], PAGE_LIMIT);
    }

    #[tokio::test(start_paused = true)]
    async fn connect_resource_wait() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("DescribeConnectResource", json!({"Result": {"Status": 0}}));
        transport.reply("DescribeConnectResource", json!({"Result": {"Status": 1}}));
        service(&transport)
            .wait_connect_resource("resource-1", READ_RETRY_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(transport.requests("DescribeConnectResource").len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn create_route_resolves_new_route() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeRoute",
            json!({"Result": {"Routers": [{"RouteId": 1, "VipType": 1}]}}),
        );
        transport.reply(
            "DescribeRoute",
            json!({"Result": {"Routers": [
                {"RouteId": 1, "VipType": 1},
                {"RouteId": 7, "VipType": 3, "VipList": [{"Vip": "10.0.0.7", "Vport": "9092"}]},
            ]}}),
        );
        transport.reply(
            "CreateRoute",
            json!({"Result": {"ReturnCode": "0", "Data": {"FlowId": 42}}}),
        );
        transport.reply("DescribeTaskStatus", json!({"Result": {"Status": 2}}));
        transport.reply("DescribeTaskStatus", json!({"Result": {"Status": 0}}));

        let request = CreateRouteRequest {
            instance_id: "ckafka-1".into(),
            vip_type: 3,
            vpc_id: Some("vpc-1".into()),
            subnet_id: Some("subnet-1".into()),
            ..Default::default()
        };
        let route_id = service(&transport).create_route(&request).await.unwrap();
        assert_eq!(route_id, 7);
        assert_eq!(transport.requests("DescribeTaskStatus")[0]["FlowId"], 42);
        assert_eq!(transport.requests("CreateRoute")[0]["VpcId"], "vpc-1");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_flow_is_an_error() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("DescribeTaskStatus", json!({"Result": {"Status": 1}}));
        let err = service(&transport)
            .wait_task_status(42, READ_RETRY_TIMEOUT)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unexpected state '1'"));
    }
}
