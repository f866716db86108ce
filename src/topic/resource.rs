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
use std::collections::HashSet;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::api::ckafka::{CkafkaService, ModifyTopicAttributesRequest};
use crate::api::retry::{retry, retryable, RetryError, READ_RETRY_TIMEOUT};
use crate::ckafka_provider::ProviderHandle;
use crate::utils::{
    api_error, changed, join_id, known_state, root_error, split_id, WithNormalize, WithSchema,
    WithValidate,
};

use super::TopicState;

#[derive(Debug, Default, Clone)]
pub struct CkafkaTopicResource {
    handle: ProviderHandle,
}

impl CkafkaTopicResource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }

    async fn read_topic<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        mut state: TopicState<'a>,
    ) -> Option<Value<TopicState<'a>>> {
        let id = state.id.as_str().to_owned();
        let [instance_id, topic_name] = match split_id::<2>(&id, "ckafka_topic") {
            Ok(parts) => parts,
            Err(err) => {
                api_error(diags, "Invalid ckafka topic id", &err);
                return None;
            }
        };

        let detail = match service.describe_topic_by_name(instance_id, topic_name).await {
            Ok(Some(detail)) => detail,
            Ok(None) => {
                warn!("ckafka topic {id} not found, removing it from state");
                return Some(Value::Null);
            }
            Err(err) => {
                api_error(diags, "Failed to read ckafka topic", &err);
                return None;
            }
        };
        let attributes = match service
            .describe_topic_attributes(instance_id, topic_name)
            .await
        {
            Ok(attributes) => attributes,
            Err(err) => {
                api_error(diags, "Failed to read ckafka topic attributes", &err);
                return None;
            }
        };

        state.instance_id = Value::Value(Cow::Owned(instance_id.to_owned()));
        state.set_topic(&detail, &attributes);
        Some(Value::Value(state))
    }

    async fn read_back<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        state: TopicState<'a>,
    ) -> Option<Value<TopicState<'a>>> {
        let id = state.id.as_str().to_owned();
        match self.read_topic(diags, service, state).await? {
            Value::Null => {
                root_error(
                    diags,
                    "Failed to read ckafka topic",
                    format!("ckafka topic {id} not found after apply"),
                );
                None
            }
            state => Some(state),
        }
    }
}

#[async_trait]
impl Resource for CkafkaTopicResource {
    type State<'a> = Value<TopicState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(TopicState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Value::Value(config) = &config {
            config.validate(diags, Default::default()).await;
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Value::Value(state) = state else {
            return Some((state, private_state));
        };
        let service = self.handle.service(diags)?;
        let state = self.read_topic(diags, &service, state).await?;
        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = known_state(diags, proposed_state)?;
        state.normalize(diags);
        state.mark_computed_unknown();
        Some((Value::Value(state), Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<AttributePath>,
    )> {
        let prior = known_state(diags, prior_state)?;
        let mut state = known_state(diags, proposed_state)?;
        state.normalize(diags);

        let mut replace = Vec::new();
        if changed(&prior.instance_id, &state.instance_id) {
            replace.push(AttributePath::new("instance_id"));
        }
        if changed(&prior.topic_name, &state.topic_name) {
            replace.push(AttributePath::new("topic_name"));
        }
        if changed(&prior.replica_num, &state.replica_num) {
            replace.push(AttributePath::new("replica_num"));
        }
        if !replace.is_empty() {
            state.mark_computed_unknown();
            return Some((Value::Value(state), prior_private_state, replace));
        }

        if let (Some(prior_num), Some(num)) = (
            prior.partition_num.as_ref_option(),
            state.partition_num.as_ref_option(),
        ) {
            if num < prior_num {
                diags.error(
                    "Invalid partition number".to_owned(),
                    format!("partition_num cannot be reduced, from {prior_num} to {num}"),
                    AttributePath::new("partition_num"),
                );
                return None;
            }
        }

        Some((Value::Value(state), prior_private_state, Vec::new()))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = known_state(diags, planned_state)?;
        let service = self.handle.service(diags)?;
        let request = state.create_request();
        let instance_id = request.instance_id.as_str();
        let topic_name = request.topic_name.as_str();

        if let Err(err) = service.create_topic(&request).await {
            api_error(diags, "Failed to create ckafka topic", &err);
            return None;
        }

        let service = &service;
        let found = retry(READ_RETRY_TIMEOUT, move || async move {
            match service.describe_topic_by_name(instance_id, topic_name).await {
                Ok(Some(_)) => Ok(()),
                Ok(None) => Err(RetryError::Retryable(anyhow!(
                    "ckafka topic {topic_name} not visible yet"
                ))),
                Err(err) => Err(retryable(err)),
            }
        })
        .await;
        if let Err(err) = found {
            api_error(diags, "Failed to create ckafka topic", &err);
            return None;
        }
        info!("ckafka topic {topic_name} created in instance {instance_id}");

        state.id = Value::Value(Cow::Owned(join_id(&[instance_id, topic_name])));
        let state = self.read_back(diags, service, state).await?;
        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let prior = known_state(diags, prior_state)?;
        let mut state = known_state(diags, planned_state)?;
        let service = self.handle.service(diags)?;
        state.id = prior.id.clone();
        let instance_id = prior.instance_id.as_str().to_owned();
        let topic_name = prior.topic_name.as_str().to_owned();

        let base = ModifyTopicAttributesRequest {
            instance_id: instance_id.clone(),
            topic_name: topic_name.clone(),
            ..Default::default()
        };
        let mut request = base.clone();
        if changed(&prior.note, &state.note) {
            request.note = Some(state.note.as_str().to_owned());
        }
        if changed(&prior.enable_white_list, &state.enable_white_list) {
            request.enable_white_list = state.enable_white_list.as_ref_option().map(|e| i64::from(*e));
        }
        if changed(&prior.sync_replica_min_num, &state.sync_replica_min_num) {
            request.min_insync_replicas = state.sync_replica_min_num.as_ref_option().copied();
        }
        if changed(
            &prior.unclean_leader_election_enable,
            &state.unclean_leader_election_enable,
        ) {
            request.unclean_leader_election_enable = state
                .unclean_leader_election_enable
                .as_ref_option()
                .map(|e| i64::from(*e));
        }
        if changed(&prior.retention, &state.retention) {
            request.retention_ms = state.retention.as_ref_option().copied();
        }
        if changed(&prior.segment, &state.segment) {
            request.segment_ms = state.segment.as_ref_option().copied();
        }
        if changed(&prior.max_message_bytes, &state.max_message_bytes) {
            request.max_message_bytes = state.max_message_bytes.as_ref_option().copied();
        }
        if changed(&prior.clean_up_policy, &state.clean_up_policy) {
            request.clean_up_policy = state.clean_up_policy.as_deref_option().map(str::to_owned);
        }
        if request != base {
            if let Err(err) = service.modify_topic_attributes(&request).await {
                api_error(diags, "Failed to modify ckafka topic attributes", &err);
                return None;
            }
        }

        if changed(&prior.ip_white_list, &state.ip_white_list) {
            let old = prior.ip_white_list();
            let new = state.ip_white_list();
            let old_set = old.iter().collect::<HashSet<_>>();
            let new_set = new.iter().collect::<HashSet<_>>();
            let added = new
                .iter()
                .filter(|ip| !old_set.contains(ip))
                .cloned()
                .collect::<Vec<_>>();
            let removed = old
                .iter()
                .filter(|ip| !new_set.contains(ip))
                .cloned()
                .collect::<Vec<_>>();

            if !removed.is_empty() {
                if let Err(err) = service
                    .remove_topic_ip_white_list(&instance_id, &topic_name, &removed)
                    .await
                {
                    api_error(diags, "Failed to remove ckafka topic ip white list", &err);
                    return None;
                }
            }
            if !added.is_empty() {
                if let Err(err) = service
                    .add_topic_ip_white_list(&instance_id, &topic_name, &added)
                    .await
                {
                    api_error(diags, "Failed to add ckafka topic ip white list", &err);
                    return None;
                }
            }
        }

        if changed(&prior.partition_num, &state.partition_num) {
            let partition_num = state.partition_num.as_ref_option().copied().unwrap_or_default();
            if let Err(err) = service
                .add_topic_partition(&instance_id, &topic_name, partition_num)
                .await
            {
                api_error(diags, "Failed to add ckafka topic partitions", &err);
                return None;
            }
        }

        let state = self.read_back(diags, &service, state).await?;
        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let state = known_state(diags, state)?;
        let service = self.handle.service(diags)?;

        if let Err(err) = service
            .delete_topic(state.instance_id.as_str(), state.topic_name.as_str())
            .await
        {
            api_error(diags, "Failed to delete ckafka topic", &err);
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let [instance_id, topic_name] = match split_id::<2>(&id, "ckafka_topic") {
            Ok(parts) => parts.map(str::to_owned),
            Err(err) => {
                api_error(diags, "Invalid ckafka topic id", &err);
                return None;
            }
        };
        let mut state = TopicState {
            id: Value::Value(Cow::Owned(id)),
            instance_id: Value::Value(Cow::Owned(instance_id)),
            topic_name: Value::Value(Cow::Owned(topic_name)),
            ..Default::default()
        };
        state.normalize(diags);
        Some((Value::Value(state), Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::MockTransport;

    fn resource(transport: &Arc<MockTransport>) -> CkafkaTopicResource {
        CkafkaTopicResource::new(ProviderHandle::with_client(transport.client()))
    }

    fn existing_topic(transport: &MockTransport) {
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply(
            "DescribeTopicDetail",
            json!({"Result": {"TotalCount": 1, "TopicList": [{
                "TopicName": "orders",
                "TopicId": "topic-1",
                "PartitionNum": 3,
                "ReplicaNum": 2,
                "CreateTime": 1700000000,
                "ForwardStatus": 1,
                "Config": {"Retention": 60480000, "CleanUpPolicy": "delete"},
            }]}}),
        );
        transport.reply(
            "DescribeTopicAttributes",
            json!({"Result": {
                "TopicId": "topic-1",
                "CreateTime": 1700000000,
                "PartitionNum": 3,
                "ReplicaNum": 2,
                "EnableWhiteList": 1,
                "IpWhiteList": ["10.0.0.1"],
                "Config": {
                    "Retention": 60480000,
                    "MinInsyncReplicas": 1,
                    "CleanUpPolicy": "delete",
                    "SegmentMs": 86400000,
                    "UncleanLeaderElectionEnable": 0,
                    "MaxMessageBytes": 1048588,
                },
            }}),
        );
    }

    fn planned() -> TopicState<'static> {
        let mut state = TopicState {
            instance_id: Value::Value("ckafka-1".into()),
            topic_name: Value::Value("orders".into()),
            partition_num: Value::Value(3),
            replica_num: Value::Value(2),
            enable_white_list: Value::Value(true),
            ip_white_list: Value::Value(vec![Value::Value("10.0.0.1".into())]),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());
        state.mark_computed_unknown();
        state
    }

    fn applied() -> TopicState<'static> {
        let mut state = planned();
        state.id = Value::Value("ckafka-1#orders".into());
        state.segment = Value::Value(86400000);
        state.max_message_bytes = Value::Value(1048588);
        state
    }

    #[tokio::test]
    async fn create_topic() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("CreateTopic", json!({"Result": {"TopicId": "topic-1"}}));
        existing_topic(&transport);

        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .create(
                &mut diags,
                Value::Value(planned()),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());

        let Value::Value(state) = state else {
            panic!("topic should exist");
        };
        assert_eq!(state.id.as_str(), "ckafka-1#orders");
        assert_eq!(state.create_time.as_str(), "2023-11-14 22:13:20");
        assert_eq!(state.segment, Value::Value(86400000));
        assert_eq!(state.forward_status, Value::Value(1));
        assert!(state.forward_cos_bucket.is_null());
        assert_eq!(state.ip_white_list(), ["10.0.0.1"]);

        let sent = &transport.requests("CreateTopic")[0];
        assert_eq!(sent["EnableWhiteList"], 1);
        assert_eq!(sent["IpWhiteList"], json!(["10.0.0.1"]));
    }

    #[tokio::test]
    async fn read_missing_topic() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply(
            "DescribeTopicDetail",
            json!({"Result": {"TotalCount": 0, "TopicList": []}}),
        );

        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .read(&mut diags, Value::Value(applied()), Default::default(), Default::default())
            .await
            .unwrap();
        assert!(state.is_null());
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn plan_update_checks_partitions_and_replacement() {
        let transport = Arc::new(MockTransport::default());
        let resource = resource(&transport);

        let proposed = TopicState {
            partition_num: Value::Value(2),
            ..applied()
        };
        let mut diags = Diagnostics::default();
        let plan = resource
            .plan_update(
                &mut diags,
                Value::Value(applied()),
                Value::Value(proposed),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await;
        assert!(plan.is_none());
        assert_eq!(diags.errors.len(), 1);

        let proposed = TopicState {
            replica_num: Value::Value(3),
            ..applied()
        };
        let mut diags = Diagnostics::default();
        let (state, _, replace) = resource
            .plan_update(
                &mut diags,
                Value::Value(applied()),
                Value::Value(proposed),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(replace.len(), 1);
        assert!(state.as_ref_option().is_some_and(|state| state.id.is_unknown()));
    }

    #[tokio::test]
    async fn update_topic() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("ModifyTopicAttributes", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply("CreateTopicIpWhiteList", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply("DeleteTopicIpWhiteList", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply("CreatePartition", json!({"Result": {"ReturnCode": "0"}}));
        existing_topic(&transport);

        let planned = TopicState {
            note: Value::Value("orders topic".into()),
            partition_num: Value::Value(6),
            ip_white_list: Value::Value(vec![Value::Value("10.0.0.2".into())]),
            ..applied()
        };
        let mut diags = Diagnostics::default();
        resource(&transport)
            .update(
                &mut diags,
                Value::Value(applied()),
                Value::Value(planned),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());

        assert_eq!(
            transport.requests("ModifyTopicAttributes")[0],
            json!({"InstanceId": "ckafka-1", "TopicName": "orders", "Note": "orders topic"})
        );
        assert_eq!(
            transport.requests("DeleteTopicIpWhiteList")[0]["IpWhiteList"],
            json!(["10.0.0.1"])
        );
        assert_eq!(
            transport.requests("CreateTopicIpWhiteList")[0]["IpWhiteList"],
            json!(["10.0.0.2"])
        );
        assert_eq!(transport.requests("CreatePartition")[0]["PartitionNum"], 6);
    }

    #[tokio::test]
    async fn destroy_topic() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("DeleteTopic", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply(
            "DescribeTopicDetail",
            json!({"Result": {"TotalCount": 0, "TopicList": []}}),
        );

        let mut diags = Diagnostics::default();
        resource(&transport)
            .destroy(&mut diags, Value::Value(applied()), Default::default(), Default::default())
            .await
            .unwrap();
        assert_eq!(transport.requests("DeleteTopic")[0]["TopicName"], "orders");
    }

    #[tokio::test]
    async fn import_splits_id() {
        let transport = Arc::new(MockTransport::default());
        let resource = resource(&transport);

        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .import(&mut diags, "ckafka-1#orders".to_owned())
            .await
            .unwrap();
        let Value::Value(state) = state else {
            panic!("imported state should be known");
        };
        assert_eq!(state.instance_id.as_str(), "ckafka-1");
        assert_eq!(state.topic_name.as_str(), "orders");

        let mut diags = Diagnostics::default();
        assert!(resource.import(&mut diags, "orders".to_owned()).await.is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
