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
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::api::ckafka::CkafkaService;
use crate::ckafka_provider::ProviderHandle;
use crate::utils::{api_error, changed, known_state, root_error, WithSchema};

use super::DatahubTopicState;

#[derive(Debug, Default, Clone)]
pub struct CkafkaDatahubTopicResource {
    handle: ProviderHandle,
}

impl CkafkaDatahubTopicResource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }

    async fn read_topic<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        mut state: DatahubTopicState<'a>,
    ) -> Option<Value<DatahubTopicState<'a>>> {
        let name = state.id.as_str().to_owned();
        match service.describe_datahub_topic(&name).await {
            Ok(Some(topic)) => {
                state.name = Value::Value(Cow::Owned(name));
                state.set_topic(&topic);
                Some(Value::Value(state))
            }
            Ok(None) => {
                warn!("ckafka datahub topic {name} not found, removing it from state");
                Some(Value::Null)
            }
            Err(err) => {
                api_error(diags, "Failed to read ckafka datahub topic", &err);
                None
            }
        }
    }

    async fn read_back<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        state: DatahubTopicState<'a>,
    ) -> Option<Value<DatahubTopicState<'a>>> {
        let name = state.id.as_str().to_owned();
        match self.read_topic(diags, service, state).await? {
            Value::Null => {
                root_error(
                    diags,
                    "Failed to read ckafka datahub topic",
                    format!("ckafka datahub topic {name} not found after apply"),
                );
                None
            }
            state => Some(state),
        }
    }
}

#[async_trait]
impl Resource for CkafkaDatahubTopicResource {
    type State<'a> = Value<DatahubTopicState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(DatahubTopicState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Value::Value(config) = &config {
            if let Value::Value(partition_num) = config.partition_num {
                if partition_num < 1 {
                    diags.error(
                        "Invalid partition_num".to_owned(),
                        format!("partition_num should be greater than 0, got {partition_num}"),
                        AttributePath::new("partition_num"),
                    );
                }
            }
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
        state.id = state.name.clone();
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

        let mut replace = Vec::new();
        if changed(&prior.name, &state.name) {
            replace.push(AttributePath::new("name"));
        }
        if changed(&prior.partition_num, &state.partition_num) {
            replace.push(AttributePath::new("partition_num"));
        }
        state.id = state.name.clone();
        Some((Value::Value(state), prior_private_state, replace))
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

        let name = match service.create_datahub_topic(&state.create_request()).await {
            Ok(name) => name,
            Err(err) => {
                api_error(diags, "Failed to create ckafka datahub topic", &err);
                return None;
            }
        };
        info!("ckafka datahub topic {name} created");
        state.id = Value::Value(Cow::Owned(name));

        let state = self.read_back(diags, &service, state).await?;
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
        let state = known_state(diags, planned_state)?;
        let service = self.handle.service(diags)?;

        let request = state.modify_request();
        if request != prior.modify_request() {
            if let Err(err) = service.modify_datahub_topic(&request).await {
                api_error(diags, "Failed to modify ckafka datahub topic", &err);
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

        if let Err(err) = service.delete_datahub_topic(state.id.as_str()).await {
            api_error(diags, "Failed to delete ckafka datahub topic", &err);
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = DatahubTopicState {
            id: Value::Value(Cow::Owned(id)),
            ..Default::default()
        };
        Some((Value::Value(state), Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::MockTransport;

    fn resource(transport: &Arc<MockTransport>) -> CkafkaDatahubTopicResource {
        CkafkaDatahubTopicResource::new(ProviderHandle::with_client(transport.client()))
    }

    fn topic() -> DatahubTopicState<'static> {
        DatahubTopicState {
            id: Value::Value("1300000000-events".into()),
            name: Value::Value("1300000000-events".into()),
            partition_num: Value::Value(3),
            retention_ms: Value::Value(60_000),
            ..Default::default()
        }
    }

    fn describe_reply(retention_ms: i64) -> serde_json::Value {
        json!({"Result": {
            "Name": "1300000000-events",
            "PartitionNum": 3,
            "RetentionMs": retention_ms,
        }})
    }

    #[tokio::test]
    async fn create_topic() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "CreateDatahubTopic",
            json!({"Result": {"TopicName": "1300000000-events"}}),
        );
        transport.reply("DescribeDatahubTopic", describe_reply(60_000));

        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .create(
                &mut diags,
                Value::Value(DatahubTopicState {
                    id: Value::Unknown,
                    ..topic()
                }),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();

        let Value::Value(state) = state else {
            panic!("datahub topic should exist");
        };
        assert_eq!(state.id.as_str(), "1300000000-events");
        assert_eq!(
            transport.requests("CreateDatahubTopic")[0]["PartitionNum"],
            3
        );
    }

    #[tokio::test]
    async fn update_retention_only() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("ModifyDatahubTopic", json!({"Result": {}}));
        transport.reply("DescribeDatahubTopic", describe_reply(120_000));

        let planned = DatahubTopicState {
            retention_ms: Value::Value(120_000),
            ..topic()
        };
        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .update(
                &mut diags,
                Value::Value(topic()),
                Value::Value(planned),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();

        let Value::Value(state) = state else {
            panic!("datahub topic should exist");
        };
        assert_eq!(state.retention_ms, Value::Value(120_000));
        assert_eq!(
            transport.requests("ModifyDatahubTopic")[0],
            json!({"Name": "1300000000-events", "RetentionMs": 120_000})
        );
    }

    #[tokio::test]
    async fn partition_change_replaces_topic() {
        let transport = Arc::new(MockTransport::default());
        let proposed = DatahubTopicState {
            partition_num: Value::Value(6),
            ..topic()
        };

        let mut diags = Diagnostics::default();
        let (_, _, replace) = resource(&transport)
            .plan_update(
                &mut diags,
                Value::Value(topic()),
                Value::Value(proposed),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(replace.len(), 1);
    }

    #[tokio::test]
    async fn deleted_topic_is_removed() {
        let transport = Arc::new(MockTransport::default());
        transport.fail("DescribeDatahubTopic", "ResourceNotFound.TopicNotExist");

        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .read(&mut diags, Value::Value(topic()), Default::default(), Default::default())
            .await
            .unwrap();
        assert!(state.is_null());
        assert!(diags.errors.is_empty());
    }
}
