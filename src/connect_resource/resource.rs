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
use crate::api::retry::READ_RETRY_TIMEOUT;
use crate::ckafka_provider::ProviderHandle;
use crate::utils::{
    api_error, changed, known_state, root_error, WithNormalize, WithSchema, WithValidate,
};

use super::{ConnectResourceInfoModel, ConnectResourceState};

#[derive(Debug, Default, Clone)]
pub struct CkafkaConnectResource {
    handle: ProviderHandle,
}

impl CkafkaConnectResource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }

    async fn read_resource<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        mut state: ConnectResourceState<'a>,
    ) -> Option<Value<ConnectResourceState<'a>>> {
        let id = state.id.as_str().to_owned();
        match service
            .describe_connect_resource::<ConnectResourceInfoModel>(&id)
            .await
        {
            Ok(Some(detail)) => {
                state.set_resource(&detail);
                Some(Value::Value(state))
            }
            Ok(None) => {
                warn!("ckafka connect resource {id} not found, removing it from state");
                Some(Value::Null)
            }
            Err(err) => {
                api_error(diags, "Failed to read ckafka connect resource", &err);
                None
            }
        }
    }

    async fn wait_and_read<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        state: ConnectResourceState<'a>,
    ) -> Option<Value<ConnectResourceState<'a>>> {
        let id = state.id.as_str().to_owned();
        if let Err(err) = service
            .wait_connect_resource(&id, 2 * READ_RETRY_TIMEOUT)
            .await
        {
            api_error(diags, "Failed waiting for ckafka connect resource", &err);
            return None;
        }
        match self.read_resource(diags, service, state).await? {
            Value::Null => {
                root_error(
                    diags,
                    "Failed to read ckafka connect resource",
                    format!("ckafka connect resource {id} not found after apply"),
                );
                None
            }
            state => Some(state),
        }
    }
}

#[async_trait]
impl Resource for CkafkaConnectResource {
    type State<'a> = Value<ConnectResourceState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ConnectResourceState::schema())
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
        let state = self.read_resource(diags, &service, state).await?;
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
        state.id = Value::Unknown;
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
        if changed(&prior.r#type, &state.r#type) {
            state.id = Value::Unknown;
            replace.push(AttributePath::new("type"));
        }
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

        let resource_id = match service
            .create_connect_resource(&state.create_request())
            .await
        {
            Ok(id) => id,
            Err(err) => {
                api_error(diags, "Failed to create ckafka connect resource", &err);
                return None;
            }
        };
        info!("ckafka connect resource {resource_id} created");
        state.id = Value::Value(Cow::Owned(resource_id));

        let state = self.wait_and_read(diags, &service, state).await?;
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

        if let Some(request) = state.modify_request(&prior) {
            if let Err(err) = service.modify_connect_resource(&request).await {
                api_error(diags, "Failed to modify ckafka connect resource", &err);
                return None;
            }
        }

        let state = self.wait_and_read(diags, &service, state).await?;
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

        if let Err(err) = service.delete_connect_resource(state.id.as_str()).await {
            api_error(diags, "Failed to delete ckafka connect resource", &err);
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = ConnectResourceState {
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
    use crate::connect_resource::KafkaConnectParam;

    fn resource(transport: &Arc<MockTransport>) -> CkafkaConnectResource {
        CkafkaConnectResource::new(ProviderHandle::with_client(transport.client()))
    }

    fn planned() -> ConnectResourceState<'static> {
        let mut state = ConnectResourceState {
            id: Value::Unknown,
            resource_name: Value::Value("kafka-source".into()),
            r#type: Value::Value("KAFKA".into()),
            kafka_connect_param: Value::Value(vec![KafkaConnectParam {
                resource: Value::Value("ckafka-2".to_owned()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());
        state
    }

    #[tokio::test(start_paused = true)]
    async fn create_waits_for_ready_status() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "CreateConnectResource",
            json!({"Result": {"ResourceId": "resource-1"}}),
        );
        transport.reply(
            "DescribeConnectResource",
            json!({"Result": {"ResourceId": "resource-1", "Status": 0}}),
        );
        transport.reply(
            "DescribeConnectResource",
            json!({"Result": {
                "ResourceId": "resource-1",
                "ResourceName": "kafka-source",
                "Type": "KAFKA",
                "Status": 1,
                "KafkaConnectParam": {"Resource": "ckafka-2", "SelfBuilt": false},
            }}),
        );

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
            panic!("connect resource should exist");
        };
        assert_eq!(state.id.as_str(), "resource-1");
        let Value::Value(kafka) = &state.kafka_connect_param else {
            panic!("kafka parameters should be refreshed");
        };
        assert_eq!(kafka[0].is_update, Value::Value(false));
        assert_eq!(
            transport.requests("CreateConnectResource")[0]["KafkaConnectParam"],
            json!({"Resource": "ckafka-2", "SelfBuilt": false, "IsUpdate": false})
        );
        assert!(transport.requests("DescribeConnectResource").len() >= 2);
    }

    #[tokio::test]
    async fn read_missing_resource() {
        let transport = Arc::new(MockTransport::default());
        transport.fail("DescribeConnectResource", "ResourceNotFound");

        let mut state = planned();
        state.id = Value::Value("resource-1".into());
        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .read(&mut diags, Value::Value(state), Default::default(), Default::default())
            .await
            .unwrap();
        assert!(state.is_null());
    }

    #[tokio::test]
    async fn type_change_replaces_resource() {
        let transport = Arc::new(MockTransport::default());
        let mut prior = planned();
        prior.id = Value::Value("resource-1".into());
        let proposed = ConnectResourceState {
            r#type: Value::Value("DORIS".into()),
            ..prior.clone()
        };

        let mut diags = Diagnostics::default();
        let (_, _, replace) = resource(&transport)
            .plan_update(
                &mut diags,
                Value::Value(prior),
                Value::Value(proposed),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(replace.len(), 1);
    }
}
