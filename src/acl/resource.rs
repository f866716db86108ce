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
use tracing::warn;

use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::api::ckafka::AclRequest;
use crate::ckafka_provider::ProviderHandle;
use crate::utils::{
    api_error, changed, known_state, root_error, WithNormalize, WithSchema, WithValidate,
};

use super::AclState;

#[derive(Debug, Default, Clone)]
pub struct CkafkaAclResource {
    handle: ProviderHandle,
}

impl CkafkaAclResource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }
}

fn acl_request(diags: &mut Diagnostics, state: &AclState<'_>) -> Option<AclRequest> {
    match state.request() {
        Ok(request) => Some(request),
        Err(err) => {
            api_error(diags, "Invalid ckafka acl", &err);
            None
        }
    }
}

#[async_trait]
impl Resource for CkafkaAclResource {
    type State<'a> = Value<AclState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(AclState::schema())
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
        let request = acl_request(diags, &state)?;

        match service.describe_acl(&request).await {
            Ok(Some(_)) => Some((Value::Value(state), private_state)),
            Ok(None) => {
                warn!("ckafka acl {} not found, removing it from state", state.id.as_str());
                Some((Value::Null, private_state))
            }
            Err(err) => {
                api_error(diags, "Failed to read ckafka acl", &err);
                None
            }
        }
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

        let attributes = [
            ("instance_id", &prior.instance_id, &state.instance_id),
            ("resource_type", &prior.resource_type, &state.resource_type),
            ("resource_name", &prior.resource_name, &state.resource_name),
            ("operation_type", &prior.operation_type, &state.operation_type),
            ("permission_type", &prior.permission_type, &state.permission_type),
            ("host", &prior.host, &state.host),
            ("principal", &prior.principal, &state.principal),
        ];
        let replace = attributes
            .into_iter()
            .filter(|(_, prior, planned)| changed(*prior, *planned))
            .map(|(name, _, _)| AttributePath::new(name))
            .collect::<Vec<_>>();
        if !replace.is_empty() {
            state.id = Value::Unknown;
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
        let request = acl_request(diags, &state)?;

        if let Err(err) = service.create_acl(&request).await {
            api_error(diags, "Failed to create ckafka acl", &err);
            return None;
        }
        state.id = Value::Value(Cow::Owned(state.acl_id()));

        match service.describe_acl(&request).await {
            Ok(Some(_)) => Some((Value::Value(state), private_state)),
            Ok(None) => {
                root_error(
                    diags,
                    "Failed to read ckafka acl",
                    format!("ckafka acl {} not found after apply", state.id.as_str()),
                );
                None
            }
            Err(err) => {
                api_error(diags, "Failed to read ckafka acl", &err);
                None
            }
        }
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        _planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        root_error(
            diags,
            "Unsupported update",
            "every ckafka acl attribute forces a replacement",
        );
        None
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
        let request = acl_request(diags, &state)?;

        if let Err(err) = service.delete_acl(&request).await {
            api_error(diags, "Failed to delete ckafka acl", &err);
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        match AclState::from_id(&id) {
            Ok(state) => Some((Value::Value(state), Default::default())),
            Err(err) => {
                api_error(diags, "Invalid ckafka acl id", &err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::MockTransport;

    fn resource(transport: &Arc<MockTransport>) -> CkafkaAclResource {
        CkafkaAclResource::new(ProviderHandle::with_client(transport.client()))
    }

    fn existing_acls(transport: &MockTransport) {
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply(
            "DescribeTopicAttributes",
            json!({"Result": {"TopicId": "topic-1", "PartitionNum": 3}}),
        );
        transport.reply(
            "DescribeACL",
            json!({"Result": {"TotalCount": 2, "AclList": [
                {"ResourceType": 2, "ResourceName": "orders", "Principal": "User:*", "Host": "*", "Operation": 3, "PermissionType": 3},
                {"ResourceType": 2, "ResourceName": "orders", "Principal": "User:alice", "Host": "*", "Operation": 4, "PermissionType": 3},
            ]}}),
        );
    }

    fn planned(principal: &str) -> AclState<'static> {
        let mut state = AclState {
            instance_id: Value::Value("ckafka-1".into()),
            resource_name: Value::Value("orders".into()),
            operation_type: Value::Value("WRITE".into()),
            principal: Value::Value(Cow::Owned(principal.to_owned())),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());
        state.id = Value::Unknown;
        state
    }

    #[tokio::test]
    async fn create_acl_sends_prefixed_principal() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("CreateAcl", json!({"Result": {"ReturnCode": "0"}}));
        existing_acls(&transport);

        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .create(
                &mut diags,
                Value::Value(planned("alice")),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(
            state.as_ref_option().map(|state| state.id.as_str().to_owned()),
            Some("ckafka-1#ALLOW#alice#*#WRITE#TOPIC#orders".to_owned())
        );
        assert_eq!(transport.requests("CreateAcl")[0]["Principal"], "User:alice");
        assert_eq!(transport.requests("DescribeACL")[0]["ResourceType"], 2);
    }

    #[tokio::test]
    async fn read_matches_operation_and_principal() {
        let transport = Arc::new(MockTransport::default());
        existing_acls(&transport);

        // The `*` principal only holds a READ acl
        let mut state = planned("*");
        state.id = Value::Value(Cow::Owned(state.acl_id()));
        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .read(&mut diags, Value::Value(state), Default::default(), Default::default())
            .await
            .unwrap();
        assert!(state.is_null());
    }

    #[tokio::test]
    async fn any_change_replaces_acl() {
        let transport = Arc::new(MockTransport::default());
        let mut prior = planned("alice");
        prior.id = Value::Value(Cow::Owned(prior.acl_id()));
        let proposed = AclState {
            host: Value::Value("10.0.0.1".into()),
            principal: Value::Value("bob".into()),
            ..prior.clone()
        };

        let mut diags = Diagnostics::default();
        let (state, _, replace) = resource(&transport)
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
        assert_eq!(replace.len(), 2);
        assert!(state.as_ref_option().is_some_and(|state| state.id.is_unknown()));
    }

    #[tokio::test]
    async fn import_parses_id() {
        let transport = Arc::new(MockTransport::default());
        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .import(&mut diags, "ckafka-1#DENY#bob#10.0.0.1#READ#GROUP#consumers".to_owned())
            .await
            .unwrap();
        let Value::Value(state) = state else {
            panic!("imported state should be known");
        };
        assert_eq!(state.permission_type.as_str(), "DENY");
        assert_eq!(state.resource_type.as_str(), "GROUP");
        assert_eq!(state.resource_name.as_str(), "consumers");
        assert_eq!(state.principal.as_str(), "bob");
    }
}
