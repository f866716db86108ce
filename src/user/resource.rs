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

use crate::api::ckafka::CkafkaService;
use crate::ckafka_provider::ProviderHandle;
use crate::utils::{api_error, changed, join_id, known_state, root_error, split_id, WithSchema};

use super::UserState;

#[derive(Debug, Default, Clone)]
pub struct CkafkaUserResource {
    handle: ProviderHandle,
}

impl CkafkaUserResource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }

    async fn read_user<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        mut state: UserState<'a>,
    ) -> Option<Value<UserState<'a>>> {
        let id = state.id.as_str().to_owned();
        let [instance_id, account_name] = match split_id::<2>(&id, "ckafka_user") {
            Ok(parts) => parts,
            Err(err) => {
                api_error(diags, "Invalid ckafka user id", &err);
                return None;
            }
        };

        match service.describe_user(instance_id, account_name).await {
            Ok(Some(user)) => {
                state.instance_id = Value::Value(Cow::Owned(instance_id.to_owned()));
                state.account_name = Value::Value(Cow::Owned(account_name.to_owned()));
                state.set_user(&user);
                Some(Value::Value(state))
            }
            Ok(None) => {
                warn!("ckafka user {id} not found, removing it from state");
                Some(Value::Null)
            }
            Err(err) => {
                api_error(diags, "Failed to read ckafka user", &err);
                None
            }
        }
    }

    async fn read_back<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        state: UserState<'a>,
    ) -> Option<Value<UserState<'a>>> {
        let id = state.id.as_str().to_owned();
        match self.read_user(diags, service, state).await? {
            Value::Null => {
                root_error(
                    diags,
                    "Failed to read ckafka user",
                    format!("ckafka user {id} not found after apply"),
                );
                None
            }
            state => Some(state),
        }
    }
}

#[async_trait]
impl Resource for CkafkaUserResource {
    type State<'a> = Value<UserState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(UserState::schema())
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::State<'a>) -> Option<()> {
        Some(())
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
        let state = self.read_user(diags, &service, state).await?;
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
        state.id = Value::Unknown;
        state.create_time = Value::Unknown;
        state.update_time = Value::Unknown;
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
        if changed(&prior.instance_id, &state.instance_id) {
            replace.push(AttributePath::new("instance_id"));
        }
        if changed(&prior.account_name, &state.account_name) {
            replace.push(AttributePath::new("account_name"));
        }
        if !replace.is_empty() {
            state.id = Value::Unknown;
            state.create_time = Value::Unknown;
        }
        if !replace.is_empty() || changed(&prior.password, &state.password) {
            state.update_time = Value::Unknown;
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
        let instance_id = state.instance_id.as_str().to_owned();
        let account_name = state.account_name.as_str().to_owned();

        if let Err(err) = service
            .create_user(&instance_id, &account_name, state.password.as_str())
            .await
        {
            api_error(diags, "Failed to create ckafka user", &err);
            return None;
        }

        state.id = Value::Value(Cow::Owned(join_id(&[&instance_id, &account_name])));
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
        let mut state = known_state(diags, planned_state)?;
        let service = self.handle.service(diags)?;
        state.id = prior.id.clone();

        if changed(&prior.password, &state.password) {
            if let Err(err) = service
                .modify_password(
                    prior.instance_id.as_str(),
                    prior.account_name.as_str(),
                    prior.password.as_str(),
                    state.password.as_str(),
                )
                .await
            {
                api_error(diags, "Failed to modify ckafka user password", &err);
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
            .delete_user(state.instance_id.as_str(), state.account_name.as_str())
            .await
        {
            api_error(diags, "Failed to delete ckafka user", &err);
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        if let Err(err) = split_id::<2>(&id, "ckafka_user") {
            api_error(diags, "Invalid ckafka user id", &err);
            return None;
        }
        let state = UserState {
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

    fn resource(transport: &Arc<MockTransport>) -> CkafkaUserResource {
        CkafkaUserResource::new(ProviderHandle::with_client(transport.client()))
    }

    fn existing_user(transport: &MockTransport) {
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply(
            "DescribeUser",
            json!({"Result": {"TotalCount": 2, "Users": [
                {"UserId": 1, "Name": "alice-admin", "CreateTime": "2024-01-01 00:00:00"},
                {"UserId": 2, "Name": "alice", "CreateTime": "2024-01-02 00:00:00", "UpdateTime": "2024-01-03 00:00:00"},
            ]}}),
        );
    }

    fn applied() -> UserState<'static> {
        UserState {
            id: Value::Value("ckafka-1#alice".into()),
            instance_id: Value::Value("ckafka-1".into()),
            account_name: Value::Value("alice".into()),
            password: Value::Value("secret-1".into()),
            create_time: Value::Value("2024-01-02 00:00:00".into()),
            update_time: Value::Value("2024-01-03 00:00:00".into()),
        }
    }

    #[tokio::test]
    async fn create_user_keeps_password() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("CreateUser", json!({"Result": {"ReturnCode": "0"}}));
        existing_user(&transport);

        let planned = UserState {
            id: Value::Unknown,
            create_time: Value::Unknown,
            update_time: Value::Unknown,
            ..applied()
        };
        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .create(&mut diags, Value::Value(planned), Value::Null, Default::default(), Default::default())
            .await
            .unwrap();
        let Value::Value(state) = state else {
            panic!("user should exist");
        };
        assert_eq!(state.id.as_str(), "ckafka-1#alice");
        assert_eq!(state.password.as_str(), "secret-1");
        assert_eq!(state.create_time.as_str(), "2024-01-02 00:00:00");
        assert_eq!(
            transport.requests("CreateUser")[0],
            json!({"InstanceId": "ckafka-1", "Name": "alice", "Password": "secret-1"})
        );
    }

    #[tokio::test]
    async fn update_changes_password() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("ModifyPassword", json!({"Result": {"ReturnCode": "0"}}));
        existing_user(&transport);

        let planned = UserState {
            password: Value::Value("secret-2".into()),
            update_time: Value::Unknown,
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
        assert_eq!(
            transport.requests("ModifyPassword")[0],
            json!({"InstanceId": "ckafka-1", "Name": "alice", "Password": "secret-1", "PasswordNew": "secret-2"})
        );
    }

    #[tokio::test]
    async fn read_missing_user() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply("DescribeUser", json!({"Result": {"TotalCount": 0, "Users": []}}));

        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .read(&mut diags, Value::Value(applied()), Default::default(), Default::default())
            .await
            .unwrap();
        assert!(state.is_null());
    }

    #[tokio::test]
    async fn account_name_change_replaces_user() {
        let transport = Arc::new(MockTransport::default());
        let proposed = UserState {
            account_name: Value::Value("bob".into()),
            ..applied()
        };
        let mut diags = Diagnostics::default();
        let (_, _, replace) = resource(&transport)
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
    }
}
