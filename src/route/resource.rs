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

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::api::ckafka::CkafkaService;
use crate::ckafka_provider::ProviderHandle;
use crate::utils::{api_error, known_state, root_error, split_id, WithSchema, WithValidate};

use super::{RouteState, IMMUTABLE_ATTRIBUTES};

#[derive(Debug, Default, Clone)]
pub struct CkafkaRouteResource {
    handle: ProviderHandle,
}

fn parse_id(id: &str) -> anyhow::Result<(&str, i64)> {
    let [instance_id, route_id] = split_id::<2>(id, "ckafka_route")?;
    let route_id = route_id
        .parse()
        .map_err(|_| anyhow!("route id `{route_id}` is not a number"))?;
    Ok((instance_id, route_id))
}

impl CkafkaRouteResource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }

    async fn read_route<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        mut state: RouteState<'a>,
    ) -> Option<Value<RouteState<'a>>> {
        let id = state.id.as_str().to_owned();
        let (instance_id, route_id) = match parse_id(&id) {
            Ok(parts) => parts,
            Err(err) => {
                api_error(diags, "Invalid ckafka route id", &err);
                return None;
            }
        };

        match service.describe_route(instance_id, route_id).await {
            Ok(Some(route)) => {
                state.instance_id = Value::Value(Cow::Owned(instance_id.to_owned()));
                state.set_route(&route);
                Some(Value::Value(state))
            }
            Ok(None) => {
                warn!("ckafka route {id} not found, removing it from state");
                Some(Value::Null)
            }
            Err(err) => {
                api_error(diags, "Failed to read ckafka route", &err);
                None
            }
        }
    }
}

#[async_trait]
impl Resource for CkafkaRouteResource {
    type State<'a> = Value<RouteState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(RouteState::schema())
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
        let state = self.read_route(diags, &service, state).await?;
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
        state.vip_list = Value::Unknown;
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

        let replace = IMMUTABLE_ATTRIBUTES
            .iter()
            .filter(|name| {
                let planned = state.immutable_value(name);
                planned != "unknown" && planned != prior.immutable_value(name)
            })
            .map(|name| AttributePath::new(*name))
            .collect::<Vec<_>>();
        if !replace.is_empty() {
            state.id = Value::Unknown;
            state.vip_list = Value::Unknown;
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

        let route_id = match service.create_route(&state.create_request()).await {
            Ok(route_id) => route_id,
            Err(err) => {
                api_error(diags, "Failed to create ckafka route", &err);
                return None;
            }
        };
        state.set_id(route_id);
        info!("ckafka route {} created", state.id.as_str());

        let id = state.id.as_str().to_owned();
        match self.read_route(diags, &service, state).await? {
            Value::Null => {
                root_error(
                    diags,
                    "Failed to read ckafka route",
                    format!("ckafka route {id} not found after apply"),
                );
                None
            }
            state => Some((state, private_state)),
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
            "every attribute of a ckafka route recreates it",
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

        let (instance_id, route_id) = match parse_id(state.id.as_str()) {
            Ok(parts) => parts,
            Err(err) => {
                api_error(diags, "Invalid ckafka route id", &err);
                return None;
            }
        };
        if let Err(err) = service.delete_route(instance_id, route_id).await {
            api_error(diags, "Failed to delete ckafka route", &err);
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let instance_id = match parse_id(&id) {
            Ok((instance_id, _)) => instance_id.to_owned(),
            Err(err) => {
                api_error(diags, "Invalid ckafka route id", &err);
                return None;
            }
        };
        let state = RouteState {
            id: Value::Value(Cow::Owned(id)),
            instance_id: Value::Value(Cow::Owned(instance_id)),
            ..Default::default()
        };
        Some((Value::Value(state), Default::default()))
    }
}
