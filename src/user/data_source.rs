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

use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{DataSource, Diagnostics};

use crate::ckafka_provider::ProviderHandle;
use crate::utils::{api_error, ids_hash, join_id, write_result_output_file, WithSchema};

use super::{UserInfo, UsersDataSourceState};

#[derive(Debug, Default, Clone)]
pub struct CkafkaUsersDataSource {
    handle: ProviderHandle,
}

impl CkafkaUsersDataSource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl DataSource for CkafkaUsersDataSource {
    type State<'a> = UsersDataSourceState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(UsersDataSourceState::schema())
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::State<'a>) -> Option<()> {
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let service = self.handle.service(diags)?;
        let mut state = config;
        let instance_id = state.instance_id.as_str().to_owned();

        let users = match service
            .describe_users(
                &instance_id,
                state.account_name.as_deref_option().unwrap_or_default(),
            )
            .await
        {
            Ok(users) => users,
            Err(err) => {
                api_error(diags, "Failed to read ckafka users", &err);
                return None;
            }
        };

        let ids = users
            .iter()
            .filter_map(|user| user.name.as_deref())
            .map(|name| join_id(&[&instance_id, name]))
            .collect::<Vec<_>>();
        state.id = Value::Value(Cow::Owned(ids_hash(&ids)));

        let list = users.iter().map(UserInfo::from).collect::<Vec<_>>();
        if let Err(err) = write_result_output_file(&state.result_output_file, &list).await {
            api_error(diags, "Failed to write result output file", &err);
            return None;
        }
        state.user_list = Value::Value(list.into_iter().map(Value::Value).collect());
        Some(state)
    }
}
