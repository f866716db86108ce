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
use crate::flatten::Flatten;
use crate::utils::{api_error, ids_hash, write_result_output_file, WithSchema};

use super::{ConnectResourceDataSourceState, ConnectResourceResult, ConnectResourceResultModel};

#[derive(Debug, Default, Clone)]
pub struct CkafkaConnectResourceDataSource {
    handle: ProviderHandle,
}

impl CkafkaConnectResourceDataSource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl DataSource for CkafkaConnectResourceDataSource {
    type State<'a> = ConnectResourceDataSourceState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ConnectResourceDataSourceState::schema())
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

        let result = match service
            .describe_connect_resources::<ConnectResourceResultModel>(&state.filter())
            .await
        {
            Ok(result) => result,
            Err(err) => {
                api_error(diags, "Failed to read ckafka connect resources", &err);
                return None;
            }
        };

        let ids = result
            .connect_resource_list
            .iter()
            .flatten()
            .filter_map(|resource| resource.resource_id.as_deref())
            .collect::<Vec<_>>();
        state.id = Value::Value(Cow::Owned(ids_hash(&ids)));

        let result = vec![ConnectResourceResult::flatten(&result)];
        if let Err(err) = write_result_output_file(&state.result_output_file, &result).await {
            api_error(diags, "Failed to write result output file", &err);
            return None;
        }
        state.result = Value::Value(result);
        Some(state)
    }
}
