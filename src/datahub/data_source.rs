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

use super::{DatahubTaskDataSourceState, DatahubTaskInfo, DatahubTaskInfoModel};

#[derive(Debug, Default, Clone)]
pub struct CkafkaDatahubTaskDataSource {
    handle: ProviderHandle,
}

impl CkafkaDatahubTaskDataSource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl DataSource for CkafkaDatahubTaskDataSource {
    type State<'a> = DatahubTaskDataSourceState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(DatahubTaskDataSourceState::schema())
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

        let tasks = match service
            .describe_datahub_tasks::<DatahubTaskInfoModel>(&state.filter())
            .await
        {
            Ok(tasks) => tasks,
            Err(err) => {
                api_error(diags, "Failed to read ckafka datahub tasks", &err);
                return None;
            }
        };

        let ids = tasks
            .iter()
            .filter_map(|task| task.task_id.as_deref())
            .collect::<Vec<_>>();
        state.id = Value::Value(Cow::Owned(ids_hash(&ids)));

        let list = tasks.iter().map(DatahubTaskInfo::flatten).collect::<Vec<_>>();
        if let Err(err) = write_result_output_file(&state.result_output_file, &list).await {
            api_error(diags, "Failed to write result output file", &err);
            return None;
        }
        state.task_list = Value::Value(list);
        Some(state)
    }
}
