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
use crate::utils::{api_error, ids_hash, write_result_output_file, WithSchema};

use super::{TopicInfo, TopicsDataSourceState};

#[derive(Debug, Default, Clone)]
pub struct CkafkaTopicsDataSource {
    handle: ProviderHandle,
}

impl CkafkaTopicsDataSource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl DataSource for CkafkaTopicsDataSource {
    type State<'a> = TopicsDataSourceState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(TopicsDataSourceState::schema())
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

        let search_word = state.topic_name.as_deref_option().unwrap_or_default();
        let topics = match service
            .describe_topics(state.instance_id.as_str(), search_word)
            .await
        {
            Ok(topics) => topics,
            Err(err) => {
                api_error(diags, "Failed to read ckafka topics", &err);
                return None;
            }
        };

        let ids = topics
            .iter()
            .filter_map(|topic| topic.topic_name.as_deref())
            .collect::<Vec<_>>();
        state.id = Value::Value(Cow::Owned(ids_hash(&ids)));

        let list = topics.iter().map(TopicInfo::from).collect::<Vec<_>>();
        if let Err(err) = write_result_output_file(&state.result_output_file, &list).await {
            api_error(diags, "Failed to write result output file", &err);
            return None;
        }
        state.instance_list = Value::Value(list.into_iter().map(Value::Value).collect());
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::MockTransport;

    #[tokio::test]
    async fn list_topics() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply(
            "DescribeTopicDetail",
            json!({"Result": {"TotalCount": 2, "TopicList": [
                {"TopicName": "orders", "TopicId": "topic-1", "PartitionNum": 3},
                {"TopicName": "orders-dlq", "TopicId": "topic-2", "PartitionNum": 1},
            ]}}),
        );
        let data_source =
            CkafkaTopicsDataSource::new(ProviderHandle::with_client(transport.client()));

        let config = TopicsDataSourceState {
            instance_id: Value::Value("ckafka-1".into()),
            topic_name: Value::Value("orders".into()),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        let state = data_source
            .read(&mut diags, config, Default::default())
            .await
            .unwrap();

        assert_eq!(state.id.as_str(), ids_hash(&["orders", "orders-dlq"]));
        let list = state.instance_list.iter().flatten().collect::<Vec<_>>();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list[1].as_ref_option().map(|topic| topic.topic_id.clone()),
            Some(Value::Value("topic-2".to_owned()))
        );
        assert_eq!(
            transport.requests("DescribeTopicDetail")[0]["SearchWord"],
            "orders"
        );
    }
}
