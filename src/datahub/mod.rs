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

use serde::{Deserialize, Serialize};

use tf_provider::value::ValueNumber;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueMap, ValueString};
use tf_provider::map;

use crate::api::ckafka::{
    CreateDatahubTopicRequest, DatahubTaskFilter, DatahubTopic, ModifyDatahubTopicRequest, Tag,
};
use crate::flatten::Flatten;
use crate::utils::{attribute, non_empty, WithSchema};

mod data_source;
mod params;
mod resource;

pub use data_source::CkafkaDatahubTaskDataSource;
pub use params::*;
pub use resource::CkafkaDatahubTopicResource;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatahubTopicState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub partition_num: ValueNumber,
    pub retention_ms: ValueNumber,
    pub note: ValueString<'a>,
    pub tags: ValueMap<'a, ValueString<'a>>,
}

impl<'a> DatahubTopicState<'a> {
    /// Configured tags, sorted by key
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags = self
            .tags
            .iter()
            .flatten()
            .filter_map(|(key, value)| {
                Some(Tag {
                    tag_key: key.to_string(),
                    tag_value: value.as_deref_option()?.to_owned(),
                })
            })
            .collect::<Vec<_>>();
        tags.sort_by(|a, b| a.tag_key.cmp(&b.tag_key));
        tags
    }

    pub fn create_request(&self) -> CreateDatahubTopicRequest {
        CreateDatahubTopicRequest {
            name: self.name.as_str().to_owned(),
            partition_num: self.partition_num.as_ref_option().copied().unwrap_or_default(),
            retention_ms: self.retention_ms.as_ref_option().copied().unwrap_or_default(),
            note: non_empty(&self.note).map(str::to_owned),
            tags: self.tags(),
        }
    }

    pub fn modify_request(&self) -> ModifyDatahubTopicRequest {
        ModifyDatahubTopicRequest {
            name: self.name.as_str().to_owned(),
            retention_ms: self.retention_ms.as_ref_option().copied().unwrap_or_default(),
            note: non_empty(&self.note).map(str::to_owned),
            tags: self.tags(),
        }
    }

    /// Tags are not reported by `DescribeDatahubTopic`, the configured ones are kept
    pub fn set_topic(&mut self, topic: &DatahubTopic) {
        if let Some(name) = &topic.name {
            self.name = Value::Value(Cow::Owned(name.clone()));
        }
        if let Some(partition_num) = topic.partition_num {
            self.partition_num = Value::Value(partition_num);
        }
        if let Some(retention_ms) = topic.retention_ms {
            self.retention_ms = Value::Value(retention_ms);
        }
        self.note = match topic.note.as_deref() {
            Some(note) if !note.is_empty() => Value::Value(Cow::Owned(note.to_owned())),
            _ => Value::Null,
        };
    }
}

impl<'a> WithSchema for DatahubTopicState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Provides a resource to create a ckafka datahub_topic"),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the datahub topic, its name."),
                    "name" => attribute(
                        AttributeType::String,
                        Required,
                        "Name, start with appid, which is a string of no more than 128 characters, must start with a letter, and the rest can contain letters, numbers, and dashes (-). Changing it recreates the topic.",
                    ),
                    "partition_num" => attribute(
                        AttributeType::Number,
                        Required,
                        "Number of Partitions, greater than 0. Changing it recreates the topic.",
                    ),
                    "retention_ms" => attribute(
                        AttributeType::Number,
                        Required,
                        "Message retention period in milliseconds, the current minimum value is 60000 ms.",
                    ),
                    "note" => attribute(
                        AttributeType::String,
                        Optional,
                        "Subject note, which is a string of no more than 64 characters, must start with a letter, and the rest can contain letters, numbers and dashes (-).",
                    ),
                    "tags" => attribute(
                        AttributeType::Map(AttributeType::String.into()),
                        Optional,
                        "Tag description list.",
                    ),
                },
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatahubTaskDataSourceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub search_word: ValueString<'a>,
    pub target_type: ValueString<'a>,
    pub task_type: ValueString<'a>,
    pub source_type: ValueString<'a>,
    pub resource: ValueString<'a>,
    pub result_output_file: ValueString<'a>,
    pub task_list: Value<Vec<DatahubTaskInfo>>,
}

impl<'a> DatahubTaskDataSourceState<'a> {
    pub fn filter(&self) -> DatahubTaskFilter {
        DatahubTaskFilter {
            search_word: non_empty(&self.search_word).map(str::to_owned),
            target_type: non_empty(&self.target_type).map(str::to_owned),
            task_type: non_empty(&self.task_type).map(str::to_owned),
            source_type: non_empty(&self.source_type).map(str::to_owned),
            resource: non_empty(&self.resource).map(str::to_owned),
        }
    }
}

impl<'a> WithSchema for DatahubTaskDataSourceState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Use this data source to query detailed information of ckafka datahub_task"),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the query."),
                    "search_word" => attribute(AttributeType::String, Optional, "Search key."),
                    "target_type" => attribute(AttributeType::String, Optional, "Destination type of dump."),
                    "task_type" => attribute(AttributeType::String, Optional, "Task type, SOURCE|SINK."),
                    "source_type" => attribute(AttributeType::String, Optional, "The source type."),
                    "resource" => attribute(AttributeType::String, Optional, "Resource."),
                    "result_output_file" => attribute(AttributeType::String, Optional, "Used to save results."),
                    "task_list" => attribute(
                        AttributeType::List(DatahubTaskInfo::attribute_type().into()),
                        Computed,
                        "Datahub task information list.",
                    ),
                },
                ..Default::default()
            },
        }
    }
}
