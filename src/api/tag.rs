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

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use serde::{de::IgnoredAny, Deserialize, Serialize};

use super::retry::{retry, retryable, READ_RETRY_TIMEOUT, WRITE_RETRY_TIMEOUT};
use super::{Client, TAG};

const TAG_PAGE_LIMIT: i64 = 100;

/// Six-segment resource name used by the tag API
pub fn build_resource_name(service: &str, resource_prefix: &str, region: &str, id: &str) -> String {
    format!("qcs::{service}:{region}:uin/:{resource_prefix}/{id}")
}

/// Tags to set, and tag keys to remove, to go from `old` to `new`
pub fn diff_tags(
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> (BTreeMap<String, String>, Vec<String>) {
    let replace = new
        .iter()
        .filter(|(key, value)| old.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let delete = old
        .keys()
        .filter(|key| !new.contains_key(*key))
        .cloned()
        .collect();
    (replace, delete)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeResourceTagsRequest<'a> {
    service_type: &'a str,
    resource_prefix: &'a str,
    resource_ids: [&'a str; 1],
    resource_region: &'a str,
    offset: i64,
    limit: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceTags {
    #[serde(default)]
    tags: Vec<ResourceTag>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResourceTag {
    tag_key: String,
    #[serde(default)]
    tag_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TagKeyValue<'a> {
    tag_key: &'a str,
    tag_value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TagKey<'a> {
    tag_key: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ModifyResourceTagsRequest<'a> {
    resource: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    replace_tags: Vec<TagKeyValue<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    delete_tags: Vec<TagKey<'a>>,
}

#[derive(Debug, Clone)]
pub struct TagService {
    client: Arc<Client>,
    log_id: String,
}

impl TagService {
    pub fn new(client: Arc<Client>, log_id: String) -> Self {
        Self { client, log_id }
    }

    pub async fn describe_resource_tags(
        &self,
        service_type: &str,
        resource_prefix: &str,
        region: &str,
        resource_id: &str,
    ) -> Result<BTreeMap<String, String>> {
        let mut tags = BTreeMap::new();
        let mut offset = 0;
        loop {
            let request = DescribeResourceTagsRequest {
                service_type,
                resource_prefix,
                resource_ids: [resource_id],
                resource_region: region,
                offset,
                limit: TAG_PAGE_LIMIT,
            };
            let request = &request;
            let page: ResourceTags = retry(READ_RETRY_TIMEOUT, move || async move {
                self.client
                    .call(
                        &self.log_id,
                        TAG,
                        "DescribeResourceTagsByResourceIds",
                        request,
                    )
                    .await
                    .map_err(|err| retryable(err.into()))
            })
            .await?;

            let count = page.tags.len() as i64;
            tags.extend(page.tags.into_iter().map(|tag| (tag.tag_key, tag.tag_value)));
            if count < TAG_PAGE_LIMIT {
                break;
            }
            offset += TAG_PAGE_LIMIT;
        }
        Ok(tags)
    }

    pub async fn modify_tags(
        &self,
        resource_name: &str,
        replace: &BTreeMap<String, String>,
        delete: &[String],
    ) -> Result<()> {
        if replace.is_empty() && delete.is_empty() {
            return Ok(());
        }
        let request = ModifyResourceTagsRequest {
            resource: resource_name,
            replace_tags: replace
                .iter()
                .map(|(key, value)| TagKeyValue {
                    tag_key: key,
                    tag_value: value,
                })
                .collect(),
            delete_tags: delete.iter().map(|key| TagKey { tag_key: key }).collect(),
        };
        let request = &request;
        retry(WRITE_RETRY_TIMEOUT, move || async move {
            self.client
                .call::<_, IgnoredAny>(&self.log_id, TAG, "ModifyResourceTags", request)
                .await
                .map(|_| ())
                .map_err(|err| retryable(err.into()))
        })
        .await
    }
}
