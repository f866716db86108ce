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
use crate::utils::{
    api_error, ids_hash, join_id, write_result_output_file, WithSchema, WithValidate,
};

use super::{AclInfo, AclsDataSourceState};

#[derive(Debug, Default, Clone)]
pub struct CkafkaAclsDataSource {
    handle: ProviderHandle,
}

impl CkafkaAclsDataSource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl DataSource for CkafkaAclsDataSource {
    type State<'a> = AclsDataSourceState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(AclsDataSourceState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, Default::default()).await;

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let service = self.handle.service(diags)?;
        let mut state = config;

        let acls = match service
            .describe_acls(
                state.instance_id.as_str(),
                state.resource_type.as_str(),
                state.resource_name.as_str(),
                state.host.as_deref_option().unwrap_or_default(),
            )
            .await
        {
            Ok(acls) => acls,
            Err(err) => {
                api_error(diags, "Failed to read ckafka acls", &err);
                return None;
            }
        };

        let list = acls.iter().map(AclInfo::from).collect::<Vec<_>>();
        let ids = list
            .iter()
            .map(|acl| {
                join_id(&[
                    acl.resource_name.as_deref_option().unwrap_or_default(),
                    acl.principal.as_deref_option().unwrap_or_default(),
                    acl.host.as_deref_option().unwrap_or_default(),
                    acl.operation_type.as_deref_option().unwrap_or_default(),
                    acl.permission_type.as_deref_option().unwrap_or_default(),
                ])
            })
            .collect::<Vec<_>>();
        state.id = Value::Value(Cow::Owned(ids_hash(&ids)));

        if let Err(err) = write_result_output_file(&state.result_output_file, &list).await {
            api_error(diags, "Failed to write result output file", &err);
            return None;
        }
        state.acl_list = Value::Value(list.into_iter().map(Value::Value).collect());
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
    async fn list_acls_by_name() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1"}}),
        );
        transport.reply(
            "DescribeACL",
            json!({"Result": {"TotalCount": 1, "AclList": [
                {"ResourceType": 3, "ResourceName": "consumers", "Principal": "User:bob", "Host": "10.0.0.1", "Operation": 3, "PermissionType": 2},
            ]}}),
        );
        let data_source = CkafkaAclsDataSource::new(ProviderHandle::with_client(transport.client()));

        let config = AclsDataSourceState {
            instance_id: Value::Value("ckafka-1".into()),
            resource_type: Value::Value("GROUP".into()),
            resource_name: Value::Value("consumers".into()),
            host: Value::Value("10.0".into()),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        let state = data_source
            .read(&mut diags, config, Default::default())
            .await
            .unwrap();

        let acls = state.acl_list.iter().flatten().collect::<Vec<_>>();
        assert_eq!(acls.len(), 1);
        assert_eq!(
            acls[0].as_ref_option().cloned(),
            Some(AclInfo {
                operation_type: Value::Value("READ".to_owned()),
                permission_type: Value::Value("DENY".to_owned()),
                resource_type: Value::Value("GROUP".to_owned()),
                resource_name: Value::Value("consumers".to_owned()),
                principal: Value::Value("User:bob".to_owned()),
                host: Value::Value("10.0.0.1".to_owned()),
            })
        );

        let sent = &transport.requests("DescribeACL")[0];
        assert_eq!(sent["ResourceType"], 3);
        assert_eq!(sent["SearchWord"], "10.0");
        // Only topics are looked up before listing
        assert!(transport.requests("DescribeTopicAttributes").is_empty());
    }
}
