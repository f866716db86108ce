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
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::value::ValueList;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::api::ckafka::{
    enum_name, Acl, AclRequest, ACL_OPERATION, ACL_PERMISSION_TYPE, ACL_PRINCIPAL_PREFIX,
    ACL_RESOURCE_TYPE,
};
use crate::utils::{
    attribute, join_id, split_id, value, WithNormalize, WithSchema, WithValidate,
};

mod data_source;
mod resource;

pub use data_source::CkafkaAclsDataSource;
pub use resource::CkafkaAclResource;

pub const DEFAULT_RESOURCE_TYPE: &str = "TOPIC";
pub const DEFAULT_PERMISSION_TYPE: &str = "ALLOW";
pub const ANY: &str = "*";

/// Resource types accepted by the ACL resource
pub const RESOURCE_TYPES: [&str; 2] = ["TOPIC", "GROUP"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AclState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub instance_id: ValueString<'a>,
    pub resource_type: ValueString<'a>,
    pub resource_name: ValueString<'a>,
    pub operation_type: ValueString<'a>,
    pub permission_type: ValueString<'a>,
    pub host: ValueString<'a>,
    pub principal: ValueString<'a>,
}

fn code(map: &HashMap<&'static str, i64>, name: &str, attribute: &str) -> Result<i64> {
    map.get(name)
        .copied()
        .ok_or_else(|| anyhow!("invalid `{attribute}` value `{name}`"))
}

fn check_enum(
    diags: &mut Diagnostics,
    attr_path: &AttributePath,
    attribute: &'static str,
    value: &ValueString<'_>,
    allowed: &[&str],
) {
    if let Some(value) = value.as_deref_option() {
        if !allowed.contains(&value) {
            diags.error(
                format!("Invalid {}", attribute.replace('_', " ")),
                format!("`{attribute}` must be one of {}, got `{value}`", allowed.join(", ")),
                attr_path.clone().attribute(attribute),
            );
        }
    }
}

impl<'a> AclState<'a> {
    /// API request equivalent of the state, principal carrying the `User:` prefix
    pub fn request(&self) -> Result<AclRequest> {
        Ok(AclRequest {
            instance_id: self.instance_id.as_str().to_owned(),
            resource_type: code(&ACL_RESOURCE_TYPE, self.resource_type.as_str(), "resource_type")?,
            resource_name: self.resource_name.as_str().to_owned(),
            operation: code(&ACL_OPERATION, self.operation_type.as_str(), "operation_type")?,
            permission_type: code(
                &ACL_PERMISSION_TYPE,
                self.permission_type.as_str(),
                "permission_type",
            )?,
            host: self.host.as_str().to_owned(),
            principal: format!("{ACL_PRINCIPAL_PREFIX}{}", self.principal.as_str()),
        })
    }

    /// `instance#permission#principal#host#operation#resource_type#resource_name`
    pub fn acl_id(&self) -> String {
        join_id(&[
            self.instance_id.as_str(),
            self.permission_type.as_str(),
            self.principal.as_str(),
            self.host.as_str(),
            self.operation_type.as_str(),
            self.resource_type.as_str(),
            self.resource_name.as_str(),
        ])
    }

    pub fn from_id(id: &str) -> Result<Self> {
        let [instance_id, permission_type, principal, host, operation_type, resource_type, resource_name] =
            split_id::<7>(id, "ckafka_acl")?;
        let owned = |s: &str| Value::Value(Cow::Owned(s.to_owned()));
        Ok(Self {
            id: owned(id),
            instance_id: owned(instance_id),
            resource_type: owned(resource_type),
            resource_name: owned(resource_name),
            operation_type: owned(operation_type),
            permission_type: owned(permission_type),
            host: owned(host),
            principal: owned(principal),
        })
    }
}

impl<'a> WithNormalize for AclState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.resource_type.is_null() {
            self.resource_type = Value::Value(Cow::Borrowed(DEFAULT_RESOURCE_TYPE));
        }
        if self.permission_type.is_null() {
            self.permission_type = Value::Value(Cow::Borrowed(DEFAULT_PERMISSION_TYPE));
        }
        if self.host.is_null() {
            self.host = Value::Value(Cow::Borrowed(ANY));
        }
        if self.principal.is_null() {
            self.principal = Value::Value(Cow::Borrowed(ANY));
        }
    }
}

#[async_trait]
impl<'a> WithValidate for AclState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        check_enum(diags, &attr_path, "resource_type", &self.resource_type, &RESOURCE_TYPES);
        check_enum(
            diags,
            &attr_path,
            "operation_type",
            &self.operation_type,
            &sorted_names(&ACL_OPERATION),
        );
        check_enum(
            diags,
            &attr_path,
            "permission_type",
            &self.permission_type,
            &["ALLOW", "DENY"],
        );
    }
}

fn sorted_names(map: &HashMap<&'static str, i64>) -> Vec<&'static str> {
    let mut names = map.iter().collect::<Vec<_>>();
    names.sort_by_key(|(_, code)| **code);
    names.into_iter().map(|(name, _)| *name).collect()
}

impl<'a> WithSchema for AclState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, OptionalComputed, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Use this resource to create a Ckafka Acl. Any change replaces the Acl."),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the Acl."),
                    "instance_id" => attribute(AttributeType::String, Required, "ID of the ckafka instance."),
                    "resource_type" => attribute(
                        AttributeType::String,
                        OptionalComputed,
                        "ACL resource type. Valid values are `TOPIC` and `GROUP`, default is `TOPIC`.",
                    ),
                    "resource_name" => attribute(AttributeType::String, Required, "ACL resource name, which is related to `resource_type`. For example, if `resource_type` is `TOPIC`, this field indicates the topic name."),
                    "operation_type" => attribute(
                        AttributeType::String,
                        Required,
                        "ACL operation mode. Valid values: `UNKNOWN`, `ANY`, `ALL`, `READ`, `WRITE`, `CREATE`, `DELETE`, `ALTER`, `DESCRIBE`, `CLUSTER_ACTION`, `DESCRIBE_CONFIGS` and `ALTER_CONFIGS`.",
                    ),
                    "permission_type" => attribute(
                        AttributeType::String,
                        OptionalComputed,
                        "ACL permission type. Valid values: `DENY`, `ALLOW`, default is `ALLOW`.",
                    ),
                    "host" => attribute(
                        AttributeType::String,
                        OptionalComputed,
                        "IP address allowed to access. The default value is `*`, which means that any host can access.",
                    ),
                    "principal" => attribute(
                        AttributeType::String,
                        OptionalComputed,
                        "User list. The default value is `*`, which means that any user can access. The current user can only be one included in the user list.",
                    ),
                },
                ..Default::default()
            },
        }
    }
}

/// Entry of the `acl_list` of the ACLs data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AclInfo {
    pub operation_type: Value<String>,
    pub permission_type: Value<String>,
    pub resource_type: Value<String>,
    pub resource_name: Value<String>,
    pub principal: Value<String>,
    pub host: Value<String>,
}

impl From<&Acl> for AclInfo {
    fn from(acl: &Acl) -> Self {
        let name = |map: &HashMap<&'static str, i64>, code: Option<i64>| {
            value(code.and_then(|code| enum_name(map, code)).map(str::to_owned))
        };
        Self {
            operation_type: name(&ACL_OPERATION, acl.operation),
            permission_type: name(&ACL_PERMISSION_TYPE, acl.permission_type),
            resource_type: name(&ACL_RESOURCE_TYPE, acl.resource_type),
            resource_name: value(acl.resource_name.clone()),
            principal: value(acl.principal.clone()),
            host: value(acl.host.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AclsDataSourceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub instance_id: ValueString<'a>,
    pub resource_type: ValueString<'a>,
    pub resource_name: ValueString<'a>,
    pub host: ValueString<'a>,
    pub result_output_file: ValueString<'a>,
    pub acl_list: ValueList<Value<AclInfo>>,
}

impl<'a> WithSchema for AclsDataSourceState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Use this data source to query detailed acl information of Ckafka"),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the query."),
                    "instance_id" => attribute(AttributeType::String, Required, "ID of the ckafka instance."),
                    "resource_type" => attribute(AttributeType::String, Required, "ACL resource type. Valid values are `UNKNOWN`, `ANY`, `TOPIC`, `GROUP`, `CLUSTER`, `TRANSACTIONAL_ID`. Currently only `TOPIC` is available, and other fields will be used for future ACLs compatible with open-source Kafka."),
                    "resource_name" => attribute(AttributeType::String, Required, "ACL resource name, which is related to `resource_type`."),
                    "host" => attribute(AttributeType::String, Optional, "Host substr used for querying."),
                    "result_output_file" => attribute(AttributeType::String, Optional, "Used to store results."),
                    "acl_list" => attribute(
                        AttributeType::List(
                            AttributeType::Object(map! {
                                "operation_type" => AttributeType::String,
                                "permission_type" => AttributeType::String,
                                "resource_type" => AttributeType::String,
                                "resource_name" => AttributeType::String,
                                "principal" => AttributeType::String,
                                "host" => AttributeType::String,
                            })
                            .into(),
                        ),
                        Computed,
                        "A list of ckafka acls. Each element contains the following attributes.",
                    ),
                },
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for AclsDataSourceState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        check_enum(
            diags,
            &attr_path,
            "resource_type",
            &self.resource_type,
            &sorted_names(&ACL_RESOURCE_TYPE),
        );
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn state() -> AclState<'static> {
        let mut state = AclState {
            instance_id: Value::Value("ckafka-1".into()),
            resource_name: Value::Value("orders".into()),
            operation_type: Value::Value("WRITE".into()),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());
        state
    }

    #[test]
    fn acl_id_round_trips() {
        let state = state();
        let id = state.acl_id();
        assert_eq!(id, "ckafka-1#ALLOW#*#*#WRITE#TOPIC#orders");

        let parsed = AclState::from_id(&id).unwrap();
        assert_eq!(parsed.request().unwrap(), state.request().unwrap());
        assert!(AclState::from_id("ckafka-1#ALLOW").is_err());
    }

    #[test]
    fn request_codes() {
        let request = serde_json::to_value(state().request().unwrap()).unwrap();
        assert_eq!(
            request,
            json!({
                "InstanceId": "ckafka-1",
                "ResourceType": 2,
                "ResourceName": "orders",
                "Operation": 4,
                "PermissionType": 3,
                "Host": "*",
                "Principal": "User:*",
            })
        );

        let invalid = AclState {
            operation_type: Value::Value("FLY".into()),
            ..state()
        };
        assert!(invalid.request().is_err());
    }

    #[tokio::test]
    async fn validate_enumerations() {
        let invalid = AclState {
            resource_type: Value::Value("CLUSTER".into()),
            permission_type: Value::Value("ANY".into()),
            ..state()
        };
        let mut diags = Diagnostics::default();
        invalid.validate(&mut diags, AttributePath::default()).await;
        assert_eq!(diags.errors.len(), 2);

        let mut diags = Diagnostics::default();
        state().validate(&mut diags, AttributePath::default()).await;
        assert!(diags.errors.is_empty());
    }
}
