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
use std::collections::BTreeMap;

use async_trait::async_trait;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use tf_provider::value::{ValueList, ValueNumber};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::api::ckafka::{CreateRouteRequest, Route, VipEntity};
use crate::utils::{
    attribute, join_id, non_empty, value, DisplayJoinable, WithSchema, WithValidate,
};

mod resource;

pub use resource::CkafkaRouteResource;

/// Attributes which recreate the route when changed
pub const IMMUTABLE_ATTRIBUTES: &[&str] = &[
    "instance_id",
    "vip_type",
    "vpc_id",
    "subnet_id",
    "access_type",
    "auth_flag",
    "caller_appid",
    "public_network",
    "ip",
];

lazy_static! {
    /// Routing network types, by `VipType`
    pub static ref VIP_TYPES: BTreeMap<i64, &'static str> = BTreeMap::from([
        (3, "vpc"),
        (4, "standard support"),
        (7, "professional support"),
    ]);
    pub static ref ACCESS_TYPES: BTreeMap<i64, &'static str> = BTreeMap::from([
        (0, "PLAINTEXT"),
        (1, "SASL_PLAINTEXT"),
        (3, "SASL_SSL"),
    ]);
}

fn check_code(
    diags: &mut Diagnostics,
    attr_path: &AttributePath,
    attribute: &'static str,
    value: &ValueNumber,
    allowed: &BTreeMap<i64, &'static str>,
) {
    if let Some(code) = value.as_ref_option() {
        if !allowed.contains_key(code) {
            let names = allowed.iter().map(|(code, name)| format!("{code} ({name})"));
            diags.error(
                format!("Invalid {}", attribute.replace('_', " ")),
                format!("`{attribute}` must be one of {}, got `{code}`", names.join_with(", ")),
                attr_path.clone().attribute(attribute),
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Vip {
    pub vip: Value<String>,
    pub vport: Value<String>,
}

impl From<&VipEntity> for Vip {
    fn from(vip: &VipEntity) -> Self {
        Self {
            vip: value(vip.vip.clone()),
            vport: value(vip.vport.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RouteState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub instance_id: ValueString<'a>,
    pub vip_type: ValueNumber,
    pub vpc_id: ValueString<'a>,
    pub subnet_id: ValueString<'a>,
    pub access_type: ValueNumber,
    pub auth_flag: ValueNumber,
    pub caller_appid: ValueNumber,
    pub public_network: ValueNumber,
    pub ip: ValueString<'a>,
    pub vip_list: ValueList<Value<Vip>>,
}

impl<'a> RouteState<'a> {
    pub fn create_request(&self) -> CreateRouteRequest {
        CreateRouteRequest {
            instance_id: self.instance_id.as_str().to_owned(),
            vip_type: self.vip_type.as_ref_option().copied().unwrap_or_default(),
            vpc_id: non_empty(&self.vpc_id).map(str::to_owned),
            subnet_id: non_empty(&self.subnet_id).map(str::to_owned),
            access_type: self.access_type.as_ref_option().copied(),
            auth_flag: self.auth_flag.as_ref_option().copied(),
            caller_appid: self.caller_appid.as_ref_option().copied(),
            public_network: self.public_network.as_ref_option().copied(),
            ip: non_empty(&self.ip).map(str::to_owned),
        }
    }

    pub fn set_id(&mut self, route_id: i64) {
        let id = join_id(&[self.instance_id.as_str(), &route_id.to_string()]);
        self.id = Value::Value(Cow::Owned(id));
    }

    /// Only what the API reports back, the network settings are kept as configured
    pub fn set_route(&mut self, route: &Route) {
        if let Some(vip_type) = route.vip_type {
            self.vip_type = Value::Value(vip_type);
        }
        if let Some(access_type) = route.access_type {
            if !self.access_type.is_null() {
                self.access_type = Value::Value(access_type);
            }
        }
        self.vip_list = Value::Value(
            route
                .vip_list
                .iter()
                .map(|vip| Value::Value(Vip::from(vip)))
                .collect(),
        );
    }

    /// Value of an [`IMMUTABLE_ATTRIBUTES`] entry, for change detection
    pub fn immutable_value(&self, name: &str) -> String {
        fn show<T: std::fmt::Debug>(value: &Value<T>) -> String {
            match value {
                Value::Value(value) => format!("{value:?}"),
                Value::Null => "null".to_owned(),
                Value::Unknown => "unknown".to_owned(),
            }
        }
        match name {
            "instance_id" => show(&self.instance_id),
            "vip_type" => show(&self.vip_type),
            "vpc_id" => show(&self.vpc_id),
            "subnet_id" => show(&self.subnet_id),
            "access_type" => show(&self.access_type),
            "auth_flag" => show(&self.auth_flag),
            "caller_appid" => show(&self.caller_appid),
            "public_network" => show(&self.public_network),
            "ip" => show(&self.ip),
            _ => String::new(),
        }
    }
}

#[async_trait]
impl<'a> WithValidate for RouteState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        check_code(diags, &attr_path, "vip_type", &self.vip_type, &VIP_TYPES);
        check_code(diags, &attr_path, "access_type", &self.access_type, &ACCESS_TYPES);
    }
}

impl<'a> WithSchema for RouteState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Provides a resource to create a ckafka route"),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the route, as `<instance_id>#<route_id>`."),
                    "instance_id" => attribute(AttributeType::String, Required, "InstanceId."),
                    "vip_type" => attribute(
                        AttributeType::Number,
                        Required,
                        "Routing network type (3:vpc routing; 4: standard support routing; 7: professional support routing).",
                    ),
                    "vpc_id" => attribute(AttributeType::String, Optional, "Vpc id."),
                    "subnet_id" => attribute(AttributeType::String, Optional, "Subnet id."),
                    "access_type" => attribute(
                        AttributeType::Number,
                        Optional,
                        "Access type. Valid values: 0: PLAINTEXT (in clear text, supported by both the old version and the community version without user information), 1: SASL_PLAINTEXT (in clear text, only supported by the community version with user information), 3: SASL_SSL (SSL encrypted, only supported by the community version with user information).",
                    ),
                    "auth_flag" => attribute(AttributeType::Number, Optional, "Auth flag."),
                    "caller_appid" => attribute(AttributeType::Number, Optional, "Caller appid."),
                    "public_network" => attribute(AttributeType::Number, Optional, "Public network."),
                    "ip" => attribute(AttributeType::String, Optional, "Ip."),
                    "vip_list" => attribute(
                        AttributeType::List(
                            AttributeType::Object(map! {
                                "vip" => AttributeType::String,
                                "vport" => AttributeType::String,
                            })
                            .into(),
                        ),
                        Computed,
                        "Virtual IP list of the route.",
                    ),
                },
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    pub(super) fn state() -> RouteState<'static> {
        RouteState {
            instance_id: Value::Value("ckafka-1".into()),
            vip_type: Value::Value(3),
            vpc_id: Value::Value("vpc-1".into()),
            subnet_id: Value::Value("subnet-1".into()),
            access_type: Value::Value(0),
            ..Default::default()
        }
    }

    #[test]
    fn create_request() {
        let request = serde_json::to_value(state().create_request()).unwrap();
        assert_eq!(
            request,
            json!({
                "InstanceId": "ckafka-1",
                "VipType": 3,
                "VpcId": "vpc-1",
                "SubnetId": "subnet-1",
                "AccessType": 0,
            })
        );
    }

    #[test]
    fn refresh_from_route() {
        let mut state = state();
        state.set_id(7);
        assert_eq!(state.id.as_str(), "ckafka-1#7");

        let route: Route = serde_json::from_value(json!({
            "RouteId": 7,
            "VipType": 3,
            "AccessType": 1,
            "VipList": [{"Vip": "10.0.0.7", "Vport": "9092"}],
        }))
        .unwrap();
        state.set_route(&route);
        assert_eq!(state.access_type, Value::Value(1));
        let vips = state.vip_list.iter().flatten().collect::<Vec<_>>();
        assert_eq!(
            vips[0].as_ref_option().map(|vip| vip.vport.clone()),
            Some(Value::Value("9092".to_owned()))
        );
        assert_eq!(state.immutable_value("vpc_id"), "\"vpc-1\"");
        assert_eq!(state.immutable_value("ip"), "null");
    }
}
