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

use serde::{Deserialize, Serialize};

use tf_provider::value::ValueList;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueString};
use tf_provider::map;

use crate::api::ckafka::User;
use crate::utils::{attribute, string_value, value, WithSchema};

mod data_source;
mod resource;

pub use data_source::CkafkaUsersDataSource;
pub use resource::CkafkaUserResource;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub instance_id: ValueString<'a>,
    pub account_name: ValueString<'a>,
    pub password: ValueString<'a>,
    pub create_time: ValueString<'a>,
    pub update_time: ValueString<'a>,
}

impl<'a> UserState<'a> {
    pub fn set_user(&mut self, user: &User) {
        self.create_time = string_value(user.create_time.clone());
        self.update_time = string_value(user.update_time.clone());
    }
}

impl<'a> WithSchema for UserState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Use this resource to create a ckafka user."),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the user, as `<instance_id>#<account_name>`."),
                    "instance_id" => attribute(
                        AttributeType::String,
                        Required,
                        "ID of the ckafka instance. Changing it recreates the user.",
                    ),
                    "account_name" => attribute(
                        AttributeType::String,
                        Required,
                        "Account name used to access to ckafka instance. Changing it recreates the user.",
                    ),
                    "password" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Password of the account."),
                        constraint: Required,
                        sensitive: true,
                        ..Default::default()
                    },
                    "create_time" => attribute(AttributeType::String, Computed, "Creation time of the account."),
                    "update_time" => attribute(AttributeType::String, Computed, "The last update time of the account."),
                },
                ..Default::default()
            },
        }
    }
}

/// Entry of the `user_list` of the users data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserInfo {
    pub account_name: Value<String>,
    pub create_time: Value<String>,
    pub update_time: Value<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            account_name: value(user.name.clone()),
            create_time: value(user.create_time.clone()),
            update_time: value(user.update_time.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UsersDataSourceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub instance_id: ValueString<'a>,
    pub account_name: ValueString<'a>,
    pub result_output_file: ValueString<'a>,
    pub user_list: ValueList<Value<UserInfo>>,
}

impl<'a> WithSchema for UsersDataSourceState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Use this data source to query detailed user information of ckafka."),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the query."),
                    "instance_id" => attribute(AttributeType::String, Required, "Id of the ckafka instance."),
                    "account_name" => attribute(AttributeType::String, Optional, "Account name used when query ckafka users' infos. Could be a substr of user name."),
                    "result_output_file" => attribute(AttributeType::String, Optional, "Used to store results."),
                    "user_list" => attribute(
                        AttributeType::List(
                            AttributeType::Object(map! {
                                "account_name" => AttributeType::String,
                                "create_time" => AttributeType::String,
                                "update_time" => AttributeType::String,
                            })
                            .into(),
                        ),
                        Computed,
                        "A list of ckafka users. Each element contains the following attributes.",
                    ),
                },
                ..Default::default()
            },
        }
    }
}
