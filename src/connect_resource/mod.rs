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
use serde::{Deserialize, Serialize};

use tf_provider::schema::NestedBlock;
use tf_provider::value::ValueNumber;
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::api::ckafka::{ConnectResourceFilter, PAGE_LIMIT};
use crate::flatten::{Configure, Flatten};
use crate::utils::{attribute, changed, non_empty, WithNormalize, WithSchema, WithValidate};

mod data_source;
mod params;
mod resource;

pub use data_source::CkafkaConnectResourceDataSource;
pub use params::*;
pub use resource::CkafkaConnectResource;

/// Connection parameters holding a password the API may not report back
trait Credentials: Configure {
    fn password(&mut self) -> Option<&mut Value<String>>;
}

macro_rules! with_password {
    ($($param:ty),*) => {$(
        impl Credentials for $param {
            fn password(&mut self) -> Option<&mut Value<String>> {
                Some(&mut self.password)
            }
        }
    )*};
}

with_password!(
    DtsConnectParam,
    MongodbConnectParam,
    EsConnectParam,
    ClickhouseConnectParam,
    MysqlConnectParam,
    PostgresqlConnectParam,
    MariadbConnectParam,
    SqlserverConnectParam,
    DorisConnectParam
);

impl Credentials for KafkaConnectParam {
    fn password(&mut self) -> Option<&mut Value<String>> {
        None
    }
}

fn model<T: Configure>(blocks: &Value<Vec<T>>) -> Option<T::Model> {
    blocks.as_ref_option()?.first().map(T::to_model)
}

fn apply_defaults<T: Configure>(blocks: &mut Value<Vec<T>>) {
    if let Value::Value(blocks) = blocks {
        blocks.iter_mut().for_each(T::apply_defaults);
    }
}

/// Replace the configured block by the remote one, keeping the configured password
/// when the remote one is empty
fn refresh<T: Credentials>(blocks: &mut Value<Vec<T>>, model: &Option<T::Model>) {
    let Some(model) = model else {
        if !blocks.is_null() {
            *blocks = Value::Value(Vec::new());
        }
        return;
    };
    let mut block = T::flatten(model);
    block.apply_defaults();

    let prior = match blocks {
        Value::Value(prior) => prior
            .first_mut()
            .and_then(T::password)
            .map(|password| password.clone()),
        _ => None,
    };
    if let (Some(password), Some(prior)) = (block.password(), prior) {
        if password.as_deref_option().map_or(true, str::is_empty) {
            *password = prior;
        }
    }
    *blocks = Value::Value(vec![block]);
}

/// Body of `CreateConnectResource` and `ModifyConnectResource`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConnectResourceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "DtsConnectParam", skip_serializing_if = "Option::is_none")]
    pub dts_connect_param: Option<DtsConnectParamModel>,
    #[serde(rename = "MongoDBConnectParam", skip_serializing_if = "Option::is_none")]
    pub mongodb_connect_param: Option<MongodbConnectParamModel>,
    #[serde(rename = "EsConnectParam", skip_serializing_if = "Option::is_none")]
    pub es_connect_param: Option<EsConnectParamModel>,
    #[serde(rename = "ClickHouseConnectParam", skip_serializing_if = "Option::is_none")]
    pub clickhouse_connect_param: Option<ClickhouseConnectParamModel>,
    #[serde(rename = "MySQLConnectParam", skip_serializing_if = "Option::is_none")]
    pub mysql_connect_param: Option<MysqlConnectParamModel>,
    #[serde(rename = "PostgreSQLConnectParam", skip_serializing_if = "Option::is_none")]
    pub postgresql_connect_param: Option<PostgresqlConnectParamModel>,
    #[serde(rename = "MariaDBConnectParam", skip_serializing_if = "Option::is_none")]
    pub mariadb_connect_param: Option<MariadbConnectParamModel>,
    #[serde(rename = "SQLServerConnectParam", skip_serializing_if = "Option::is_none")]
    pub sqlserver_connect_param: Option<SqlserverConnectParamModel>,
    #[serde(rename = "DorisConnectParam", skip_serializing_if = "Option::is_none")]
    pub doris_connect_param: Option<DorisConnectParamModel>,
    #[serde(rename = "KafkaConnectParam", skip_serializing_if = "Option::is_none")]
    pub kafka_connect_param: Option<KafkaConnectParamModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectResourceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub resource_name: ValueString<'a>,
    pub r#type: ValueString<'a>,
    pub description: ValueString<'a>,
    pub dts_connect_param: Value<Vec<DtsConnectParam>>,
    pub mongodb_connect_param: Value<Vec<MongodbConnectParam>>,
    pub es_connect_param: Value<Vec<EsConnectParam>>,
    pub clickhouse_connect_param: Value<Vec<ClickhouseConnectParam>>,
    pub mysql_connect_param: Value<Vec<MysqlConnectParam>>,
    pub postgresql_connect_param: Value<Vec<PostgresqlConnectParam>>,
    pub mariadb_connect_param: Value<Vec<MariadbConnectParam>>,
    pub sqlserver_connect_param: Value<Vec<SqlserverConnectParam>>,
    pub doris_connect_param: Value<Vec<DorisConnectParam>>,
    pub kafka_connect_param: Value<Vec<KafkaConnectParam>>,
}

impl<'a> ConnectResourceState<'a> {
    pub fn create_request(&self) -> ConnectResourceRequest {
        ConnectResourceRequest {
            resource_id: None,
            resource_name: self.resource_name.as_deref_option().map(str::to_owned),
            r#type: self.r#type.as_deref_option().map(str::to_owned),
            description: non_empty(&self.description).map(str::to_owned),
            dts_connect_param: model(&self.dts_connect_param),
            mongodb_connect_param: model(&self.mongodb_connect_param),
            es_connect_param: model(&self.es_connect_param),
            clickhouse_connect_param: model(&self.clickhouse_connect_param),
            mysql_connect_param: model(&self.mysql_connect_param),
            postgresql_connect_param: model(&self.postgresql_connect_param),
            mariadb_connect_param: model(&self.mariadb_connect_param),
            sqlserver_connect_param: model(&self.sqlserver_connect_param),
            doris_connect_param: model(&self.doris_connect_param),
            kafka_connect_param: model(&self.kafka_connect_param),
        }
    }

    /// Request carrying only what changed since `prior`, `None` when nothing did
    pub fn modify_request(&self, prior: &Self) -> Option<ConnectResourceRequest> {
        fn if_changed<T: Configure + PartialEq>(
            prior: &Value<Vec<T>>,
            planned: &Value<Vec<T>>,
        ) -> Option<T::Model> {
            changed(prior, planned).then(|| model(planned)).flatten()
        }

        let request = ConnectResourceRequest {
            resource_id: Some(self.id.as_str().to_owned()),
            resource_name: changed(&prior.resource_name, &self.resource_name)
                .then(|| self.resource_name.as_deref_option().map(str::to_owned))
                .flatten(),
            r#type: None,
            description: changed(&prior.description, &self.description)
                .then(|| non_empty(&self.description).map(str::to_owned))
                .flatten(),
            dts_connect_param: if_changed(&prior.dts_connect_param, &self.dts_connect_param),
            mongodb_connect_param: if_changed(
                &prior.mongodb_connect_param,
                &self.mongodb_connect_param,
            ),
            es_connect_param: if_changed(&prior.es_connect_param, &self.es_connect_param),
            clickhouse_connect_param: if_changed(
                &prior.clickhouse_connect_param,
                &self.clickhouse_connect_param,
            ),
            mysql_connect_param: if_changed(&prior.mysql_connect_param, &self.mysql_connect_param),
            postgresql_connect_param: if_changed(
                &prior.postgresql_connect_param,
                &self.postgresql_connect_param,
            ),
            mariadb_connect_param: if_changed(
                &prior.mariadb_connect_param,
                &self.mariadb_connect_param,
            ),
            sqlserver_connect_param: if_changed(
                &prior.sqlserver_connect_param,
                &self.sqlserver_connect_param,
            ),
            doris_connect_param: if_changed(&prior.doris_connect_param, &self.doris_connect_param),
            kafka_connect_param: if_changed(&prior.kafka_connect_param, &self.kafka_connect_param),
        };
        let unchanged = ConnectResourceRequest {
            resource_id: request.resource_id.clone(),
            ..Default::default()
        };
        (request != unchanged).then_some(request)
    }

    pub fn set_resource(&mut self, detail: &ConnectResourceInfoModel) {
        if let Some(name) = &detail.resource_name {
            self.resource_name = Value::Value(Cow::Owned(name.clone()));
        }
        if let Some(kind) = &detail.r#type {
            self.r#type = Value::Value(Cow::Owned(kind.clone()));
        }
        match detail.description.as_deref() {
            Some(description) if !description.is_empty() => {
                self.description = Value::Value(Cow::Owned(description.to_owned()));
            }
            _ => self.description = Value::Null,
        }
        refresh(&mut self.dts_connect_param, &detail.dts_connect_param);
        refresh(&mut self.mongodb_connect_param, &detail.mongodb_connect_param);
        refresh(&mut self.es_connect_param, &detail.es_connect_param);
        refresh(&mut self.clickhouse_connect_param, &detail.clickhouse_connect_param);
        refresh(&mut self.mysql_connect_param, &detail.mysql_connect_param);
        refresh(&mut self.postgresql_connect_param, &detail.postgresql_connect_param);
        refresh(&mut self.mariadb_connect_param, &detail.mariadb_connect_param);
        refresh(&mut self.sqlserver_connect_param, &detail.sqlserver_connect_param);
        refresh(&mut self.doris_connect_param, &detail.doris_connect_param);
        refresh(&mut self.kafka_connect_param, &detail.kafka_connect_param);
    }
}

impl<'a> WithNormalize for ConnectResourceState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        apply_defaults(&mut self.dts_connect_param);
        apply_defaults(&mut self.mongodb_connect_param);
        apply_defaults(&mut self.es_connect_param);
        apply_defaults(&mut self.clickhouse_connect_param);
        apply_defaults(&mut self.mysql_connect_param);
        apply_defaults(&mut self.postgresql_connect_param);
        apply_defaults(&mut self.mariadb_connect_param);
        apply_defaults(&mut self.sqlserver_connect_param);
        apply_defaults(&mut self.doris_connect_param);
        apply_defaults(&mut self.kafka_connect_param);
    }
}

#[async_trait]
impl<'a> WithValidate for ConnectResourceState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        let counts = [
            ("dts_connect_param", self.dts_connect_param.iter().flatten().count()),
            ("mongodb_connect_param", self.mongodb_connect_param.iter().flatten().count()),
            ("es_connect_param", self.es_connect_param.iter().flatten().count()),
            ("clickhouse_connect_param", self.clickhouse_connect_param.iter().flatten().count()),
            ("mysql_connect_param", self.mysql_connect_param.iter().flatten().count()),
            ("postgresql_connect_param", self.postgresql_connect_param.iter().flatten().count()),
            ("mariadb_connect_param", self.mariadb_connect_param.iter().flatten().count()),
            ("sqlserver_connect_param", self.sqlserver_connect_param.iter().flatten().count()),
            ("doris_connect_param", self.doris_connect_param.iter().flatten().count()),
            ("kafka_connect_param", self.kafka_connect_param.iter().flatten().count()),
        ];
        for (name, count) in counts {
            if count > 1 {
                diags.error(
                    "Too many blocks".to_owned(),
                    format!("at most one `{name}` block can be defined, got {count}"),
                    attr_path.clone().attribute(name),
                );
            }
        }
    }
}

impl<'a> WithSchema for ConnectResourceState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, Required};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Provides a resource to create a ckafka connect_resource"),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the connect resource."),
                    "resource_name" => attribute(
                        AttributeType::String,
                        Required,
                        "Connection source name.",
                    ),
                    "type" => attribute(
                        AttributeType::String,
                        Required,
                        "Resource type. Changing it recreates the connect resource.",
                    ),
                    "description" => attribute(
                        AttributeType::String,
                        Optional,
                        "Connection source description.",
                    ),
                },
                blocks: map! {
                    "dts_connect_param" => NestedBlock::List(DtsConnectParam::block(
                        "Dts configuration, required when Type is DTS.",
                    )),
                    "mongodb_connect_param" => NestedBlock::List(MongodbConnectParam::block(
                        "MongoDB configuration, required when Type is MONGODB.",
                    )),
                    "es_connect_param" => NestedBlock::List(EsConnectParam::block(
                        "Es configuration, required when Type is ES.",
                    )),
                    "clickhouse_connect_param" => NestedBlock::List(ClickhouseConnectParam::block(
                        "ClickHouse configuration, required when Type is CLICKHOUSE.",
                    )),
                    "mysql_connect_param" => NestedBlock::List(MysqlConnectParam::block(
                        "MySQL configuration, required when Type is MYSQL or TDSQL_C_MYSQL.",
                    )),
                    "postgresql_connect_param" => NestedBlock::List(PostgresqlConnectParam::block(
                        "PostgreSQL configuration, required when Type is POSTGRESQL or TDSQL_C_POSTGRESQL.",
                    )),
                    "mariadb_connect_param" => NestedBlock::List(MariadbConnectParam::block(
                        "MariaDB configuration, required when Type is MARIADB.",
                    )),
                    "sqlserver_connect_param" => NestedBlock::List(SqlserverConnectParam::block(
                        "SQLServer configuration, required when Type is SQLSERVER.",
                    )),
                    "doris_connect_param" => NestedBlock::List(DorisConnectParam::block(
                        "Doris configuration, required when Type is DORIS.",
                    )),
                    "kafka_connect_param" => NestedBlock::List(KafkaConnectParam::block(
                        "Kafka configuration, required when Type is KAFKA.",
                    )),
                },
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectResourceDataSourceState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    pub r#type: ValueString<'a>,
    pub search_word: ValueString<'a>,
    pub offset: ValueNumber,
    pub limit: ValueNumber,
    pub resource_region: ValueString<'a>,
    pub result_output_file: ValueString<'a>,
    pub result: Value<Vec<ConnectResourceResult>>,
}

impl<'a> ConnectResourceDataSourceState<'a> {
    pub fn filter(&self) -> ConnectResourceFilter {
        ConnectResourceFilter {
            r#type: non_empty(&self.r#type).map(str::to_owned),
            search_word: non_empty(&self.search_word).map(str::to_owned),
            offset: self.offset.as_ref_option().copied().unwrap_or_default(),
            limit: self.limit.as_ref_option().copied().unwrap_or(PAGE_LIMIT),
            resource_region: non_empty(&self.resource_region).map(str::to_owned),
        }
    }
}

impl<'a> WithSchema for ConnectResourceDataSourceState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional};

        Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Use this data source to query detailed information of ckafka connect_resource"),
                attributes: map! {
                    "id" => attribute(AttributeType::String, Computed, "ID of the query."),
                    "type" => attribute(
                        AttributeType::String,
                        Optional,
                        "Connection source type: DTS, MONGODB, ES, CLICKHOUSE, MYSQL, POSTGRESQL, MARIADB, SQLSERVER, CTSDB, DORIS, KAFKA.",
                    ),
                    "search_word" => attribute(AttributeType::String, Optional, "Fuzzy search by name of the connection source."),
                    "offset" => attribute(AttributeType::Number, Optional, "Page offset, default is 0."),
                    "limit" => attribute(AttributeType::Number, Optional, "Number of returned results, default 20, maximum 100."),
                    "resource_region" => attribute(AttributeType::String, Optional, "Keyword query of the connection source, query the connection in the connection management list in the local region according to the region."),
                    "result_output_file" => attribute(AttributeType::String, Optional, "Used to save results."),
                    "result" => attribute(
                        AttributeType::List(ConnectResourceResult::attribute_type().into()),
                        Computed,
                        "Connection source list.",
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

    fn mysql(password: &str) -> MysqlConnectParam {
        let mut param = MysqlConnectParam {
            port: Value::Value(3306),
            user_name: Value::Value("root".to_owned()),
            password: Value::Value(password.to_owned()),
            resource: Value::Value("cdb-1".to_owned()),
            ..Default::default()
        };
        param.apply_defaults();
        param
    }

    fn state() -> ConnectResourceState<'static> {
        ConnectResourceState {
            id: Value::Value("resource-1".into()),
            resource_name: Value::Value("mysql-source".into()),
            r#type: Value::Value("MYSQL".into()),
            mysql_connect_param: Value::Value(vec![mysql("secret")]),
            ..Default::default()
        }
    }

    #[test]
    fn create_request_uses_api_names() {
        let request = serde_json::to_value(state().create_request()).unwrap();
        assert_eq!(
            request,
            json!({
                "ResourceName": "mysql-source",
                "Type": "MYSQL",
                "MySQLConnectParam": {
                    "Port": 3306,
                    "UserName": "root",
                    "Password": "secret",
                    "Resource": "cdb-1",
                    "IsUpdate": false,
                    "SelfBuilt": false,
                },
            })
        );
    }

    #[test]
    fn modify_request_only_has_changes() {
        let prior = state();
        assert_eq!(prior.modify_request(&prior), None);

        let planned = ConnectResourceState {
            description: Value::Value("primary database".into()),
            ..state()
        };
        let request = planned.modify_request(&prior).unwrap();
        assert_eq!(request.resource_id.as_deref(), Some("resource-1"));
        assert_eq!(request.description.as_deref(), Some("primary database"));
        assert!(request.mysql_connect_param.is_none());
        assert!(request.r#type.is_none());
    }

    #[test]
    fn refresh_keeps_configured_password() {
        let mut state = state();
        let detail: ConnectResourceInfoModel = serde_json::from_value(json!({
            "ResourceId": "resource-1",
            "ResourceName": "mysql-source",
            "Type": "MYSQL",
            "Description": "",
            "MySQLConnectParam": {"Port": 3307, "UserName": "root", "Password": "", "Resource": "cdb-1"},
        }))
        .unwrap();
        state.set_resource(&detail);

        let Value::Value(params) = &state.mysql_connect_param else {
            panic!("mysql parameters should be kept");
        };
        assert_eq!(params[0].port, Value::Value(3307));
        assert_eq!(params[0].password, Value::Value("secret".to_owned()));
        assert_eq!(params[0].self_built, Value::Value(false));
        assert!(state.description.is_null());
        assert!(state.dts_connect_param.is_null());
    }

    #[tokio::test]
    async fn at_most_one_block() {
        let state = ConnectResourceState {
            mysql_connect_param: Value::Value(vec![mysql("a"), mysql("b")]),
            ..state()
        };
        let mut diags = Diagnostics::default();
        state.validate(&mut diags, AttributePath::default()).await;
        assert_eq!(diags.errors.len(), 1);
    }
}
