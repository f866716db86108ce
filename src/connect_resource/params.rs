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

//! Connection parameters of every connect resource type

use crate::flatten::{config_block, flattened};
use tf_provider::map;

config_block! {
    pub struct DtsConnectParam for DtsConnectParamModel {
        port: number = "Port", required, "Dts port.";
        group_id: string = "GroupId", required, "Id of dts consumer group.";
        user_name: string = "UserName", required, "User name of dts consumer group.";
        password: string = "Password", secret, "Password of dts consumer group.";
        resource: string = "Resource", required, "Dts instance Id.";
        topic: string = "Topic", required, "Topic subscribed by dts.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
    }

    pub struct MongodbConnectParam for MongodbConnectParamModel {
        port: number = "Port", required, "MongoDB port.";
        user_name: string = "UserName", required, "User name of the MongoDB connection source.";
        password: string = "Password", secret, "Password of the MongoDB connection source.";
        resource: string = "Resource", required, "Instance ID of MongoDB connection source.";
        self_built: bool = "SelfBuilt", required, "Whether the MongoDB connection source is a self-built cluster.";
        service_vip: string = "ServiceVip", optional, "Instance VIP of the MongoDB connection source, when it is a Tencent Cloud instance, it is required.";
        uniq_vpc_id: string = "UniqVpcId", optional, "VPC of the MongoDB connection source, when it is a Tencent Cloud instance, it is required.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
    }

    pub struct EsConnectParam for EsConnectParamModel {
        port: number = "Port", required, "ES port.";
        user_name: string = "UserName", required, "User name of the ES connection source.";
        password: string = "Password", secret, "Password of the ES connection source.";
        resource: string = "Resource", required, "Instance ID of the ES connection source.";
        self_built: bool = "SelfBuilt", required, "Whether the ES connection source is a self-built cluster.";
        service_vip: string = "ServiceVip", optional, "Instance VIP of the ES connection source, when it is a Tencent Cloud instance, it is required.";
        uniq_vpc_id: string = "UniqVpcId", optional, "VPC of the ES connection source, when it is a Tencent Cloud instance, it is required.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
    }

    pub struct ClickhouseConnectParam for ClickhouseConnectParamModel {
        port: number = "Port", required, "ClickHouse port.";
        user_name: string = "UserName", required, "User name of the ClickHouse connection source.";
        password: string = "Password", secret, "Password of the ClickHouse connection source.";
        resource: string = "Resource", required, "Instance ID of the ClickHouse connection source.";
        self_built: bool = "SelfBuilt", required, "Whether the ClickHouse connection source is a self-built cluster.";
        service_vip: string = "ServiceVip", optional, "Instance VIP of the ClickHouse connection source, when it is a Tencent Cloud instance, it is required.";
        uniq_vpc_id: string = "UniqVpcId", optional, "VPC of the ClickHouse connection source, when it is a Tencent Cloud instance, it is required.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
    }

    pub struct MysqlConnectParam for MysqlConnectParamModel {
        port: number = "Port", required, "MySQL port.";
        user_name: string = "UserName", required, "MySQL username.";
        password: string = "Password", secret, "MySQL password.";
        resource: string = "Resource", required, "Instance ID of the MySQL connection source.";
        service_vip: string = "ServiceVip", optional, "Instance VIP of the MySQL connection source, when it is a Tencent Cloud instance, it is required.";
        uniq_vpc_id: string = "UniqVpcId", optional, "VPC of the MySQL connection source, when it is a Tencent Cloud instance, it is required.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
        cluster_id: string = "ClusterId", optional, "Required when type is TDSQL C_MYSQL.";
        self_built: bool = "SelfBuilt", optional_computed = false, "Whether it is a self-built cluster, default to false.";
    }

    pub struct PostgresqlConnectParam for PostgresqlConnectParamModel {
        port: number = "Port", required, "PostgreSQL port.";
        user_name: string = "UserName", required, "PostgreSQL username.";
        password: string = "Password", secret, "PostgreSQL password.";
        resource: string = "Resource", required, "Instance ID of the PostgreSQL connection source.";
        service_vip: string = "ServiceVip", optional, "Instance VIP of the PostgreSQL connection source, when it is a Tencent Cloud instance, it is required.";
        uniq_vpc_id: string = "UniqVpcId", optional, "VPC of the PostgreSQL connection source, when it is a Tencent Cloud instance, it is required.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
        cluster_id: string = "ClusterId", optional, "Required when type is TDSQL C_POSTGRESQL.";
        self_built: bool = "SelfBuilt", optional_computed = false, "Whether it is a self-built cluster, default to false.";
    }

    pub struct MariadbConnectParam for MariadbConnectParamModel {
        port: number = "Port", required, "MariaDB port.";
        user_name: string = "UserName", required, "MariaDB username.";
        password: string = "Password", secret, "MariaDB password.";
        resource: string = "Resource", required, "Instance ID of the MariaDB connection source.";
        service_vip: string = "ServiceVip", optional, "Instance VIP of the MariaDB connection source, when it is a Tencent Cloud instance, it is required.";
        uniq_vpc_id: string = "UniqVpcId", optional, "VPC of the MariaDB connection source, when it is a Tencent Cloud instance, it is required.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
    }

    pub struct SqlserverConnectParam for SqlserverConnectParamModel {
        port: number = "Port", required, "SQLServer port.";
        user_name: string = "UserName", required, "SQLServer username.";
        password: string = "Password", secret, "SQLServer password.";
        resource: string = "Resource", required, "Instance ID of the SQLServer connection source.";
        service_vip: string = "ServiceVip", optional, "Instance VIP of the SQLServer connection source, when it is a Tencent Cloud instance, it is required.";
        uniq_vpc_id: string = "UniqVpcId", optional, "VPC of the SQLServer connection source, when it is a Tencent Cloud instance, it is required.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
    }

    pub struct DorisConnectParam for DorisConnectParamModel {
        port: number = "Port", required, "Doris jdbc CLB port, usually mapped to port 9030 of fe.";
        user_name: string = "UserName", required, "Doris username.";
        password: string = "Password", secret, "Doris password.";
        resource: string = "Resource", required, "Doris instanceId.";
        service_vip: string = "ServiceVip", optional, "Doris vip, when it is a Tencent Cloud instance, it is required.";
        uniq_vpc_id: string = "UniqVpcId", optional, "VPC of the Doris connection source, when it is a Tencent Cloud instance, it is required.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
        self_built: bool = "SelfBuilt", optional_computed = false, "Whether it is a self-built cluster, default to false.";
        be_port: number = "BePort", optional, "Doris http CLB port, usually mapped to port 8040 of be.";
    }

    pub struct KafkaConnectParam for KafkaConnectParamModel {
        resource: string = "Resource", optional, "Kafka instanceId, when it is a Tencent Cloud instance, it is required.";
        self_built: bool = "SelfBuilt", optional_computed = false, "Whether it is a self-built cluster, default to false.";
        is_update: bool = "IsUpdate", optional_computed = false, "Whether to update the associated Datahub task, default to false.";
        broker_address: string = "BrokerAddress", optional, "Kafka connection broker address, required when self-built.";
        region: string = "Region", optional, "Instance resource region, required when the instance is in another region.";
    }
}

flattened! {
    /// Only reported by the listing, it cannot be configured
    pub struct CtsdbConnectParam from CtsdbConnectParamModel {
        port: number = "Port",
        service_vip: string = "ServiceVip",
        uniq_vpc_id: string = "UniqVpcId",
        user_name: string = "UserName",
        password: string = "Password",
        resource: string = "Resource",
    }

    pub struct ConnectResourceInfo from ConnectResourceInfoModel {
        resource_id: string = "ResourceId",
        resource_name: string = "ResourceName",
        description: string = "Description",
        r#type: string = "Type",
        status: number = "Status",
        create_time: string = "CreateTime",
        error_message: string = "ErrorMessage",
        datahub_task_count: number = "DatahubTaskCount",
        current_step: string = "CurrentStep",
        task_progress: float = "TaskProgress",
        step_list: strings = "StepList",
        dts_connect_param: {DtsConnectParam} = "DtsConnectParam",
        mongodb_connect_param: {MongodbConnectParam} = "MongoDBConnectParam",
        es_connect_param: {EsConnectParam} = "EsConnectParam",
        clickhouse_connect_param: {ClickhouseConnectParam} = "ClickHouseConnectParam",
        mysql_connect_param: {MysqlConnectParam} = "MySQLConnectParam",
        postgresql_connect_param: {PostgresqlConnectParam} = "PostgreSQLConnectParam",
        mariadb_connect_param: {MariadbConnectParam} = "MariaDBConnectParam",
        sqlserver_connect_param: {SqlserverConnectParam} = "SQLServerConnectParam",
        ctsdb_connect_param: {CtsdbConnectParam} = "CtsdbConnectParam",
        doris_connect_param: {DorisConnectParam} = "DorisConnectParam",
        kafka_connect_param: {KafkaConnectParam} = "KafkaConnectParam",
    }

    pub struct ConnectResourceResult from ConnectResourceResultModel {
        total_count: number = "TotalCount",
        connect_resource_list: [ConnectResourceInfo] = "ConnectResourceList",
    }
}
