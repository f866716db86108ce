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

use crate::flatten::flattened;
use tf_provider::map;

flattened! {
    pub struct TableMapping from TableMappingModel {
        database: string = "Database",
        table: string = "Table",
        topic: string = "Topic",
        topic_id: string = "TopicId",
    }

    pub struct KafkaParam from KafkaParamModel {
        self_built: bool = "SelfBuilt",
        resource: string = "Resource",
        topic: string = "Topic",
        offset_type: string = "OffsetType",
        start_time: number = "StartTime",
        resource_name: string = "ResourceName",
        zone_id: number = "ZoneId",
        topic_id: string = "TopicId",
        partition_num: number = "PartitionNum",
        enable_toleration: bool = "EnableToleration",
        qps_limit: number = "QpsLimit",
        table_mappings: [TableMapping] = "TableMappings",
        use_table_mapping: bool = "UseTableMapping",
        use_auto_create_topic: bool = "UseAutoCreateTopic",
        compression_type: string = "CompressionType",
        msg_multiple: number = "MsgMultiple",
        connector_sync_type: string = "ConnectorSyncType",
        keep_partition: bool = "KeepPartition",
    }

    pub struct EventBusParam from EventBusParamModel {
        r#type: string = "Type",
        self_built: bool = "SelfBuilt",
        resource: string = "Resource",
        namespace: string = "Namespace",
        function_name: string = "FunctionName",
        qualifier: string = "Qualifier",
    }

    pub struct MongoDbParam from MongoDbParamModel {
        database: string = "Database",
        collection: string = "Collection",
        copy_existing: bool = "CopyExisting",
        resource: string = "Resource",
        ip: string = "Ip",
        port: number = "Port",
        user_name: string = "UserName",
        password: string = "Password",
        listening_event: string = "ListeningEvent",
        read_preference: string = "ReadPreference",
        pipeline: string = "Pipeline",
        self_built: bool = "SelfBuilt",
    }

    /// Where the messages failing to be parsed are sent to CLS
    pub struct DropCls from DropClsModel {
        drop_invalid_message_to_cls: bool = "DropInvalidMessageToCls",
        drop_cls_region: string = "DropClsRegion",
        drop_cls_owneruin: string = "DropClsOwneruin",
        drop_cls_topic_id: string = "DropClsTopicId",
        drop_cls_log_set: string = "DropClsLogSet",
    }

    pub struct TopicParam from TopicParamModel {
        resource: string = "Resource",
        offset_type: string = "OffsetType",
        start_time: number = "StartTime",
        topic_id: string = "TopicId",
        compression_type: string = "CompressionType",
        use_auto_create_topic: bool = "UseAutoCreateTopic",
        msg_multiple: number = "MsgMultiple",
    }

    /// Dead letter queue of a sink
    pub struct FailureParam from FailureParamModel {
        r#type: string = "Type",
        kafka_param: {KafkaParam} = "KafkaParam",
        retry_interval: number = "RetryInterval",
        max_retry_attempts: number = "MaxRetryAttempts",
        topic_param: {TopicParam} = "TopicParam",
        dlq_type: string = "DlqType",
    }

    pub struct EsParam from EsParamModel {
        resource: string = "Resource",
        port: number = "Port",
        user_name: string = "UserName",
        password: string = "Password",
        self_built: bool = "SelfBuilt",
        service_vip: string = "ServiceVip",
        uniq_vpc_id: string = "UniqVpcId",
        drop_invalid_message: bool = "DropInvalidMessage",
        index: string = "Index",
        date_format: string = "DateFormat",
        content_key: string = "ContentKey",
        drop_invalid_json_message: bool = "DropInvalidJsonMessage",
        document_id_field: string = "DocumentIdField",
        index_type: string = "IndexType",
        drop_cls: {DropCls} = "DropCls",
        database_primary_key: string = "DatabasePrimaryKey",
        drop_dlq: {FailureParam} = "DropDlq",
    }

    pub struct TdwParam from TdwParamModel {
        bid: string = "Bid",
        tid: string = "Tid",
        is_domestic: bool = "IsDomestic",
        tdw_host: string = "TdwHost",
        tdw_port: number = "TdwPort",
    }

    pub struct DtsParam from DtsParamModel {
        resource: string = "Resource",
        ip: string = "Ip",
        port: number = "Port",
        topic: string = "Topic",
        group_id: string = "GroupId",
        group_user: string = "GroupUser",
        group_password: string = "GroupPassword",
        tran_sql: bool = "TranSql",
    }

    pub struct ClickHouseSchema from ClickHouseSchemaModel {
        column_name: string = "ColumnName",
        json_key: string = "JsonKey",
        r#type: string = "Type",
        allow_null: bool = "AllowNull",
    }

    pub struct ClickHouseParam from ClickHouseParamModel {
        cluster: string = "Cluster",
        database: string = "Database",
        table: string = "Table",
        schema: [ClickHouseSchema] = "Schema",
        resource: string = "Resource",
        ip: string = "Ip",
        port: number = "Port",
        user_name: string = "UserName",
        password: string = "Password",
        service_vip: string = "ServiceVip",
        uniq_vpc_id: string = "UniqVpcId",
        self_built: bool = "SelfBuilt",
        drop_invalid_message: bool = "DropInvalidMessage",
        r#type: string = "Type",
        drop_cls: {DropCls} = "DropCls",
    }

    pub struct ClsParam from ClsParamModel {
        decode_json: bool = "DecodeJson",
        resource: string = "Resource",
        log_set: string = "LogSet",
        content_key: string = "ContentKey",
        time_field: string = "TimeField",
    }

    pub struct CosParam from CosParamModel {
        bucket_name: string = "BucketName",
        region: string = "Region",
        object_key: string = "ObjectKey",
        aggregate_batch_size: number = "AggregateBatchSize",
        aggregate_interval: number = "AggregateInterval",
        format_output_type: string = "FormatOutputType",
        object_key_prefix: string = "ObjectKeyPrefix",
        directory_time_format: string = "DirectoryTimeFormat",
    }

    /// Mapping of a message field to a table column
    pub struct RecordMapping from RecordMappingModel {
        json_key: string = "JsonKey",
        r#type: string = "Type",
        allow_null: bool = "AllowNull",
        column_name: string = "ColumnName",
        extra_info: string = "ExtraInfo",
        column_size: string = "ColumnSize",
        decimal_digits: string = "DecimalDigits",
        auto_increment: bool = "AutoIncrement",
        default_value: string = "DefaultValue",
    }

    pub struct MySqlParam from MySqlParamModel {
        database: string = "Database",
        table: string = "Table",
        resource: string = "Resource",
        snapshot_mode: string = "SnapshotMode",
        ddl_topic: string = "DdlTopic",
        data_source_monitor_mode: string = "DataSourceMonitorMode",
        data_source_monitor_resource: string = "DataSourceMonitorResource",
        data_source_increment_mode: string = "DataSourceIncrementMode",
        data_source_increment_column: string = "DataSourceIncrementColumn",
        data_source_start_from: string = "DataSourceStartFrom",
        data_target_insert_mode: string = "DataTargetInsertMode",
        data_target_primary_key_field: string = "DataTargetPrimaryKeyField",
        data_target_record_mapping: [RecordMapping] = "DataTargetRecordMapping",
        topic_regex: string = "TopicRegex",
        topic_replacement: string = "TopicReplacement",
        key_columns: string = "KeyColumns",
        drop_invalid_message: bool = "DropInvalidMessage",
        drop_cls: {DropCls} = "DropCls",
        output_format: string = "OutputFormat",
        is_table_prefix: bool = "IsTablePrefix",
        include_content_changes: string = "IncludeContentChanges",
        include_query: bool = "IncludeQuery",
        record_with_schema: bool = "RecordWithSchema",
        signal_database: string = "SignalDatabase",
        is_table_regular: bool = "IsTableRegular",
    }

    pub struct PostgreSqlParam from PostgreSqlParamModel {
        database: string = "Database",
        table: string = "Table",
        resource: string = "Resource",
        plugin_name: string = "PluginName",
        snapshot_mode: string = "SnapshotMode",
        data_format: string = "DataFormat",
        data_target_insert_mode: string = "DataTargetInsertMode",
        data_target_primary_key_field: string = "DataTargetPrimaryKeyField",
        data_target_record_mapping: [RecordMapping] = "DataTargetRecordMapping",
        drop_invalid_message: bool = "DropInvalidMessage",
        is_table_regular: bool = "IsTableRegular",
        key_columns: string = "KeyColumns",
        record_with_schema: bool = "RecordWithSchema",
    }

    pub struct MariaDbParam from MariaDbParamModel {
        database: string = "Database",
        table: string = "Table",
        resource: string = "Resource",
        snapshot_mode: string = "SnapshotMode",
        key_columns: string = "KeyColumns",
        is_table_prefix: bool = "IsTablePrefix",
        output_format: string = "OutputFormat",
        include_content_changes: string = "IncludeContentChanges",
        include_query: bool = "IncludeQuery",
        record_with_schema: bool = "RecordWithSchema",
    }

    pub struct SqlServerParam from SqlServerParamModel {
        database: string = "Database",
        table: string = "Table",
        resource: string = "Resource",
        snapshot_mode: string = "SnapshotMode",
    }

    pub struct CtsdbParam from CtsdbParamModel {
        resource: string = "Resource",
        ctsdb_metric: string = "CtsdbMetric",
    }

    pub struct ScfParam from ScfParamModel {
        function_name: string = "FunctionName",
        namespace: string = "Namespace",
        qualifier: string = "Qualifier",
        batch_size: number = "BatchSize",
        max_retries: number = "MaxRetries",
    }

    /// Source or target of a datahub task, only the parameters of its `type` are set
    pub struct DatahubResource from DatahubResourceModel {
        r#type: string = "Type",
        kafka_param: {KafkaParam} = "KafkaParam",
        event_bus_param: {EventBusParam} = "EventBusParam",
        mongo_db_param: {MongoDbParam} = "MongoDBParam",
        es_param: {EsParam} = "EsParam",
        tdw_param: {TdwParam} = "TdwParam",
        dts_param: {DtsParam} = "DtsParam",
        click_house_param: {ClickHouseParam} = "ClickHouseParam",
        cls_param: {ClsParam} = "ClsParam",
        cos_param: {CosParam} = "CosParam",
        my_sql_param: {MySqlParam} = "MySQLParam",
        postgre_sql_param: {PostgreSqlParam} = "PostgreSQLParam",
        topic_param: {TopicParam} = "TopicParam",
        maria_db_param: {MariaDbParam} = "MariaDBParam",
        sql_server_param: {SqlServerParam} = "SQLServerParam",
        ctsdb_param: {CtsdbParam} = "CtsdbParam",
        scf_param: {ScfParam} = "ScfParam",
    }

    pub struct DatahubTaskInfo from DatahubTaskInfoModel {
        task_id: string = "TaskId",
        task_name: string = "TaskName",
        task_type: string = "TaskType",
        status: number = "Status",
        source_resource: {DatahubResource} = "SourceResource",
        target_resource: {DatahubResource} = "TargetResource",
        create_time: string = "CreateTime",
        error_message: string = "ErrorMessage",
        task_progress: float = "TaskProgress",
        task_current_step: string = "TaskCurrentStep",
        datahub_id: string = "DatahubId",
        step_list: string_set = "StepList",
    }
}
