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
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::api::ckafka::{
    ChargeType, CkafkaService, DynamicRetentionConfig, ModifyInstanceAttributesRequest,
    ScaleInstanceRequest,
};
use crate::api::retry::READ_RETRY_TIMEOUT;
use crate::api::tag::{build_resource_name, diff_tags};
use crate::ckafka_provider::ProviderHandle;
use crate::utils::{
    api_error, changed, known_state, root_error, WithNormalize, WithSchema, WithValidate,
};

use super::{number, string, InstanceState, IMMUTABLE_ATTRIBUTES};

const SERVICE_TYPE: &str = "ckafka";
const RESOURCE_PREFIX: &str = "ckafkaId";

#[derive(Debug, Default, Clone)]
pub struct CkafkaInstanceResource {
    handle: ProviderHandle,
}

impl CkafkaInstanceResource {
    pub fn new(handle: ProviderHandle) -> Self {
        Self { handle }
    }

    /// Refresh `state` from the cloud, `Value::Null` when the instance is gone
    async fn read_instance<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        mut state: InstanceState<'a>,
    ) -> Option<Value<InstanceState<'a>>> {
        let id = state.id.as_str().to_owned();
        let tags = service.tags();
        let region = service.region().to_owned();

        let result = futures::try_join!(
            service.describe_instance_detail(&id),
            service.describe_instance_attributes(&id),
            tags.describe_resource_tags(SERVICE_TYPE, RESOURCE_PREFIX, &region, &id),
        );
        match result {
            Err(err) => {
                api_error(diags, "Failed to read ckafka instance", &err);
                None
            }
            Ok((None, _, _)) => {
                warn!("ckafka instance {id} not found, removing it from state");
                Some(Value::Null)
            }
            Ok((Some(detail), attributes, tag_set)) => {
                state.set_detail(&detail);
                if let Some(attributes) = attributes {
                    state.set_attributes(&attributes);
                }
                state.set_tag_set(tag_set);
                state.resolve_unknowns();
                Some(Value::Value(state))
            }
        }
    }

    /// Read after a create or an update, where the instance must exist
    async fn read_back<'a>(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        state: InstanceState<'a>,
    ) -> Option<Value<InstanceState<'a>>> {
        let id = state.id.as_str().to_owned();
        match self.read_instance(diags, service, state).await? {
            Value::Null => {
                root_error(
                    diags,
                    "Failed to read ckafka instance",
                    format!("ckafka instance {id} not found after apply"),
                );
                None
            }
            state => Some(state),
        }
    }

    async fn apply_tags(
        &self,
        diags: &mut Diagnostics,
        service: &CkafkaService,
        prior: Option<&InstanceState<'_>>,
        state: &InstanceState<'_>,
    ) -> Option<()> {
        let old = prior.map(InstanceState::desired_tags).unwrap_or_default();
        let (replace, delete) = diff_tags(&old, &state.desired_tags());
        let resource_name = build_resource_name(
            SERVICE_TYPE,
            RESOURCE_PREFIX,
            service.region(),
            state.id.as_str(),
        );
        match service
            .tags()
            .modify_tags(&resource_name, &replace, &delete)
            .await
        {
            Ok(()) => Some(()),
            Err(err) => {
                api_error(diags, "Failed to modify ckafka instance tags", &err);
                None
            }
        }
    }
}

#[async_trait]
impl Resource for CkafkaInstanceResource {
    type State<'a> = Value<InstanceState<'a>>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(InstanceState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Value::Value(config) = &config {
            config.validate(diags, Default::default()).await;
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Value::Value(state) = state else {
            return Some((state, private_state));
        };
        let service = self.handle.service(diags)?;
        let state = self.read_instance(diags, &service, state).await?;
        Some((state, private_state))
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = known_state(diags, proposed_state)?;
        state.normalize(diags);
        state.mark_computed_unknown();
        Some((Value::Value(state), Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<AttributePath>,
    )> {
        let prior = known_state(diags, prior_state)?;
        let mut state = known_state(diags, proposed_state)?;
        let config = config_state.as_ref_option();
        state.normalize(diags);

        if changed(&prior.charge_type, &state.charge_type) {
            state.mark_computed_unknown();
            return Some((
                Value::Value(state),
                prior_private_state,
                vec![AttributePath::new("charge_type")],
            ));
        }

        for name in IMMUTABLE_ATTRIBUTES {
            if state.is_known(name) && prior.immutable_value(name) != state.immutable_value(name) {
                diags.error(
                    format!("argument `{name}` cannot be changed"),
                    format!(
                        "`{name}` cannot be modified once the instance is created, it was {} and is now {}",
                        prior.immutable_value(name),
                        state.immutable_value(name)
                    ),
                    AttributePath::new(name),
                );
            }
        }

        // Both tag attributes describe the same tags, one follows the other
        let tag_set_configured = config.is_some_and(|config| !config.tag_set.is_null());
        let tags_configured = config.is_some_and(|config| !config.tags.is_null());
        if changed(&prior.tags, &state.tags) && !tag_set_configured {
            state.tag_set = Value::Unknown;
        }
        if changed(&prior.tag_set, &state.tag_set) && !tags_configured {
            state.tags = Value::Unknown;
        }

        if let Value::Value(blocks) = &mut state.dynamic_retention_config {
            for block in blocks.iter_mut().flatten() {
                block.mark_unknown();
            }
        }

        if !diags.errors.is_empty() {
            return None;
        }
        Some((Value::Value(state), prior_private_state, Vec::new()))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = known_state(diags, planned_state)?;
        let service = self.handle.service(diags)?;
        let charge_type = state.charge_type();

        let instance_id = match service
            .create_instance(charge_type, &state.create_request())
            .await
        {
            Ok(id) => id,
            Err(err) => {
                api_error(diags, "Failed to create ckafka instance", &err);
                return None;
            }
        };
        info!("ckafka instance {instance_id} created, waiting for it to be running");
        state.id = Value::Value(Cow::Owned(instance_id.clone()));

        if let Err(err) = service
            .wait_instance_ready(&instance_id, 5 * READ_RETRY_TIMEOUT)
            .await
        {
            api_error(diags, "create ckafka instance task is processing", &err);
            return None;
        }

        let request = ModifyInstanceAttributesRequest {
            instance_id: instance_id.clone(),
            msg_retention_time: number(&state.msg_retention_time),
            config: state.modify_config(),
            dynamic_retention_config: state.dynamic_retention(),
            rebalance_time: number(&state.rebalance_time),
            public_network: number(&state.public_network),
            max_message_byte: number(&state.max_message_byte),
            ..Default::default()
        };
        if request.has_changes() {
            if let Err(err) = service.modify_instance_attributes(&request).await {
                root_error(
                    diags,
                    "Failed to set ckafka instance attributes",
                    format!("[API]Set kafka instance attributes fail, reason:{err:#}"),
                );
                return None;
            }
        }

        if !state.desired_tags().is_empty() {
            self.apply_tags(diags, &service, None, &state).await?;
        }

        let state = self.read_back(diags, &service, state).await?;
        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let prior = known_state(diags, prior_state)?;
        let mut state = known_state(diags, planned_state)?;
        let service = self.handle.service(diags)?;
        state.id = prior.id.clone();
        let instance_id = state.id.as_str().to_owned();

        let mut request = ModifyInstanceAttributesRequest {
            instance_id: instance_id.clone(),
            ..Default::default()
        };
        if changed(&prior.instance_name, &state.instance_name) {
            request.instance_name = string(&state.instance_name);
        }
        if changed(&prior.msg_retention_time, &state.msg_retention_time) {
            request.msg_retention_time = number(&state.msg_retention_time);
        }
        if changed(&prior.config, &state.config) {
            request.config = state.modify_config();
        }
        if prior.dynamic_retention() != state.dynamic_retention() {
            // Dropping the block turns the policy off
            let disabled = DynamicRetentionConfig {
                enable: Some(0),
                ..Default::default()
            };
            request.dynamic_retention_config = state.dynamic_retention().or(Some(disabled));
        }
        if changed(&prior.rebalance_time, &state.rebalance_time) {
            request.rebalance_time = number(&state.rebalance_time);
        }
        if changed(&prior.public_network, &state.public_network) {
            request.public_network = number(&state.public_network);
        }
        if changed(&prior.max_message_byte, &state.max_message_byte) {
            request.max_message_byte = number(&state.max_message_byte);
        }
        if request.has_changes() {
            if let Err(err) = service.modify_instance_attributes(&request).await {
                api_error(diags, "Failed to modify ckafka instance attributes", &err);
                return None;
            }
        }

        let disk_size_changed = changed(&prior.disk_size, &state.disk_size);
        let band_width_changed = changed(&prior.band_width, &state.band_width);
        let partition_changed = changed(&prior.partition, &state.partition);
        if disk_size_changed || band_width_changed || partition_changed {
            let charge_type = state.charge_type();
            let request = match charge_type {
                ChargeType::Postpaid => ScaleInstanceRequest {
                    instance_id: instance_id.clone(),
                    upgrade_strategy: number(&state.upgrade_strategy),
                    disk_size: number(&state.disk_size).filter(|_| disk_size_changed),
                    band_width: number(&state.band_width).filter(|_| band_width_changed),
                    partition: number(&state.partition).filter(|_| partition_changed),
                },
                ChargeType::Prepaid => ScaleInstanceRequest {
                    instance_id: instance_id.clone(),
                    upgrade_strategy: None,
                    disk_size: number(&state.disk_size),
                    band_width: number(&state.band_width),
                    partition: number(&state.partition),
                },
            };
            if let Err(err) = service.scale_instance(charge_type, &request).await {
                api_error(diags, "Failed to scale ckafka instance", &err);
                return None;
            }

            tokio::time::sleep(Duration::from_secs(5)).await;
            if let Err(err) = service
                .wait_instance_ready(&instance_id, 10 * READ_RETRY_TIMEOUT)
                .await
            {
                api_error(diags, "upgrade ckafka instance task is processing", &err);
                return None;
            }
        }

        self.apply_tags(diags, &service, Some(&prior), &state).await?;

        let state = self.read_back(diags, &service, state).await?;
        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let state = known_state(diags, state)?;
        let service = self.handle.service(diags)?;
        let instance_id = state.id.as_str();

        if let Err(err) = service
            .delete_instance(state.charge_type(), instance_id)
            .await
        {
            api_error(diags, "Failed to delete ckafka instance", &err);
            return None;
        }
        if let Err(err) = service
            .wait_instance_deleted(instance_id, 5 * READ_RETRY_TIMEOUT)
            .await
        {
            api_error(diags, "Failed to delete ckafka instance", &err);
            return None;
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = InstanceState {
            id: Value::Value(Cow::Owned(id)),
            ..Default::default()
        };
        state.normalize(diags);
        Some((Value::Value(state), Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::mock::MockTransport;

    fn resource(transport: &Arc<MockTransport>) -> CkafkaInstanceResource {
        CkafkaInstanceResource::new(ProviderHandle::with_client(transport.client()))
    }

    fn running_instance(transport: &MockTransport) {
        transport.reply(
            "DescribeInstancesDetail",
            json!({"Result": {"TotalCount": 1, "InstanceList": [{
                "InstanceId": "ckafka-1",
                "InstanceName": "kafka",
                "Status": 1,
                "Vip": "10.0.0.1",
                "Vport": "9092",
                "ZoneId": 100003,
                "Bandwidth": 320,
                "DiskSize": 500,
                "DiskType": "CLOUD_BASIC",
                "MaxPartitionNumber": 800,
                "Version": "2.4.1",
                "RenewFlag": 0,
                "InstanceType": "profession",
                "Tags": [],
            }]}}),
        );
        transport.reply(
            "DescribeInstanceAttributes",
            json!({"Result": {"InstanceId": "ckafka-1", "MsgRetentionTime": 1440, "PublicNetwork": 3}}),
        );
        transport.reply(
            "DescribeResourceTagsByResourceIds",
            json!({"TotalCount": 1, "Tags": [{"TagKey": "env", "TagValue": "dev"}]}),
        );
    }

    fn planned(charge_type: &str) -> InstanceState<'static> {
        let mut state = InstanceState {
            instance_name: Value::Value("kafka".into()),
            zone_id: Value::Value(100003),
            charge_type: Value::Value(Cow::Owned(charge_type.to_owned())),
            msg_retention_time: Value::Value(1440),
            band_width: Value::Value(40),
            disk_size: Value::Value(500),
            partition: Value::Value(800),
            tag_set: Value::Value(
                [(Cow::Borrowed("env"), Value::Value(Cow::Borrowed("dev")))]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        };
        state.normalize(&mut Diagnostics::default());
        state.mark_computed_unknown();
        state
    }

    #[tokio::test(start_paused = true)]
    async fn create_postpaid_instance() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "CreatePostPaidInstance",
            json!({"Result": {"ReturnCode": "0", "Data": {"InstanceId": "ckafka-1"}}}),
        );
        transport.reply("ModifyInstanceAttributes", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply("ModifyResourceTags", json!({"RequestId": "1"}));
        running_instance(&transport);

        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .create(
                &mut diags,
                Value::Value(planned("POSTPAID_BY_HOUR")),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());

        let Value::Value(state) = state else {
            panic!("instance should exist");
        };
        assert_eq!(state.id.as_str(), "ckafka-1");
        assert_eq!(state.band_width, Value::Value(40));
        assert_eq!(state.instance_type, Value::Value(1));
        assert_eq!(state.vip.as_str(), "10.0.0.1");
        assert_eq!(state.public_network, Value::Value(3));
        assert!(state.max_message_byte.is_null());

        let sent = &transport.requests("CreatePostPaidInstance")[0];
        assert_eq!(sent["InstanceType"], 1);
        assert!(sent.get("Period").is_none());
        assert_eq!(
            transport.requests("ModifyInstanceAttributes")[0],
            json!({"InstanceId": "ckafka-1", "MsgRetentionTime": 1440})
        );
        assert_eq!(transport.requests("ModifyResourceTags").len(), 1);
    }

    #[tokio::test]
    async fn read_missing_instance() {
        let transport = Arc::new(MockTransport::default());
        transport.reply(
            "DescribeInstancesDetail",
            json!({"Result": {"TotalCount": 0, "InstanceList": []}}),
        );
        transport.fail("DescribeInstanceAttributes", "ResourceNotFound.InstanceNotExist");
        transport.reply("DescribeResourceTagsByResourceIds", json!({"Tags": []}));

        let mut diags = Diagnostics::default();
        let state = InstanceState {
            id: Value::Value("ckafka-1".into()),
            ..Default::default()
        };
        let (state, _) = resource(&transport)
            .read(&mut diags, Value::Value(state), Default::default(), Default::default())
            .await
            .unwrap();
        assert!(state.is_null());
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn plan_update_rejects_immutable_changes() {
        let transport = Arc::new(MockTransport::default());
        let resource = resource(&transport);
        let mut prior = planned("PREPAID");
        prior.id = Value::Value("ckafka-1".into());
        prior.resolve_unknowns();

        let proposed = InstanceState {
            zone_id: Value::Value(100004),
            ..prior.clone()
        };
        let mut diags = Diagnostics::default();
        let plan = resource
            .plan_update(
                &mut diags,
                Value::Value(prior.clone()),
                Value::Value(proposed),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await;
        assert!(plan.is_none());
        assert_eq!(diags.errors.len(), 1);

        let proposed = InstanceState {
            charge_type: Value::Value("POSTPAID_BY_HOUR".into()),
            ..prior.clone()
        };
        let mut diags = Diagnostics::default();
        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                Value::Value(prior),
                Value::Value(proposed),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert_eq!(replace.len(), 1);
        assert!(diags.errors.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn update_scales_postpaid_instance() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("InstanceScalingDown", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply("ModifyInstanceAttributes", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply("ModifyResourceTags", json!({"RequestId": "1"}));
        running_instance(&transport);

        let mut prior = planned("POSTPAID_BY_HOUR");
        prior.id = Value::Value("ckafka-1".into());
        prior.resolve_unknowns();
        let planned = InstanceState {
            instance_name: Value::Value("kafka-renamed".into()),
            disk_size: Value::Value(1000),
            ..prior.clone()
        };

        let mut diags = Diagnostics::default();
        resource(&transport)
            .update(
                &mut diags,
                Value::Value(prior),
                Value::Value(planned),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());

        assert_eq!(
            transport.requests("ModifyInstanceAttributes")[0],
            json!({"InstanceId": "ckafka-1", "InstanceName": "kafka-renamed"})
        );
        assert_eq!(
            transport.requests("InstanceScalingDown")[0],
            json!({"InstanceId": "ckafka-1", "UpgradeStrategy": 1, "DiskSize": 1000})
        );
        // Tags are unchanged
        assert!(transport.requests("ModifyResourceTags").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn removing_dynamic_retention_disables_it() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("ModifyInstanceAttributes", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply("ModifyResourceTags", json!({"RequestId": "1"}));
        running_instance(&transport);

        let mut planned = planned("POSTPAID_BY_HOUR");
        planned.id = Value::Value("ckafka-1".into());
        planned.resolve_unknowns();
        let prior = InstanceState {
            dynamic_retention_config: Value::Value(vec![Value::Value(
                super::super::DynamicRetentionBlock {
                    enable: Value::Value(1),
                    disk_quota_percentage: Value::Value(90),
                    step_forward_percentage: Value::Value(10),
                    bottom_retention: Value::Value(60),
                },
            )]),
            ..planned.clone()
        };

        let mut diags = Diagnostics::default();
        resource(&transport)
            .update(
                &mut diags,
                Value::Value(prior),
                Value::Value(planned),
                Value::Null,
                Default::default(),
                Default::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(
            transport.requests("ModifyInstanceAttributes")[0],
            json!({"InstanceId": "ckafka-1", "DynamicRetentionConfig": {"Enable": 0}})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_waits_for_removal() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("DeleteInstancePre", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply(
            "DescribeInstancesDetail",
            json!({"Result": {"TotalCount": 1, "InstanceList": [{"InstanceId": "ckafka-1", "Status": 1}]}}),
        );
        transport.reply(
            "DescribeInstancesDetail",
            json!({"Result": {"TotalCount": 0, "InstanceList": []}}),
        );

        let mut state = planned("PREPAID");
        state.id = Value::Value("ckafka-1".into());
        let mut diags = Diagnostics::default();
        resource(&transport)
            .destroy(&mut diags, Value::Value(state), Default::default(), Default::default())
            .await
            .unwrap();
        assert_eq!(
            transport.actions(),
            ["DeleteInstancePre", "DescribeInstancesDetail", "DescribeInstancesDetail"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_retries_while_deletion_is_unsupported() {
        let transport = Arc::new(MockTransport::default());
        transport.fail("DeleteInstancePost", "UnsupportedOperation");
        transport.reply("DeleteInstancePost", json!({"Result": {"ReturnCode": "0"}}));
        transport.reply(
            "DescribeInstancesDetail",
            json!({"Result": {"TotalCount": 0, "InstanceList": []}}),
        );

        let mut state = planned("POSTPAID_BY_HOUR");
        state.id = Value::Value("ckafka-1".into());
        let mut diags = Diagnostics::default();
        let destroyed = resource(&transport)
            .destroy(&mut diags, Value::Value(state), Default::default(), Default::default())
            .await;
        assert!(destroyed.is_some());
        assert!(diags.errors.is_empty());
        assert_eq!(transport.requests("DeleteInstancePost").len(), 2);
    }

    #[tokio::test]
    async fn import_defaults_to_prepaid() {
        let transport = Arc::new(MockTransport::default());
        let mut diags = Diagnostics::default();
        let (state, _) = resource(&transport)
            .import(&mut diags, "ckafka-1".to_owned())
            .await
            .unwrap();
        let Value::Value(state) = state else {
            panic!("imported state should be known");
        };
        assert_eq!(state.id.as_str(), "ckafka-1");
        assert_eq!(state.charge_type(), ChargeType::Prepaid);
        assert_eq!(state.upgrade_strategy, Value::Value(1));
    }
}
