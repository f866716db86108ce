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

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use tf_provider::DynamicDataSource;
use tf_provider::DynamicResource;
use tf_provider::value::ValueNumber;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{map, AttributePath, Diagnostics, Provider};

use crate::acl::{CkafkaAclResource, CkafkaAclsDataSource};
use crate::api::ckafka::CkafkaService;
use crate::api::{Client, Credential, HttpTransport};
use crate::connect_resource::{CkafkaConnectResource, CkafkaConnectResourceDataSource};
use crate::datahub::{CkafkaDatahubTaskDataSource, CkafkaDatahubTopicResource};
use crate::instance::CkafkaInstanceResource;
use crate::route::CkafkaRouteResource;
use crate::topic::{CkafkaTopicResource, CkafkaTopicsDataSource};
use crate::user::{CkafkaUserResource, CkafkaUsersDataSource};
use crate::utils::non_empty;

const DEFAULT_REGION: &str = "ap-guangzhou";
const DEFAULT_PROTOCOL: &str = "HTTPS";
const DEFAULT_DOMAIN: &str = "tencentcloudapi.com";
const DEFAULT_REQUEST_TIMEOUT: i64 = 300;

/// Client shared by the provider and every resource, filled by `configure`
#[derive(Debug, Default, Clone)]
pub struct ProviderHandle(Arc<OnceLock<Arc<Client>>>);

impl ProviderHandle {
    #[cfg(test)]
    pub fn with_client(client: Client) -> Self {
        let handle = Self::default();
        handle.0.get_or_init(|| Arc::new(client));
        handle
    }

    pub fn service(&self, diags: &mut Diagnostics) -> Option<CkafkaService> {
        match self.0.get() {
            Some(client) => Some(CkafkaService::new(client.clone())),
            None => {
                diags.error(
                    "Provider not configured".to_owned(),
                    "The provider must be configured before resources can be used".to_owned(),
                    AttributePath::default(),
                );
                None
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub secret_id: ValueString<'a>,
    pub secret_key: ValueString<'a>,
    pub security_token: ValueString<'a>,
    pub region: ValueString<'a>,
    pub protocol: ValueString<'a>,
    pub domain: ValueString<'a>,
    pub request_timeout: ValueNumber,
}

/// Configured value, or environment fallback
fn resolve(
    value: &ValueString<'_>,
    env: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    non_empty(value)
        .map(str::to_owned)
        .or_else(|| lookup(env).filter(|value| !value.is_empty()))
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn string_attribute(description: &str, sensitive: bool) -> Attribute {
    Attribute {
        attr_type: AttributeType::String,
        description: Description::plain(description),
        constraint: AttributeConstraint::Optional,
        sensitive,
        ..Default::default()
    }
}

#[derive(Debug, Default, Clone)]
pub struct CkafkaProvider {
    handle: ProviderHandle,
}

impl CkafkaProvider {
    fn build_client(
        &self,
        diags: &mut Diagnostics,
        config: &ProviderConfig<'_>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<Client> {
        let secret_id = resolve(&config.secret_id, "TENCENTCLOUD_SECRET_ID", &lookup);
        let secret_key = resolve(&config.secret_key, "TENCENTCLOUD_SECRET_KEY", &lookup);
        let token = resolve(&config.security_token, "TENCENTCLOUD_SECURITY_TOKEN", &lookup);
        let region = resolve(&config.region, "TENCENTCLOUD_REGION", &lookup)
            .unwrap_or_else(|| DEFAULT_REGION.to_owned());
        let protocol = resolve(&config.protocol, "TENCENTCLOUD_PROTOCOL", &lookup)
            .unwrap_or_else(|| DEFAULT_PROTOCOL.to_owned());
        let domain = resolve(&config.domain, "TENCENTCLOUD_DOMAIN", &lookup)
            .unwrap_or_else(|| DEFAULT_DOMAIN.to_owned());
        let timeout = config
            .request_timeout
            .as_ref_option()
            .copied()
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let (Some(secret_id), Some(secret_key)) = (secret_id, secret_key) else {
            diags.error(
                "Missing credentials".to_owned(),
                "`secret_id` and `secret_key` must be set, either in the provider block or with TENCENTCLOUD_SECRET_ID and TENCENTCLOUD_SECRET_KEY".to_owned(),
                AttributePath::new("secret_id"),
            );
            return None;
        };

        let transport = match HttpTransport::new(Duration::from_secs(timeout.max(1) as u64)) {
            Ok(transport) => transport,
            Err(err) => {
                diags.error(
                    "Failed to build the HTTP client".to_owned(),
                    err.to_string(),
                    AttributePath::default(),
                );
                return None;
            }
        };

        let credential = Credential {
            secret_id,
            secret_key,
            token: token.unwrap_or_default(),
        };
        info!("tencentcloud provider configured for region {region}");
        Some(
            Client::new(Arc::new(transport), credential, region)
                .with_endpoint(&protocol, &domain),
        )
    }
}

#[async_trait]
impl Provider for CkafkaProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                version: 1,
                description: Description::plain("Tencent Cloud CKafka"),
                attributes: map! {
                    "secret_id" => string_attribute(
                        "Secret id of the API key. It can also be sourced from the `TENCENTCLOUD_SECRET_ID` environment variable.",
                        false,
                    ),
                    "secret_key" => string_attribute(
                        "Secret key of the API key. It can also be sourced from the `TENCENTCLOUD_SECRET_KEY` environment variable.",
                        true,
                    ),
                    "security_token" => string_attribute(
                        "Temporary security token. It can also be sourced from the `TENCENTCLOUD_SECURITY_TOKEN` environment variable.",
                        true,
                    ),
                    "region" => string_attribute(
                        "Region of the resources, `ap-guangzhou` by default. It can also be sourced from the `TENCENTCLOUD_REGION` environment variable.",
                        false,
                    ),
                    "protocol" => string_attribute(
                        "Protocol of the API endpoint: `HTTPS` (default) or `HTTP`. It can also be sourced from the `TENCENTCLOUD_PROTOCOL` environment variable.",
                        false,
                    ),
                    "domain" => string_attribute(
                        "Root domain of the API endpoint, `tencentcloudapi.com` by default. It can also be sourced from the `TENCENTCLOUD_DOMAIN` environment variable.",
                        false,
                    ),
                    "request_timeout" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Timeout of every API request, in seconds. Defaults to 300."),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        if let Some(protocol) = config.protocol.as_deref_option() {
            if protocol != "HTTP" && protocol != "HTTPS" {
                diags.error(
                    "Invalid protocol".to_owned(),
                    format!("`protocol` must be `HTTP` or `HTTPS`, got `{protocol}`"),
                    AttributePath::new("protocol"),
                );
            }
        }
        if let Some(timeout) = config.request_timeout.as_ref_option() {
            if *timeout <= 0 {
                diags.error(
                    "Invalid request timeout".to_owned(),
                    format!("`request_timeout` must be positive, got {timeout}"),
                    AttributePath::new("request_timeout"),
                );
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        info!("configuring provider for terraform {terraform_version}");
        let client = self.build_client(diags, &config, env_lookup)?;
        if self.handle.0.set(Arc::new(client)).is_err() {
            warn!("provider already configured, keeping the first configuration");
        }
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        let handle = &self.handle;
        Some(map! {
            "ckafka_instance" => CkafkaInstanceResource::new(handle.clone()),
            "ckafka_topic" => CkafkaTopicResource::new(handle.clone()),
            "ckafka_user" => CkafkaUserResource::new(handle.clone()),
            "ckafka_acl" => CkafkaAclResource::new(handle.clone()),
            "ckafka_connect_resource" => CkafkaConnectResource::new(handle.clone()),
            "ckafka_datahub_topic" => CkafkaDatahubTopicResource::new(handle.clone()),
            "ckafka_route" => CkafkaRouteResource::new(handle.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        let handle = &self.handle;
        Some(map! {
            "ckafka_topics" => CkafkaTopicsDataSource::new(handle.clone()),
            "ckafka_users" => CkafkaUsersDataSource::new(handle.clone()),
            "ckafka_acls" => CkafkaAclsDataSource::new(handle.clone()),
            "ckafka_connect_resource" => CkafkaConnectResourceDataSource::new(handle.clone()),
            "ckafka_datahub_task" => CkafkaDatahubTaskDataSource::new(handle.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use tf_provider::value::Value;

    use super::*;

    fn string(value: &str) -> ValueString<'static> {
        Value::Value(Cow::Owned(value.to_owned()))
    }

    #[test]
    fn resolve_prefers_config() {
        let lookup = |name: &str| (name == "TENCENTCLOUD_REGION").then(|| "ap-beijing".to_owned());
        assert_eq!(
            resolve(&string("ap-shanghai"), "TENCENTCLOUD_REGION", lookup).as_deref(),
            Some("ap-shanghai")
        );
        assert_eq!(
            resolve(&Value::Null, "TENCENTCLOUD_REGION", lookup).as_deref(),
            Some("ap-beijing")
        );
        assert_eq!(resolve(&string(""), "TENCENTCLOUD_DOMAIN", lookup), None);
    }

    #[test]
    fn missing_credentials() {
        let provider = CkafkaProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            secret_id: string("AKID"),
            ..Default::default()
        };
        assert!(provider.build_client(&mut diags, &config, |_| None).is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn credentials_from_env() {
        let provider = CkafkaProvider::default();
        let mut diags = Diagnostics::default();
        let lookup = |name: &str| match name {
            "TENCENTCLOUD_SECRET_ID" => Some("AKID".to_owned()),
            "TENCENTCLOUD_SECRET_KEY" => Some("key".to_owned()),
            _ => None,
        };
        let client = provider
            .build_client(&mut diags, &ProviderConfig::default(), lookup)
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(client.region(), DEFAULT_REGION);
    }

    #[tokio::test]
    async fn validate_protocol_and_timeout() {
        let provider = CkafkaProvider::default();
        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            protocol: string("FTP"),
            request_timeout: Value::Value(0),
            ..Default::default()
        };
        assert!(provider.validate(&mut diags, config).await.is_none());
        assert_eq!(diags.errors.len(), 2);

        let mut diags = Diagnostics::default();
        let config = ProviderConfig {
            protocol: string("HTTP"),
            ..Default::default()
        };
        assert!(provider.validate(&mut diags, config).await.is_some());
    }

    #[test]
    fn unconfigured_handle() {
        let mut diags = Diagnostics::default();
        assert!(ProviderHandle::default().service(&mut diags).is_none());
        assert_eq!(diags.errors.len(), 1);
    }
}
