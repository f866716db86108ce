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

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, error};

pub mod ckafka;
mod error;
mod ratelimit;
pub mod retry;
mod sign;
pub mod tag;

#[cfg(test)]
pub mod mock;

pub use error::{ApiError, Result};
pub use ratelimit::RateLimiter;
pub use sign::Credential;

const REQUEST_CLIENT: &str = concat!("terraform-provider-ckafka/", env!("CARGO_PKG_VERSION"));

/// Cloud API product: endpoint prefix and API version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub name: &'static str,
    pub version: &'static str,
}

pub const CKAFKA: Service = Service {
    name: "ckafka",
    version: "2019-08-19",
};

pub const TAG: Service = Service {
    name: "tag",
    version: "2018-08-13",
};

/// Request ready to be sent: signed headers and JSON body
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub url: String,
    pub action: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

#[async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync + 'static {
    /// Send the request and return the raw response body
    async fn send(&self, request: SignedRequest) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(REQUEST_CLIENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: SignedRequest) -> Result<String> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        let response = builder.body(request.body).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    credential: Credential,
    region: String,
    protocol: String,
    domain: String,
    limiter: Arc<RateLimiter>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CloudError {
    code: String,
    message: String,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>, credential: Credential, region: String) -> Self {
        Self {
            transport,
            credential,
            region,
            protocol: "https".to_owned(),
            domain: "tencentcloudapi.com".to_owned(),
            limiter: Default::default(),
        }
    }

    pub fn with_endpoint(mut self, protocol: &str, domain: &str) -> Self {
        self.protocol = protocol.to_ascii_lowercase();
        self.domain = domain.to_owned();
        self
    }

    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.limiter = Arc::new(RateLimiter::new(per_second));
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Call `action` on `service`, and decode the content of the `Response` envelope
    pub async fn call<Req, Resp>(
        &self,
        log_id: &str,
        service: Service,
        action: &str,
        request: &Req,
    ) -> Result<Resp>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_string(request)?;
        self.limiter.check(action).await;

        let result = match self.sign(service, action, &payload) {
            Ok(signed) => self.transport.send(signed).await,
            Err(err) => Err(err),
        };
        let decoded = result.and_then(|body| decode::<Resp>(&body).map(|resp| (resp, body)));

        match decoded {
            Ok((resp, body)) => {
                debug!(
                    "{log_id} api[{action}] success, request body [{payload}], response body [{body}]"
                );
                Ok(resp)
            }
            Err(err) => {
                error!("{log_id} api[{action}] fail, request body [{payload}], reason[{err}]");
                Err(err)
            }
        }
    }

    fn sign(&self, service: Service, action: &str, payload: &str) -> Result<SignedRequest> {
        let host = format!("{}.{}", service.name, self.domain);
        let timestamp = OffsetDateTime::now_utc().unix_timestamp();
        let authorization =
            sign::authorization(&self.credential, service.name, &host, timestamp, payload)?;

        let mut headers = vec![
            ("Authorization", authorization),
            ("Content-Type", sign::CONTENT_TYPE.to_owned()),
            ("X-TC-Action", action.to_owned()),
            ("X-TC-Version", service.version.to_owned()),
            ("X-TC-Timestamp", timestamp.to_string()),
            ("X-TC-Region", self.region.clone()),
            ("X-TC-RequestClient", REQUEST_CLIENT.to_owned()),
        ];
        if !self.credential.token.is_empty() {
            headers.push(("X-TC-Token", self.credential.token.clone()));
        }

        Ok(SignedRequest {
            url: format!("{}://{host}/", self.protocol),
            action: action.to_owned(),
            headers,
            body: payload.to_owned(),
        })
    }
}

fn decode<Resp: DeserializeOwned>(body: &str) -> Result<Resp> {
    let mut envelope: serde_json::Value = serde_json::from_str(body)?;
    let response = envelope
        .get_mut("Response")
        .map(serde_json::Value::take)
        .unwrap_or_default();

    if let Some(err) = response.get("Error") {
        let CloudError { code, message } = serde_json::from_value(err.clone())?;
        let request_id = response
            .get("RequestId")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_owned();
        return Err(ApiError::Cloud {
            code,
            message,
            request_id,
        });
    }

    Ok(serde_json::from_value(response)?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde::Deserialize;
    use serde_json::json;

    use super::{decode, mock::MockTransport, ApiError, Client, Credential, CKAFKA};

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Answer {
        request_id: String,
    }

    #[test]
    fn decode_success() {
        let answer: Answer =
            decode(r#"{"Response":{"RequestId":"req-1","Result":{}}}"#).unwrap();
        assert_eq!(answer.request_id, "req-1");
    }

    #[test]
    fn decode_cloud_error() {
        let err = decode::<Answer>(
            r#"{"Response":{"Error":{"Code":"AuthFailure.SignatureFailure","Message":"bad"},"RequestId":"req-2"}}"#,
        )
        .unwrap_err();
        match err {
            ApiError::Cloud {
                code, request_id, ..
            } => {
                assert_eq!(code, "AuthFailure.SignatureFailure");
                assert_eq!(request_id, "req-2");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn decode_garbage() {
        assert!(matches!(
            decode::<Answer>("<html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn signed_headers() {
        let transport = Arc::new(MockTransport::default());
        transport.reply("DescribeTopic", json!({"RequestId": "req-3"}));

        let credential = Credential {
            secret_id: "id".into(),
            secret_key: "key".into(),
            token: "session".into(),
        };
        let client = Client::new(transport.clone(), credential, "ap-shanghai".into())
            .with_endpoint("HTTP", "internal.tencentcloudapi.com");
        let answer: Answer = client
            .call("log", CKAFKA, "DescribeTopic", &json!({"InstanceId": "ckafka-1"}))
            .await
            .unwrap();
        assert_eq!(answer.request_id, "req-3");

        let request = transport.last_request("DescribeTopic").unwrap();
        assert_eq!(request.url, "http://ckafka.internal.tencentcloudapi.com/");
        let header = |name: &str| {
            request
                .headers
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.as_str())
        };
        assert_eq!(header("X-TC-Action"), Some("DescribeTopic"));
        assert_eq!(header("X-TC-Version"), Some("2019-08-19"));
        assert_eq!(header("X-TC-Region"), Some("ap-shanghai"));
        assert_eq!(header("X-TC-Token"), Some("session"));
        assert!(header("Authorization")
            .unwrap()
            .starts_with("TC3-HMAC-SHA256 Credential=id/"));
    }
}
