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

use thiserror::Error;

/// Errors raised while talking to a Tencent Cloud endpoint
#[derive(Debug, Error)]
pub enum ApiError {
    /// Error object returned inside the `Response` envelope
    #[error("[TencentCloudSDKError] Code={code}, Message={message}, RequestId={request_id}")]
    Cloud {
        code: String,
        message: String,
        request_id: String,
    },

    #[error("[TencentCloudSDKError] Code=ClientError.NetworkError, Message={0}")]
    Network(#[from] reqwest::Error),

    #[error("[TencentCloudSDKError] Code=ClientError.HttpStatusCodeError, Message=status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("[TencentCloudSDKError] Code=ClientError.ParseJsonError, Message={0}")]
    Decode(#[from] serde_json::Error),

    /// Request could not be signed
    #[error("[TencentCloudSDKError] Code=ClientError.SignError, Message={0}")]
    Sign(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Error code as reported by the cloud API, or the client side equivalent
    pub fn code(&self) -> &str {
        match self {
            ApiError::Cloud { code, .. } => code,
            ApiError::Network(_) => "ClientError.NetworkError",
            ApiError::HttpStatus { .. } => "ClientError.HttpStatusCodeError",
            ApiError::Decode(_) => "ClientError.ParseJsonError",
            ApiError::Sign(_) => "ClientError.SignError",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Cloud { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether the failure happened on the way to the API rather than inside it
    pub fn is_transport(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
