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

//! Scripted transport replaying canned API responses

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use super::{ApiError, Client, Credential, Result, SignedRequest, Transport};

#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<String>>>,
    requests: Mutex<Vec<SignedRequest>>,
}

impl MockTransport {
    /// Queue a response for `action`. The last queued response is replayed forever.
    pub fn reply(&self, action: &str, response: serde_json::Value) -> &Self {
        let body = json!({ "Response": response }).to_string();
        self.responses
            .lock()
            .unwrap()
            .entry(action.to_owned())
            .or_default()
            .push_back(body);
        self
    }

    /// Queue a cloud error for `action`
    pub fn fail(&self, action: &str, code: &str) -> &Self {
        self.reply(
            action,
            json!({
                "Error": { "Code": code, "Message": format!("{code} raised by mock") },
                "RequestId": "mock",
            }),
        )
    }

    pub fn requests(&self, action: &str) -> Vec<serde_json::Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.action == action)
            .map(|request| serde_json::from_str(&request.body).unwrap())
            .collect()
    }

    pub fn last_request(&self, action: &str) -> Option<SignedRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|request| request.action == action)
            .cloned()
    }

    pub fn actions(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.action.clone())
            .collect()
    }

    pub fn client(self: &Arc<Self>) -> Client {
        let credential = Credential {
            secret_id: "AKIDmock".into(),
            secret_key: "mock".into(),
            token: String::new(),
        };
        Client::new(self.clone(), credential, "ap-guangzhou".into()).with_rate_limit(100_000)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: SignedRequest) -> Result<String> {
        let action = request.action.clone();
        self.requests.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&action);
        match queue {
            Some(queue) if queue.len() > 1 => Ok(queue.pop_front().unwrap_or_default()),
            Some(queue) if !queue.is_empty() => Ok(queue[0].clone()),
            _ => Err(ApiError::Cloud {
                code: "MockError.NoResponse".into(),
                message: format!("no mock response for {action}"),
                request_id: "mock".into(),
            }),
        }
    }
}
