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

use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Error};
use tokio::time::{sleep, Instant};
use tracing::warn;

use crate::utils::DisplayJoinable;

use super::ApiError;

pub const READ_RETRY_TIMEOUT: Duration = Duration::from_secs(3 * 60);
pub const WRITE_RETRY_TIMEOUT: Duration = Duration::from_secs(5 * 60);

const MIN_INTERVAL: Duration = Duration::from_secs(1);
const MAX_INTERVAL: Duration = Duration::from_secs(10);

/// Codes worth another attempt whatever the action
const RETRYABLE_CODES: &[&str] = &[
    "InternalError",
    "RequestLimitExceeded",
    "ResourceInUse",
    "ResourceUnavailable",
    "ResourceBusy",
    "FailedOperation.RequestLimitExceeded",
    "ClientError.NetworkError",
    "ClientError.HttpStatusCodeError",
];

#[derive(Debug)]
pub enum RetryError {
    Retryable(Error),
    NonRetryable(Error),
}

impl RetryError {
    pub fn into_inner(self) -> Error {
        match self {
            RetryError::Retryable(err) | RetryError::NonRetryable(err) => err,
        }
    }
}

/// `code` is `pattern` or one of its sub-codes (`pattern.Detail`)
fn code_matches(code: &str, pattern: &str) -> bool {
    code.strip_prefix(pattern)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

/// Classify an error with the default retryable codes
pub fn retryable(err: Error) -> RetryError {
    retryable_with(err, &[])
}

/// Classify an error, `extra` codes being retryable as well
pub fn retryable_with(err: Error, extra: &[&str]) -> RetryError {
    let retry = match err.downcast_ref::<ApiError>() {
        Some(api) => {
            api.is_transport()
                || RETRYABLE_CODES
                    .iter()
                    .chain(extra)
                    .any(|pattern| code_matches(api.code(), pattern))
        }
        None => false,
    };
    if retry {
        RetryError::Retryable(err)
    } else {
        RetryError::NonRetryable(err)
    }
}

/// Call `op` until it succeeds, fails with a non retryable error, or `timeout` elapses
pub async fn retry<T, F, Fut>(timeout: Duration, mut op: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RetryError>>,
{
    let deadline = Instant::now() + timeout;
    let mut interval = MIN_INTERVAL;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(RetryError::NonRetryable(err)) => return Err(err),
            Err(RetryError::Retryable(err)) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(err.context(format!(
                        "timeout while waiting for state to become 'success' (timeout: {timeout:?})"
                    )));
                }
                warn!("retrying after error: {err:#}");
                sleep(interval.min(deadline - now)).await;
                interval = (interval * 2).min(MAX_INTERVAL);
            }
        }
    }
}

/// Poll `refresh` every `interval` until the status it returns is one of `target`.
///
/// When `pending` is not empty, any status outside of `pending` and `target` aborts the wait.
pub async fn wait_for_state<F, Fut>(
    timeout: Duration,
    interval: Duration,
    pending: &[&str],
    target: &[&str],
    mut refresh: F,
) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<String>>,
{
    let deadline = Instant::now() + timeout;
    let mut last_status = String::new();
    loop {
        match refresh().await {
            Ok(status) => {
                if target.contains(&status.as_str()) {
                    return Ok(());
                }
                if !pending.is_empty() && !pending.contains(&status.as_str()) {
                    return Err(anyhow!(
                        "unexpected state '{status}', wanted target '{}'",
                        target.iter().join_with(", ")
                    ));
                }
                last_status = status;
            }
            Err(err) => match retryable(err) {
                RetryError::Retryable(err) => warn!("state refresh failed: {err:#}"),
                RetryError::NonRetryable(err) => return Err(err),
            },
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(anyhow!(
                "timeout while waiting for state to become '{}' (last state: '{last_status}', timeout: {timeout:?})",
                target.iter().join_with(", ")
            ));
        }
        sleep(interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use anyhow::anyhow;

    use super::*;

    fn cloud(code: &str) -> Error {
        ApiError::Cloud {
            code: code.into(),
            message: String::new(),
            request_id: String::new(),
        }
        .into()
    }

    #[test]
    fn classify() {
        assert!(matches!(
            retryable(cloud("InternalError")),
            RetryError::Retryable(_)
        ));
        assert!(matches!(
            retryable(cloud("ResourceUnavailable.InstanceStatusError")),
            RetryError::Retryable(_)
        ));
        assert!(matches!(
            retryable(cloud("InternalErrorX")),
            RetryError::NonRetryable(_)
        ));
        assert!(matches!(
            retryable(cloud("UnsupportedOperation")),
            RetryError::NonRetryable(_)
        ));
        assert!(matches!(
            retryable_with(cloud("UnsupportedOperation"), &["UnsupportedOperation"]),
            RetryError::Retryable(_)
        ));
        assert!(matches!(
            retryable(anyhow!("local failure")),
            RetryError::NonRetryable(_)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_until_success() {
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let value = retry(READ_RETRY_TIMEOUT, || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 3 {
                Err(retryable(cloud("RequestLimitExceeded")))
            } else {
                Ok(42)
            }
        })
        .await
        .unwrap();
        assert_eq!(value, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_stops_on_fatal_error() {
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        let err = retry(READ_RETRY_TIMEOUT, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(retryable(cloud("InvalidParameter")))
        })
        .await
        .unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            err.downcast_ref::<ApiError>().map(ApiError::code),
            Some("InvalidParameter")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retry_times_out() {
        let start = Instant::now();
        let err = retry(Duration::from_secs(30), || async {
            Err::<(), _>(retryable(cloud("ResourceInUse")))
        })
        .await
        .unwrap_err();
        assert!(format!("{err:#}").contains("timeout while waiting"));
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert!(start.elapsed() < Duration::from_secs(45));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_reaches_target() {
        let calls = AtomicUsize::new(0);
        let calls = &calls;
        wait_for_state(
            Duration::from_secs(60),
            Duration::from_secs(1),
            &["0"],
            &["1"],
            || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Ok(if n < 5 { "0" } else { "1" }.to_owned())
            },
        )
        .await
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_rejects_unexpected_state() {
        let err = wait_for_state(
            Duration::from_secs(60),
            Duration::from_secs(1),
            &["0"],
            &["1"],
            || async { Ok("2".to_owned()) },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "unexpected state '2', wanted target '1'");
    }

    #[tokio::test(start_paused = true)]
    async fn wait_times_out() {
        let err = wait_for_state(
            Duration::from_secs(5),
            Duration::from_secs(1),
            &[],
            &["1"],
            || async { Ok("0".to_owned()) },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("last state: '0'"));
    }
}
