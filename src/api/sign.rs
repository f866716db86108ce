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

//! TC3-HMAC-SHA256 request signing

use std::fmt::Write;

use crypto::{digest::Digest, hmac::Hmac, mac::Mac, sha2::Sha256};
use time::{macros::format_description, OffsetDateTime};

use super::error::{ApiError, Result};

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host";

#[derive(Clone, Default)]
pub struct Credential {
    pub secret_id: String,
    pub secret_key: String,
    pub token: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("secret_id", &self.secret_id)
            .finish_non_exhaustive()
    }
}

pub(crate) fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.input(data);
    hasher.result_str()
}

pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = Hmac::new(Sha256::new(), key);
    mac.input(data);
    mac.result().code().to_vec()
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(2 * bytes.len()), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}

/// UTC date of the timestamp, as used in the credential scope
pub(crate) fn scope_date(timestamp: i64) -> Result<String> {
    let date = OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|err| ApiError::Sign(err.to_string()))?;
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| ApiError::Sign(err.to_string()))
}

/// Compute the `Authorization` header of a POST request with a JSON payload
pub fn authorization(
    credential: &Credential,
    service: &str,
    host: &str,
    timestamp: i64,
    payload: &str,
) -> Result<String> {
    let canonical_request = format!(
        "POST\n/\n\ncontent-type:{CONTENT_TYPE}\nhost:{host}\n\n{SIGNED_HEADERS}\n{}",
        sha256_hex(payload.as_bytes())
    );

    let date = scope_date(timestamp)?;
    let credential_scope = format!("{date}/{service}/tc3_request");
    let string_to_sign = format!(
        "{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let secret_date = hmac_sha256(
        format!("TC3{}", credential.secret_key).as_bytes(),
        date.as_bytes(),
    );
    let secret_service = hmac_sha256(&secret_date, service.as_bytes());
    let secret_signing = hmac_sha256(&secret_service, b"tc3_request");
    let signature = hex(&hmac_sha256(&secret_signing, string_to_sign.as_bytes()));

    Ok(format!(
        "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
        credential.secret_id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_empty() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hmac_rfc4231() {
        assert_eq!(
            hex(&hmac_sha256(b"Jefe", b"what do ya want for nothing?")),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn scope_date_is_utc() {
        assert_eq!(scope_date(1551113065).unwrap(), "2019-02-25");
        assert_eq!(scope_date(0).unwrap(), "1970-01-01");
    }

    #[test]
    fn authorization_layout() {
        let credential = Credential {
            secret_id: "AKIDEXAMPLE".into(),
            secret_key: "secret".into(),
            token: String::new(),
        };
        let header = authorization(
            &credential,
            "ckafka",
            "ckafka.tencentcloudapi.com",
            1551113065,
            "{}",
        )
        .unwrap();

        let prefix = "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2019-02-25/ckafka/tc3_request, SignedHeaders=content-type;host, Signature=";
        assert!(header.starts_with(prefix), "{header}");
        let signature = &header[prefix.len()..];
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));

        // Signature depends on the payload
        let other = authorization(
            &credential,
            "ckafka",
            "ckafka.tencentcloudapi.com",
            1551113065,
            "{\"InstanceId\":\"ckafka-1\"}",
        )
        .unwrap();
        assert_ne!(header, other);
    }

    #[test]
    fn credential_debug_hides_secret() {
        let credential = Credential {
            secret_id: "id".into(),
            secret_key: "very-secret".into(),
            token: "token".into(),
        };
        let debug = format!("{credential:?}");
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("token\""));
    }
}
