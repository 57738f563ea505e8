//! API client for the inventory service backend.
//!
//! Two calls only: the duplicate-registration check (GET) and the record
//! submission (POST). Both use the same fixed timeout; nothing is retried.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;
use crate::record::InventoryRecord;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Dados enviados com sucesso!";

/// API errors, rendered directly into the user-facing dialogs.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Erro ao conectar ao servidor: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{context}. Código: {status}")]
    Status { context: &'static str, status: u16 },

    #[error("Erro ao decodificar resposta do servidor: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Duplicate-registration check result. The service may omit fields;
/// missing booleans default to false.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RegistrationStatus {
    #[serde(rename = "jaExiste", default)]
    pub already_exists: bool,

    #[serde(rename = "maquinaExiste", default)]
    pub device_exists: bool,

    #[serde(rename = "matriculaExiste", default)]
    pub employee_id_exists: bool,
}

/// Optional `{message}` envelope in the submit response body.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    message: Option<String>,
}

/// Client for the inventory service.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the resolved configuration.
    pub fn new(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.resolved_timeout_seconds());
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!config.api.verify_ssl)
            .build()
            .unwrap_or_else(|_| Client::new());

        ApiClient {
            client,
            base_url: normalize_base_url(&config.resolved_base_url()),
        }
    }

    /// GET `{base}/verificar-cadastro/{device}/{employeeId}`.
    pub async fn check_existing(
        &self,
        device_name: &str,
        employee_id: &str,
    ) -> Result<RegistrationStatus, ApiError> {
        let url = format!(
            "{}/verificar-cadastro/{}/{}",
            self.base_url,
            encode_segment(device_name),
            encode_segment(employee_id)
        );
        tracing::debug!(%url, "checking existing registration");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                context: "Erro ao verificar cadastro",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: RegistrationStatus = serde_json::from_str(&body)?;
        Ok(parsed)
    }

    /// POST `{base}/hardware-data`. Success is exactly HTTP 201; the returned
    /// message comes from the response body when it parses.
    pub async fn submit(&self, record: &InventoryRecord) -> Result<String, ApiError> {
        let url = format!("{}/hardware-data", self.base_url);
        tracing::debug!(%url, device = %record.device_name, "submitting record");

        let response = self.client.post(&url).json(record).send().await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(ApiError::Status {
                context: "Erro ao enviar dados",
                status: status.as_u16(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Ok(extract_submit_message(&body))
    }
}

/// Pull the server message out of a 201 body, defaulting to the generic
/// success string when the body is not the expected JSON envelope.
fn extract_submit_message(body: &str) -> String {
    serde_json::from_str::<SubmitResponse>(body)
        .ok()
        .and_then(|r| r.message)
        .unwrap_or_else(|| SUBMIT_SUCCESS_MESSAGE.to_string())
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Percent-encode a path segment. Hostnames and employee ids are plain
/// ASCII in practice; this guards the URL shape against the exceptions.
fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:3000/api/"),
            "http://localhost:3000/api"
        );
        assert_eq!(
            normalize_base_url("  http://inv.example/api  "),
            "http://inv.example/api"
        );
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("PC-042"), "PC-042");
        assert_eq!(encode_segment("sala 3"), "sala%203");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
    }

    #[test]
    fn test_registration_status_fills_missing_fields() {
        let status: RegistrationStatus = serde_json::from_str("{\"jaExiste\": true}").unwrap();
        assert!(status.already_exists);
        assert!(!status.device_exists);
        assert!(!status.employee_id_exists);

        let empty: RegistrationStatus = serde_json::from_str("{}").unwrap();
        assert!(!empty.already_exists);
    }

    #[test]
    fn test_registration_status_rejects_malformed_json() {
        assert!(serde_json::from_str::<RegistrationStatus>("not json").is_err());
    }

    #[test]
    fn test_extract_submit_message() {
        assert_eq!(extract_submit_message("{\"message\":\"ok\"}"), "ok");
        assert_eq!(extract_submit_message("{}"), SUBMIT_SUCCESS_MESSAGE);
        assert_eq!(extract_submit_message("<html>"), SUBMIT_SUCCESS_MESSAGE);
        assert_eq!(extract_submit_message(""), SUBMIT_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_status_error_mentions_code() {
        let err = ApiError::Status {
            context: "Erro ao enviar dados",
            status: 500,
        };
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_client_builds_from_default_config() {
        let client = ApiClient::new(&Config::default());
        assert!(client.base_url.starts_with("http"));
    }
}
