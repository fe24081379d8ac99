//! HTTP client for the tenant-selection backend API.
//!
//! All request/response bodies are JSON except the CSV export (raw bytes).
//! Authentication is a bearer token attached per request; the token is
//! sourced from persisted session state outside this layer.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::configs::{NewSelectionConfig, SelectionConfig, SelectionConfigUpdate};
use crate::decisions::{Decision, NewDecision};
use crate::documents::{DocumentExtraction, DocumentJob};
use crate::errors::{ApiError, Error, Result};
use crate::leads::{Lead, LeadUpdate};
use crate::viewings::{NewViewingSlot, ViewingSlot, ViewingSlotUpdate};

use super::models::{LeadPage, LeadQuery};
use super::traits::SelectionApi;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Structured error body the backend returns on non-2xx responses.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Lead listings arrive either as a bare row array or as an envelope with a
/// server-reported total.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum ApiLeadsBody {
    Rows(Vec<Value>),
    Envelope {
        #[serde(default)]
        leads: Vec<Value>,
        #[serde(default)]
        total: Option<u64>,
    },
}

/// HTTP client for the selection backend.
///
/// # Example
///
/// ```ignore
/// let client = SelectionApiClient::new("https://api.rentora.app", "your-token")?;
/// let page = client.list_leads(&LeadQuery::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SelectionApiClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderValue,
}

impl SelectionApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token format is invalid or the HTTP
    /// client cannot be initialized.
    pub fn new(base_url: &str, access_token: &str) -> Result<Self> {
        let auth_header = HeaderValue::from_str(&format!("Bearer {}", access_token))
            .map_err(|e| Error::Unexpected(format!("Invalid access token format: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_header,
        })
    }

    /// Default headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Maps a reqwest transport failure, keeping timeouts distinguishable.
    fn transport_error(err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("[SelectionApi] GET {}", url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.parse_response(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        debug!("[SelectionApi] POST {}", url);
        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.parse_response(response).await
    }

    async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        debug!("[SelectionApi] PATCH {}", url);
        let response = self
            .client
            .patch(&url)
            .headers(self.headers())
            .json(body)
            .send()
            .await
            .map_err(Self::transport_error)?;
        self.parse_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!("[SelectionApi] DELETE {}", url);
        let response = self
            .client
            .delete(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(Self::transport_error)?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Converts a non-2xx response into a structured error, passing the
    /// server's detail message through verbatim. HTTP 408 becomes a timeout.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .ok()
            .and_then(|err| err.message.or(err.error).or(err.detail))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.chars().take(200).collect()
                }
            });

        if status == StatusCode::REQUEST_TIMEOUT {
            return Err(Error::Api(ApiError::Timeout(message)));
        }
        Err(Error::Api(ApiError::Server {
            status: status.as_u16(),
            message,
        }))
    }

    /// Parse a successful HTTP response body as JSON.
    async fn parse_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::Api(ApiError::Decode(format!("Failed to read response: {}", e))))?;
        serde_json::from_str(&body).map_err(|e| {
            Error::Api(ApiError::Decode(format!(
                "Failed to parse response: {} - {}",
                e,
                body.chars().take(200).collect::<String>()
            )))
        })
    }
}

#[async_trait]
impl SelectionApi for SelectionApiClient {
    async fn get_config(&self, property_id: &str) -> Result<SelectionConfig> {
        self.get(&format!(
            "/api/v1/properties/{}/selection-config",
            urlencoding::encode(property_id)
        ))
        .await
    }

    async fn create_config(&self, config: &NewSelectionConfig) -> Result<SelectionConfig> {
        config.validate()?;
        self.post(
            &format!(
                "/api/v1/properties/{}/selection-config",
                urlencoding::encode(&config.property_id)
            ),
            config,
        )
        .await
    }

    async fn update_config(
        &self,
        property_id: &str,
        changes: &SelectionConfigUpdate,
    ) -> Result<SelectionConfig> {
        self.patch(
            &format!(
                "/api/v1/properties/{}/selection-config",
                urlencoding::encode(property_id)
            ),
            changes,
        )
        .await
    }

    async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage> {
        let path = format!("/api/v1/leads?{}", query.to_query_string());
        let body: Value = self.get(&path).await?;

        // The listing body must be an array of rows (bare or enveloped).
        // Anything else is ingested as an empty page with a diagnostic, not
        // a hard failure.
        match serde_json::from_value::<ApiLeadsBody>(body) {
            Ok(ApiLeadsBody::Rows(rows)) => Ok(LeadPage { rows, total: None }),
            Ok(ApiLeadsBody::Envelope { leads, total }) => Ok(LeadPage {
                rows: leads,
                total: total.map(|t| t as usize),
            }),
            Err(e) => {
                warn!("[SelectionApi] Unexpected lead listing shape: {}", e);
                Ok(LeadPage::default())
            }
        }
    }

    async fn get_lead(&self, lead_id: &str) -> Result<Lead> {
        self.get(&format!("/api/v1/leads/{}", urlencoding::encode(lead_id)))
            .await
    }

    async fn update_lead(&self, lead_id: &str, changes: &LeadUpdate) -> Result<Lead> {
        self.patch(
            &format!("/api/v1/leads/{}", urlencoding::encode(lead_id)),
            changes,
        )
        .await
    }

    async fn submit_decision(&self, lead_id: &str, decision: &NewDecision) -> Result<Decision> {
        self.post(
            &format!("/api/v1/leads/{}/decision", urlencoding::encode(lead_id)),
            decision,
        )
        .await
    }

    async fn create_viewing_slots(
        &self,
        property_id: &str,
        slots: &[NewViewingSlot],
    ) -> Result<Vec<ViewingSlot>> {
        self.post(
            &format!(
                "/api/v1/properties/{}/viewing-slots/bulk",
                urlencoding::encode(property_id)
            ),
            slots,
        )
        .await
    }

    async fn update_viewing_slot(
        &self,
        slot_id: &str,
        changes: &ViewingSlotUpdate,
    ) -> Result<ViewingSlot> {
        self.patch(
            &format!("/api/v1/viewing-slots/{}", urlencoding::encode(slot_id)),
            changes,
        )
        .await
    }

    async fn delete_viewing_slot(&self, slot_id: &str) -> Result<()> {
        self.delete(&format!(
            "/api/v1/viewing-slots/{}",
            urlencoding::encode(slot_id)
        ))
        .await
    }

    async fn trigger_document_processing(&self, lead_id: &str) -> Result<DocumentJob> {
        self.post(
            &format!(
                "/api/v1/leads/{}/documents/process",
                urlencoding::encode(lead_id)
            ),
            &Value::Null,
        )
        .await
    }

    async fn get_document_extraction(&self, lead_id: &str) -> Result<DocumentExtraction> {
        self.get(&format!(
            "/api/v1/leads/{}/documents/extraction",
            urlencoding::encode(lead_id)
        ))
        .await
    }

    async fn export_leads_csv(&self, property_id: &str) -> Result<Vec<u8>> {
        let url = self.url(&format!(
            "/api/v1/leads/export?propertyId={}",
            urlencoding::encode(property_id)
        ));
        debug!("[SelectionApi] GET {} (csv)", url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers())
            .send()
            .await
            .map_err(Self::transport_error)?;
        let response = Self::check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Api(ApiError::Decode(format!("Failed to read export: {}", e))))?;
        Ok(bytes.to_vec())
    }
}
