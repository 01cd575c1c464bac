//! GA4 Data API `runReport` over REST, authenticated with a service account.

use crate::config::toml_config::AnalyticsSettings;
use crate::domain::model::{Metric, Table};
use crate::utils::error::{DashError, Result};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

const ANALYTICS_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const DATE_DIMENSION: &str = "date";

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// The fields of a downloaded service-account key file that the exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| DashError::AuthError {
            message: format!(
                "cannot read service-account key {}: {}",
                path.as_ref().display(),
                e
            ),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Signed RS256 assertion for the `jwt-bearer` grant.
    pub fn signed_assertion(&self, issued_at: i64) -> Result<String> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: ANALYTICS_SCOPE,
            aud: &self.token_uri,
            iat: issued_at,
            exp: issued_at + TOKEN_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            DashError::AuthError {
                message: format!("invalid private key: {}", e),
            }
        })?;

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key).map_err(|e| {
            DashError::AuthError {
                message: format!("cannot sign token request: {}", e),
            }
        })
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone)]
pub enum AnalyticsAuth {
    ServiceAccount(ServiceAccountKey),
    AccessToken(String),
}

impl AnalyticsAuth {
    pub fn from_settings(settings: &AnalyticsSettings) -> Result<Self> {
        match &settings.access_token {
            Some(token) => Ok(AnalyticsAuth::AccessToken(token.clone())),
            None => Ok(AnalyticsAuth::ServiceAccount(ServiceAccountKey::from_file(
                &settings.key_file,
            )?)),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RunReportResponse {
    #[serde(default)]
    dimension_headers: Vec<ColumnHeader>,
    #[serde(default)]
    metric_headers: Vec<ColumnHeader>,
    #[serde(default)]
    rows: Vec<ReportRow>,
}

#[derive(Deserialize)]
struct ColumnHeader {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRow {
    #[serde(default)]
    dimension_values: Vec<CellValue>,
    #[serde(default)]
    metric_values: Vec<CellValue>,
}

#[derive(Deserialize)]
struct CellValue {
    #[serde(default)]
    value: String,
}

pub struct AnalyticsClient {
    client: Client,
    api_base_url: String,
    auth: AnalyticsAuth,
}

impl AnalyticsClient {
    pub fn new(settings: &AnalyticsSettings, auth: AnalyticsAuth) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    async fn access_token(&self) -> Result<String> {
        let key = match &self.auth {
            AnalyticsAuth::AccessToken(token) => return Ok(token.clone()),
            AnalyticsAuth::ServiceAccount(key) => key,
        };

        tracing::debug!("Exchanging service-account assertion at {}", key.token_uri);
        let assertion = key.signed_assertion(chrono::Utc::now().timestamp())?;

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashError::AuthError {
                message: format!("token endpoint returned {}: {}", status.as_u16(), body),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Daily rows for the last `window_days` days: `date` plus the five metrics.
    pub async fn run_report(&self, property_id: &str, window_days: u32) -> Result<Table> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/v1beta/properties/{}:runReport",
            self.api_base_url, property_id
        );

        tracing::debug!("Making runReport request to: {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&report_request_body(window_days))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("runReport response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let report: RunReportResponse = response.json().await?;
        Ok(response_to_table(report))
    }
}

fn report_request_body(window_days: u32) -> serde_json::Value {
    let metrics: Vec<serde_json::Value> = Metric::ALL
        .iter()
        .map(|m| serde_json::json!({ "name": m.api_name() }))
        .collect();

    serde_json::json!({
        "dateRanges": [{ "startDate": format!("{}daysAgo", window_days), "endDate": "today" }],
        "dimensions": [{ "name": DATE_DIMENSION }],
        "metrics": metrics,
    })
}

fn response_to_table(report: RunReportResponse) -> Table {
    let headers: Vec<String> = report
        .dimension_headers
        .into_iter()
        .chain(report.metric_headers)
        .map(|h| h.name)
        .collect();

    let rows: Vec<Vec<String>> = report
        .rows
        .into_iter()
        .map(|row| {
            row.dimension_values
                .into_iter()
                .chain(row.metric_values)
                .map(|v| v.value)
                .collect()
        })
        .collect();

    Table::new(headers, rows)
}
