//! Google Sheets worksheet as a record sink.
//!
//! Authenticates with a service-account key: an RS256-signed JWT is exchanged
//! for an OAuth2 access token, which is cached until shortly before expiry.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::SinkError;
use crate::models::config::SheetsConfig;
use crate::models::record::{InventoryRecord, HEADER};

use super::RecordSink;

const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Seconds before expiry at which a cached token is refreshed.
const TOKEN_REFRESH_MARGIN: i64 = 60;

/// The fields of a service-account JSON key that signing needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parse a key file downloaded from the cloud console.
    pub fn from_file(path: &Path) -> Result<Self, SinkError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SinkError::Credentials(format!("{} unreadable: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Parse key JSON.
    pub fn from_json(json: &str) -> Result<Self, SinkError> {
        serde_json::from_str(json)
            .map_err(|e| SinkError::Credentials(format!("invalid service-account key: {}", e)))
    }

    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

struct CachedToken {
    access_token: String,
    expires_at: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Appends rows to one worksheet of a spreadsheet.
pub struct SheetsSink {
    client: reqwest::Client,
    key: ServiceAccountKey,
    spreadsheet_id: String,
    worksheet: String,
    api_base: Url,
    token_cache: Mutex<Option<CachedToken>>,
}

impl SheetsSink {
    /// Create a sink owning the given credentials.
    pub fn new(config: &SheetsConfig, key: ServiceAccountKey) -> Result<Self, SinkError> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(SinkError::Config(
                "sink.sheets.spreadsheet_id is not set".to_string(),
            ));
        }

        let api_base = Url::parse(&config.api_base).map_err(|e| {
            SinkError::Config(format!("invalid sink.sheets.api_base {}: {}", config.api_base, e))
        })?;

        info!(
            "Using spreadsheet {} ({}) as {}",
            config.spreadsheet_id,
            config.worksheet,
            key.client_email()
        );

        Ok(Self {
            client: reqwest::Client::new(),
            key,
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
            api_base,
            token_cache: Mutex::new(None),
        })
    }

    /// Get a valid OAuth2 access token, refreshing if expired.
    async fn access_token(&self) -> Result<String, SinkError> {
        let now = chrono::Utc::now().timestamp();

        let cached = {
            let cache = self.lock_cache();
            cache
                .as_ref()
                .filter(|c| now < c.expires_at - TOKEN_REFRESH_MARGIN)
                .map(|c| c.access_token.clone())
        };
        if let Some(token) = cached {
            return Ok(token);
        }

        let claims = serde_json::json!({
            "iss": self.key.client_email,
            "scope": SHEETS_SCOPE,
            "aud": self.key.token_uri(),
            "iat": now,
            "exp": now + 3600,
        });

        let header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256);
        let encoding_key = jsonwebtoken::EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| SinkError::Credentials(format!("invalid RSA private key: {}", e)))?;
        let jwt = jsonwebtoken::encode(&header, &claims, &encoding_key)?;

        let resp: TokenResponse = self
            .client
            .post(self.key.token_uri())
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Obtained access token valid for {}s", resp.expires_in);

        let token = resp.access_token.clone();
        *self.lock_cache() = Some(CachedToken {
            access_token: resp.access_token,
            expires_at: now + resp.expires_in,
        });

        Ok(token)
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<CachedToken>> {
        self.token_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `{api_base}/v4/spreadsheets/{id}/values/{worksheet}{suffix}`.
    fn values_url(&self, suffix: &str) -> Result<Url, SinkError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| SinkError::Config(format!("{} cannot be a base URL", self.api_base)))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                format!("{}{}", self.worksheet, suffix).as_str(),
            ]);
        Ok(url)
    }
}

/// Request body appending one record as a row.
fn append_body(record: &InventoryRecord) -> serde_json::Value {
    serde_json::json!({ "values": [record.as_row()] })
}

/// Records from worksheet values, skipping a leading header row.
fn decode_rows(values: Vec<Vec<String>>) -> Vec<InventoryRecord> {
    let mut rows = values.into_iter().peekable();

    if rows
        .peek()
        .is_some_and(|first| first.iter().map(|c| c.trim()).eq(HEADER))
    {
        rows.next();
    }

    rows.map(InventoryRecord::from_row).collect()
}

#[async_trait]
impl RecordSink for SheetsSink {
    async fn append(&self, record: &InventoryRecord) -> Result<(), SinkError> {
        let token = self.access_token().await?;
        let url = self.values_url(":append")?;

        self.client
            .post(url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(token)
            .json(&append_body(record))
            .send()
            .await?
            .error_for_status()?;

        debug!("Appended row to {}", self.describe());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<InventoryRecord>, SinkError> {
        let token = self.access_token().await?;
        let url = self.values_url("")?;

        let range: ValueRange = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(decode_rows(range.values))
    }

    fn describe(&self) -> String {
        format!("Google Sheet {} ({})", self.spreadsheet_id, self.worksheet)
    }
}
