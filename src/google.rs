#![cfg(feature = "web")]

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::column::{CellRange, cell_a1};
use crate::config::{Config, Credentials};
use crate::error::ApiError;
use crate::markup::{TextFormatRun, render_rich_cell};
use crate::source::{CellMode, TabularSource};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime requested from the token endpoint, in seconds
const TOKEN_LIFETIME: i64 = 3600;
/// Tokens this close to expiry are refreshed before use
const REFRESH_MARGIN: i64 = 60;

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::DataSource(err.to_string())
    }
}

struct AccessToken {
    value: String,
    expires_at: i64,
}

/// Google Sheets v4 client authenticated as a service account
pub struct GoogleSheets {
    http: reqwest::Client,
    spreadsheet_id: Option<String>,
    credentials: Option<Credentials>,
    token: Mutex<Option<AccessToken>>,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Response body of `spreadsheets.get`, trimmed to the fields requested
#[derive(Deserialize)]
pub struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    #[serde(default)]
    properties: Option<SheetProperties>,
    #[serde(default)]
    data: Vec<GridData>,
}

#[derive(Deserialize)]
struct SheetProperties {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridData {
    #[serde(default)]
    row_data: Vec<RowData>,
}

#[derive(Deserialize)]
struct RowData {
    #[serde(default)]
    values: Vec<CellData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CellData {
    #[serde(default)]
    formatted_value: Option<String>,
    #[serde(default)]
    text_format_runs: Vec<TextFormatRun>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

impl GoogleSheets {
    pub fn new(spreadsheet_id: Option<String>, credentials: Option<Credentials>) -> Self {
        GoogleSheets {
            http: reqwest::Client::new(),
            spreadsheet_id,
            credentials,
            token: Mutex::new(None),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.sheet_id.clone(), config.credentials.clone())
    }

    fn spreadsheet_id(&self) -> Result<&str, ApiError> {
        self.spreadsheet_id
            .as_deref()
            .ok_or_else(|| ApiError::DataSource("GOOGLE_SHEET_ID is not set".to_string()))
    }

    /// Bearer token for the API, exchanging a fresh JWT assertion when needed
    async fn access_token(&self) -> Result<String, ApiError> {
        let mut cached = self.token.lock().await;
        let now = Utc::now().timestamp();

        if let Some(token) = cached.as_ref() {
            if token.expires_at - REFRESH_MARGIN > now {
                return Ok(token.value.clone());
            }
        }

        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ApiError::DataSource("service account credentials are not configured".to_string())
        })?;

        let claims = Claims {
            iss: &credentials.client_email,
            scope: SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + TOKEN_LIFETIME,
        };
        let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(ApiError::data_source)?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(ApiError::data_source)?;

        let response: TokenResponse = self
            .http
            .post(TOKEN_URL)
            .form(&[("grant_type", JWT_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        log::debug!("obtained access token valid for {}s", response.expires_in);
        *cached = Some(AccessToken {
            value: response.access_token.clone(),
            expires_at: now + response.expires_in,
        });
        Ok(response.access_token)
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let token = self.access_token().await?;
        let value = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    fn values_url(&self, range: &str) -> Result<String, ApiError> {
        Ok(format!(
            "{}/{}/values/{}",
            SHEETS_API,
            self.spreadsheet_id()?,
            urlencoding::encode(range)
        ))
    }

    async fn read_values(&self, range: &str) -> Result<Vec<Vec<String>>, ApiError> {
        let url = self.values_url(range)?;
        let body: ValueRange = self.get_json(&url, &[]).await?;
        Ok(body.values)
    }

    async fn read_rich(&self, range: &str) -> Result<Vec<Vec<String>>, ApiError> {
        let url = format!("{}/{}", SHEETS_API, self.spreadsheet_id()?);
        let body: Spreadsheet = self
            .get_json(
                &url,
                &[
                    ("ranges", range),
                    ("includeGridData", "true"),
                    (
                        "fields",
                        "sheets.data.rowData.values(formattedValue,textFormatRuns)",
                    ),
                ],
            )
            .await?;
        Ok(grid_rows(body))
    }
}

/// Flatten grid data into rows of markup, one string per cell
///
/// Rows come back in sheet order. An empty row (`{}`) stays as an empty row
/// and a cell without `formattedValue` reads as `""`.
pub fn grid_rows(spreadsheet: Spreadsheet) -> Vec<Vec<String>> {
    spreadsheet
        .sheets
        .into_iter()
        .flat_map(|sheet| sheet.data)
        .flat_map(|grid| grid.row_data)
        .map(|row| {
            row.values
                .into_iter()
                .map(|cell| {
                    let text = cell.formatted_value.unwrap_or_default();
                    render_rich_cell(&text, &cell.text_format_runs)
                })
                .collect()
        })
        .collect()
}

impl TabularSource for GoogleSheets {
    async fn list_tabs(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/{}", SHEETS_API, self.spreadsheet_id()?);
        let body: Spreadsheet = self
            .get_json(&url, &[("fields", "sheets.properties.title")])
            .await?;

        Ok(body
            .sheets
            .into_iter()
            .filter_map(|sheet| sheet.properties.and_then(|p| p.title))
            .filter(|title| !title.is_empty())
            .collect())
    }

    async fn read_range(
        &self,
        tab: &str,
        range: CellRange,
        mode: CellMode,
    ) -> Result<Vec<Vec<String>>, ApiError> {
        let a1 = range.to_a1(tab);
        match mode {
            CellMode::Values => self.read_values(&a1).await,
            CellMode::Rich => self.read_rich(&a1).await,
        }
    }

    async fn write_cell(
        &self,
        tab: &str,
        column: usize,
        row: u32,
        value: &str,
    ) -> Result<(), ApiError> {
        let range = cell_a1(tab, column, row);
        let url = self.values_url(&range)?;
        let token = self.access_token().await?;

        self.http
            .put(&url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&serde_json::json!({ "values": [[value]] }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
