use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::column::column_index;
use crate::flatten::SheetWindow;
use crate::source::CellMode;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";

/// An environment variable with a value that cannot be used
#[derive(Debug, Error)]
#[error("invalid value for {key}: '{value}'")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

/// Service-account credentials for the Sheets API
#[derive(Clone, Debug)]
pub struct Credentials {
    pub client_email: String,
    /// PEM private key with real newlines
    pub private_key: String,
}

/// Server settings read from the environment
#[derive(Clone, Debug)]
pub struct Config {
    /// `GOOGLE_SHEET_ID`
    pub sheet_id: Option<String>,
    /// `GOOGLE_CLIENT_EMAIL` and `GOOGLE_PRIVATE_KEY`
    pub credentials: Option<Credentials>,
    /// `PORT`
    pub port: u16,
    /// `BIND_ADDR`
    pub bind_addr: String,
    /// `SHEET_MAX_ROWS` and `SHEET_LAST_COLUMN`
    pub window: SheetWindow,
    /// `SHEET_RICH_TEXT`
    pub cell_mode: CellMode,
    /// `SYSTEMS_FIXTURE`
    pub fixture: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sheet_id: None,
            credentials: None,
            port: DEFAULT_PORT,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            window: SheetWindow::default(),
            cell_mode: CellMode::Values,
            fixture: None,
        }
    }
}

impl Config {
    /// Read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; empty values count as unset
    ///
    /// # Examples
    /// ```
    /// use inquiry::config::Config;
    ///
    /// let config = Config::from_lookup(|key| match key {
    ///     "PORT" => Some("5501".to_string()),
    ///     "SHEET_LAST_COLUMN" => Some("AD".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.port, 5501);
    /// assert_eq!(config.window.columns, 30);
    /// assert!(config.sheet_id.is_none());
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        config.sheet_id = get("GOOGLE_SHEET_ID");

        if let (Some(client_email), Some(key)) =
            (get("GOOGLE_CLIENT_EMAIL"), get("GOOGLE_PRIVATE_KEY"))
        {
            config.credentials = Some(Credentials {
                client_email,
                private_key: key.replace("\\n", "\n"),
            });
        }

        if let Some(port) = get("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError {
                key: "PORT",
                value: port,
            })?;
        }

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Some(rows) = get("SHEET_MAX_ROWS") {
            config.window.max_rows = rows
                .trim()
                .parse()
                .ok()
                .filter(|rows| *rows >= 1)
                .ok_or(ConfigError {
                    key: "SHEET_MAX_ROWS",
                    value: rows,
                })?;
        }

        if let Some(label) = get("SHEET_LAST_COLUMN") {
            config.window.columns = column_index(label.trim()).map(|i| i + 1).ok_or(ConfigError {
                key: "SHEET_LAST_COLUMN",
                value: label,
            })?;
        }

        if let Some(rich) = get("SHEET_RICH_TEXT") {
            config.cell_mode = match rich.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => CellMode::Rich,
                "0" | "false" | "no" | "off" => CellMode::Values,
                _ => {
                    return Err(ConfigError {
                        key: "SHEET_RICH_TEXT",
                        value: rich,
                    });
                }
            };
        }

        config.fixture = get("SYSTEMS_FIXTURE").map(PathBuf::from);

        if config.sheet_id.is_none() && config.fixture.is_none() {
            log::warn!("GOOGLE_SHEET_ID is not set.");
        }

        Ok(config)
    }

    /// `bind_addr:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
