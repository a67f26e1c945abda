use std::{fs, path::Path, str::FromStr, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::{error::ClientError, state::DEFAULT_PAGE_SIZE};

pub const DEFAULT_SETTINGS_FILE: &str = "client.toml";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// What a list fetch does with a response whose shape it does not recognize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedListPolicy {
    /// Show an empty collection.
    #[default]
    Degrade,
    /// Record a malformed-response error on the store.
    Report,
}

impl FromStr for MalformedListPolicy {
    type Err = ClientError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "report" => Ok(Self::Report),
            other => Err(ClientError::Config(format!(
                "unknown malformed list policy '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub success_flash_ms: u64,
    pub malformed_list_policy: MalformedListPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
            success_flash_ms: 2000,
            malformed_list_policy: MalformedListPolicy::Degrade,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn success_flash(&self) -> Duration {
        Duration::from_millis(self.success_flash_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    api_base_url: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
    success_flash_ms: Option<u64>,
    malformed_list_policy: Option<MalformedListPolicy>,
}

/// Defaults, then `path` (or `client.toml` when present), then environment variables.
///
/// An explicitly given file must exist; the default file is optional.
pub fn load_settings(path: Option<&Path>) -> Result<ClientSettings, ClientError> {
    let mut settings = ClientSettings::default();

    let raw = match path {
        Some(path) => Some(fs::read_to_string(path).map_err(|err| {
            ClientError::Config(format!("failed to read '{}': {err}", path.display()))
        })?),
        None => fs::read_to_string(DEFAULT_SETTINGS_FILE).ok(),
    };
    if let Some(raw) = raw {
        apply_file(&mut settings, &raw)?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    settings.api_base_url = normalize_base_url(&settings.api_base_url)?;
    if settings.page_size == 0 {
        return Err(ClientError::Config("page_size must be at least 1".into()));
    }
    Ok(settings)
}

fn apply_file(settings: &mut ClientSettings, raw: &str) -> Result<(), ClientError> {
    let file: FileSettings = toml::from_str(raw)
        .map_err(|err| ClientError::Config(format!("invalid settings file: {err}")))?;

    if let Some(v) = file.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file.page_size {
        settings.page_size = v;
    }
    if let Some(v) = file.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file.success_flash_ms {
        settings.success_flash_ms = v;
    }
    if let Some(v) = file.malformed_list_policy {
        settings.malformed_list_policy = v;
    }
    Ok(())
}

fn apply_env(
    settings: &mut ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ClientError> {
    if let Some(v) = lookup("CUSTOMER_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        settings.page_size = parse_number("APP__PAGE_SIZE", &v)?;
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = parse_number("APP__REQUEST_TIMEOUT_SECS", &v)?;
    }
    if let Some(v) = lookup("APP__SUCCESS_FLASH_MS") {
        settings.success_flash_ms = parse_number("APP__SUCCESS_FLASH_MS", &v)?;
    }
    if let Some(v) = lookup("APP__MALFORMED_LIST_POLICY") {
        settings.malformed_list_policy = v.parse()?;
    }
    Ok(())
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, ClientError> {
    raw.trim()
        .parse()
        .map_err(|_| ClientError::Config(format!("{key} must be a non-negative integer, got '{raw}'")))
}

/// Trims, drops trailing slashes and checks the result is an absolute http(s) URL.
/// An empty value falls back to the default.
pub fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_API_BASE_URL.to_string());
    }

    let parsed = Url::parse(trimmed)
        .map_err(|err| ClientError::Config(format!("invalid api base url '{trimmed}': {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "api base url must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
