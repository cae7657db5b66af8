use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_DB_PATH: &str = "colorsense.sqlite3";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_COLOR_SEARCH_URL: &str =
    "https://api.benjaminmoore.io/service/advancedSearch?version=v1.0";
pub const DEFAULT_COLOR_SEARCH_ORIGIN: &str = "https://www.benjaminmoore.com";
pub const DEFAULT_COLOR_SEARCH_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Mobile Safari/537.36"
);

#[derive(Debug, Clone, PartialEq)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorSearchSettings {
    pub url: String,
    pub subscription_key: Option<String>,
    pub origin: String,
    pub user_agent: String,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub gemini: GeminiSettings,
    pub color_search: ColorSearchSettings,
    pub ingest_delay: Duration,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Environment variables first, then `.env` in the working directory,
    /// then defaults.
    pub fn load() -> Result<Self> {
        let dotenv = parse_dotenv(Path::new(".env"));
        Self::from_lookup(|key| {
            non_empty_env(key).or_else(|| {
                dotenv
                    .get(key)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
            })
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            db_path: PathBuf::from(text("COLORSENSE_DB", DEFAULT_DB_PATH)),
            gemini: GeminiSettings {
                api_key: lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")),
                api_base: text("GEMINI_API_BASE", DEFAULT_GEMINI_API_BASE)
                    .trim_end_matches('/')
                    .to_string(),
                model: text("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
                timeout: Duration::from_secs(parse_number(&lookup, "GEMINI_TIMEOUT_SECS", 90)?),
            },
            color_search: ColorSearchSettings {
                url: text("COLOR_SEARCH_URL", DEFAULT_COLOR_SEARCH_URL),
                subscription_key: lookup("COLOR_SEARCH_KEY"),
                origin: text("COLOR_SEARCH_ORIGIN", DEFAULT_COLOR_SEARCH_ORIGIN),
                user_agent: text("COLOR_SEARCH_USER_AGENT", DEFAULT_COLOR_SEARCH_USER_AGENT),
            },
            ingest_delay: Duration::from_millis(parse_number(&lookup, "INGEST_DELAY_MS", 1000)?),
            host: text("HOST", "127.0.0.1"),
            port: parse_number(&lookup, "PORT", 5001)?,
        })
    }
}

fn parse_number<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Minimal `.env` reader: `KEY=VALUE` lines, optional `export ` prefix,
/// `#` comments, and matching single or double quotes around the value.
/// A missing or unreadable file yields no entries.
pub fn parse_dotenv(path: &Path) -> HashMap<String, String> {
    let content = std::fs::read_to_string(path).unwrap_or_default();
    let mut vars = HashMap::new();
    for raw_line in content.lines() {
        let mut line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("export ") {
            line = stripped.trim();
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim();
        let unquoted = ['"', '\'']
            .iter()
            .find_map(|quote| {
                value
                    .strip_prefix(*quote)
                    .and_then(|rest| rest.strip_suffix(*quote))
            })
            .unwrap_or(value);
        vars.insert(key.to_string(), unquoted.to_string());
    }
    vars
}
