use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, ORIGIN, USER_AGENT};
use serde_json::{json, Value};

use colorsense_contracts::records::CatalogColor;

use super::{response_json_or_error, ColorSearch};
use crate::config::ColorSearchSettings;

const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Client for the vendor's advanced-search endpoint.
pub struct ColorSearchClient {
    url: String,
    subscription_key: Option<String>,
    origin: String,
    user_agent: String,
    http: HttpClient,
}

impl ColorSearchClient {
    pub fn new(settings: &ColorSearchSettings) -> Self {
        Self {
            url: settings.url.clone(),
            subscription_key: settings.subscription_key.clone(),
            origin: settings.origin.clone(),
            user_agent: settings.user_agent.clone(),
            http: HttpClient::new(),
        }
    }
}

impl ColorSearch for ColorSearchClient {
    fn name(&self) -> &str {
        "color-search"
    }

    fn search(&self, term: &str) -> Result<Vec<CatalogColor>> {
        let body = serde_json::to_vec(&json!({ "query": term, "facets": [] }))?;
        let mut request = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json;charset=UTF-8")
            .header(ORIGIN, &self.origin)
            .header(USER_AGENT, &self.user_agent);
        if let Some(key) = self.subscription_key.as_deref() {
            request = request.header(SUBSCRIPTION_KEY_HEADER, key);
        }
        let response = request
            .body(body)
            .send()
            .with_context(|| format!("color search request failed for '{term}'"))?;
        let payload = response_json_or_error("Color search", response)?;
        Ok(parse_search_response(&payload))
    }
}

/// Items under `data.records.page`. A payload without that path has no items.
pub fn parse_search_response(payload: &Value) -> Vec<CatalogColor> {
    payload
        .pointer("/data/records/page")
        .and_then(Value::as_array)
        .map(|page| page.iter().map(CatalogColor::from_value).collect())
        .unwrap_or_default()
}
