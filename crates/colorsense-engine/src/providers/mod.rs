use anyhow::{bail, Context, Result};
use reqwest::blocking::Response as HttpResponse;
use serde_json::Value;

use colorsense_contracts::records::CatalogColor;

mod color_search;
mod gemini;

pub use color_search::{parse_search_response, ColorSearchClient};
pub use gemini::{extract_text, GeminiTextProvider};

/// Keyword search against the external paint catalog.
pub trait ColorSearch: Send + Sync {
    fn name(&self) -> &str;
    /// Every color the catalog returns for `term`, usable or not.
    fn search(&self, term: &str) -> Result<Vec<CatalogColor>>;
}

/// Single-turn text generation.
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &str;
    /// The model's text, possibly empty.
    fn generate_text(&self, prompt: &str) -> Result<String>;
}

fn response_json_or_error(provider: &str, response: HttpResponse) -> Result<Value> {
    let status = response.status();
    let code = status.as_u16();
    let body = response
        .text()
        .with_context(|| format!("{provider} response body read failed"))?;
    if !status.is_success() {
        bail!(
            "{provider} request failed ({code}): {}",
            truncate_text(&body, 512)
        );
    }
    serde_json::from_str(&body)
        .with_context(|| format!("{provider} returned invalid JSON payload"))
}

fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}

#[cfg(test)]
mod tests {
    use super::truncate_text;

    #[test]
    fn truncate_text_marks_cut_bodies() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("abcdef", 3), "abc…");
    }
}
