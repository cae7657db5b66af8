use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use colorsense_contracts::color::{generate_palette, PaletteEntry};
use colorsense_contracts::query::{non_blank, ColorFilter, PageRequest, Pagination};
use colorsense_contracts::records::ColorRecord;

use crate::store::ColorStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorPage {
    pub colors: Vec<ColorRecord>,
    pub pagination: Pagination,
}

/// Read side of the catalog.
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn ColorStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn ColorStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn ColorStore> {
        &self.store
    }

    pub fn list_colors(&self, filter: &ColorFilter, page: PageRequest) -> Result<ColorPage> {
        let total = self.store.count(filter)?;
        let colors = match page.skip() {
            Some(skip) if page.limit() > 0 => self.store.find(filter, skip, page.limit())?,
            _ => Vec::new(),
        };
        Ok(ColorPage {
            colors,
            pagination: Pagination::new(total, page),
        })
    }

    pub fn color_by_code(&self, code: &str) -> Result<Option<ColorRecord>> {
        self.store.find_by_code(code)
    }

    pub fn palette_for_code(&self, code: &str) -> Result<Option<Vec<PaletteEntry>>> {
        Ok(self
            .store
            .find_by_code(code)?
            .map(|color| generate_palette(&color.name, &color.code, &color.hex)))
    }
}

/// Reads list parameters from a query-string map.
///
/// `query` drives the free-text match. `family`, `undertone`, `style`,
/// `room`, `lrv_min` and `lrv_max` narrow the result. `page` and `per_page`
/// must be non-negative integers when present.
pub fn parse_list_params(params: &HashMap<String, String>) -> Result<(ColorFilter, PageRequest)> {
    let text_param = |key: &str| params.get(key).and_then(|value| non_blank(value));

    let filter = ColorFilter {
        text: text_param("query"),
        family: text_param("family"),
        undertone: text_param("undertone"),
        style: text_param("style"),
        room: text_param("room"),
        lrv_min: parse_optional(params, "lrv_min")?,
        lrv_max: parse_optional(params, "lrv_max")?,
    };
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        parse_optional(params, "page")?.unwrap_or(defaults.page),
        parse_optional(params, "per_page")?.unwrap_or(defaults.per_page),
    );
    Ok((filter, page))
}

fn parse_optional<T>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    params
        .get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("invalid {key} parameter '{raw}'"))
        })
        .transpose()
}
