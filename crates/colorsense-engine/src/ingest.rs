use std::thread;
use std::time::Duration;

use indexmap::IndexMap;
use log::{error, info, warn};
use serde_json::{json, Value};
use uuid::Uuid;

use colorsense_contracts::events::{EventPayload, EventWriter};
use colorsense_contracts::records::{build_record, CatalogColor};
use colorsense_contracts::summary::IngestReport;

use crate::providers::ColorSearch;
use crate::store::ColorStore;

/// Fetches catalog colors term by term, deduplicates them by code and
/// persists one derived record per unique code.
pub struct Ingestor<'a> {
    search: &'a dyn ColorSearch,
    store: &'a dyn ColorStore,
    events: EventWriter,
    delay: Duration,
}

impl<'a> Ingestor<'a> {
    pub fn new(
        search: &'a dyn ColorSearch,
        store: &'a dyn ColorStore,
        events: EventWriter,
    ) -> Self {
        Self {
            search,
            store,
            events,
            delay: Duration::ZERO,
        }
    }

    /// Pause inserted before every search request except the first.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Failed terms and failed records are logged and skipped; the run
    /// itself never fails.
    pub fn run(&self, terms: &[String]) -> IngestReport {
        let mut report = IngestReport {
            terms_requested: terms.len() as u64,
            ..IngestReport::default()
        };
        self.emit(
            "ingest_started",
            json!({
                "search": self.search.name(),
                "terms": terms.len(),
                "delay_ms": self.delay.as_millis() as u64,
            }),
        );

        let fetched = self.fetch_all(terms, &mut report);
        let unique = dedupe_by_code(fetched);
        report.unique_colors = unique.len() as u64;
        info!("Total unique colors found: {}", unique.len());

        for (index, color) in unique.iter().enumerate() {
            self.persist(index, color, &mut report);
        }

        info!(
            "Ingestion finished: {} saved, {} failed, {} of {} terms failed",
            report.colors_saved, report.colors_failed, report.terms_failed, report.terms_requested
        );
        self.emit(
            "ingest_finished",
            serde_json::to_value(&report).unwrap_or(Value::Null),
        );
        report
    }

    fn fetch_all(&self, terms: &[String], report: &mut IngestReport) -> Vec<CatalogColor> {
        let mut fetched = Vec::new();
        for (index, term) in terms.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            info!("Fetching colors for term: {term}");
            match self.search.search(term) {
                Ok(colors) => {
                    let usable: Vec<CatalogColor> =
                        colors.into_iter().filter(CatalogColor::is_usable).collect();
                    info!("Found {} colors for term: {term}", usable.len());
                    self.emit("term_fetched", json!({ "term": term, "colors": usable.len() }));
                    report.colors_fetched += usable.len() as u64;
                    fetched.extend(usable);
                }
                Err(err) => {
                    warn!("Error fetching colors for term {term}: {err:#}");
                    self.emit(
                        "term_failed",
                        json!({ "term": term, "error": format!("{err:#}") }),
                    );
                    report.terms_failed += 1;
                }
            }
        }
        fetched
    }

    fn persist(&self, index: usize, color: &CatalogColor, report: &mut IngestReport) {
        let outcome = build_record(color)
            .map_err(anyhow::Error::from)
            .and_then(|record| self.store.insert_one(&record).map(|_| record));
        match outcome {
            Ok(record) => {
                info!(
                    "Saved color {}: {} ({})",
                    index + 1,
                    record.name,
                    record.code
                );
                self.emit(
                    "color_saved",
                    json!({ "code": record.code, "name": record.name, "family": record.family }),
                );
                report.colors_saved += 1;
            }
            Err(err) => {
                error!("Error processing color {}: {err:#}", color.name);
                self.emit(
                    "color_failed",
                    json!({ "code": color.code, "name": color.name, "error": format!("{err:#}") }),
                );
                report.colors_failed += 1;
            }
        }
    }

    fn emit(&self, event_type: &str, payload: Value) {
        let payload: EventPayload = match payload {
            Value::Object(map) => map,
            _ => EventPayload::new(),
        };
        if let Err(err) = self.events.emit(event_type, payload) {
            warn!("Failed to write {event_type} event: {err:#}");
        }
    }
}

pub fn new_run_id() -> String {
    format!("ingest-{}", Uuid::new_v4())
}

/// One entry per code, positioned where the code first appeared and holding
/// the last color seen with it.
pub fn dedupe_by_code(colors: Vec<CatalogColor>) -> Vec<CatalogColor> {
    let mut unique: IndexMap<String, CatalogColor> = IndexMap::new();
    for color in colors {
        unique.insert(color.code.clone(), color);
    }
    unique.into_values().collect()
}
