use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use log::{error, info};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use colorsense_contracts::query::ColorFilter;
use colorsense_contracts::records::ColorRecord;

use super::migrations::{fold_text, run_migrations};
use super::ColorStore;

/// SQLite-backed store. Each record is kept whole as a JSON document next to
/// the columns used for filtering.
pub struct SqliteColorStore {
    conn: Mutex<Connection>,
    location: PathBuf,
}

impl SqliteColorStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open SQLite database {}", path.display()))?;
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }
        let store = Self::init(conn, path.to_path_buf())?;
        info!("Database initialized at {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::init(conn, PathBuf::from(":memory:"))
    }

    fn init(mut conn: Connection, location: PathBuf) -> Result<Self> {
        run_migrations(&mut conn).context("failed to run database migrations")?;
        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Flushes and releases the connection.
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.close().map_err(|(_, err)| {
            anyhow::Error::new(err).context("failed to close SQLite database")
        })?;
        info!("Database closed at {}", self.location.display());
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }
}

impl ColorStore for SqliteColorStore {
    fn insert_one(&self, record: &ColorRecord) -> Result<()> {
        let document = serde_json::to_string(record)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO colors
                 (name, code, hex, description, family, undertone, style, lrv, document,
                  created_at, name_folded, code_folded, description_folded)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                record.name,
                record.code,
                record.hex,
                record.description,
                record.family.as_str(),
                record.undertone.as_str(),
                record.style.as_str(),
                record.lrv,
                document,
                Utc::now().to_rfc3339(),
                fold_text(&record.name),
                fold_text(&record.code),
                fold_text(&record.description),
            ],
        )
        .with_context(|| format!("failed to insert color {}", record.code))?;
        Ok(())
    }

    fn count(&self, filter: &ColorFilter) -> Result<u64> {
        let (clause, values) = where_clause(filter);
        let conn = self.lock()?;
        let total: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM colors{clause}"),
                params_from_iter(values.iter()),
                |row| row.get(0),
            )
            .context("failed to count colors")?;
        u64::try_from(total).map_err(|_| anyhow!("negative color count {total}"))
    }

    fn find(&self, filter: &ColorFilter, skip: u64, limit: u64) -> Result<Vec<ColorRecord>> {
        let (clause, mut values) = where_clause(filter);
        values.push(SqlValue::Integer(clamp_i64(limit)));
        values.push(SqlValue::Integer(clamp_i64(skip)));
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT document FROM colors{clause} ORDER BY id LIMIT ? OFFSET ?"
        ))?;
        let documents = stmt
            .query_map(params_from_iter(values.iter()), |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("failed to query colors")?;
        documents.iter().map(|doc| parse_document(doc)).collect()
    }

    fn find_by_code(&self, code: &str) -> Result<Option<ColorRecord>> {
        let conn = self.lock()?;
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM colors WHERE code = ?1 ORDER BY id LIMIT 1",
                params![code],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("failed to look up color {code}"))?;
        document.as_deref().map(parse_document).transpose()
    }

    fn ping(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .context("database ping failed")?;
        Ok(())
    }
}

fn parse_document(document: &str) -> Result<ColorRecord> {
    serde_json::from_str(document).context("stored color document is malformed")
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Builds ` WHERE ...` (or nothing) plus positional values. Text matching
/// compares the folded columns against the folded needle, so case is ignored
/// for any script.
fn where_clause(filter: &ColorFilter) -> (String, Vec<SqlValue>) {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    if let Some(text) = filter.text.as_deref() {
        conditions.push(
            "(instr(name_folded, ?) > 0 OR instr(code_folded, ?) > 0 \
             OR instr(description_folded, ?) > 0)"
                .to_string(),
        );
        let needle = fold_text(text);
        for _ in 0..3 {
            values.push(SqlValue::Text(needle.clone()));
        }
    }
    for (column, wanted) in [
        ("family", &filter.family),
        ("undertone", &filter.undertone),
        ("style", &filter.style),
    ] {
        if let Some(wanted) = wanted.as_deref() {
            conditions.push(format!("lower({column}) = lower(?)"));
            values.push(SqlValue::Text(wanted.to_string()));
        }
    }
    if let Some(room) = filter.room.as_deref() {
        conditions.push(
            "EXISTS (SELECT 1 FROM json_each(colors.document, '$.suggestedRooms') AS room \
             WHERE lower(room.value) = lower(?))"
                .to_string(),
        );
        values.push(SqlValue::Text(room.to_string()));
    }
    if let Some(min) = filter.lrv_min {
        conditions.push("lrv >= ?".to_string());
        values.push(SqlValue::Real(min));
    }
    if let Some(max) = filter.lrv_max {
        conditions.push("lrv <= ?".to_string());
        values.push(SqlValue::Real(max));
    }

    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), values)
    }
}
