use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, Transaction};

pub(crate) const CURRENT_SCHEMA_VERSION: i32 = 2;

pub(crate) fn run_migrations(conn: &mut Connection) -> Result<()> {
    let mut version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    if version > CURRENT_SCHEMA_VERSION {
        bail!(
            "database version ({}) is newer than supported schema ({})",
            version,
            CURRENT_SCHEMA_VERSION
        );
    }
    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .context("failed to open migration transaction")?;
    while version < CURRENT_SCHEMA_VERSION {
        let next_version = version + 1;
        apply_migration(&tx, next_version)
            .with_context(|| format!("migration to version {next_version} failed"))?;
        version = next_version;
    }
    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
        .context("failed to update user_version pragma")?;
    tx.commit().context("failed to commit migrations")?;
    Ok(())
}

fn apply_migration(tx: &Transaction<'_>, version: i32) -> Result<()> {
    match version {
        1 => tx
            .execute_batch(include_str!("schemas/schema_v1.sql"))
            .context("failed to execute schema_v1.sql"),
        2 => {
            tx.execute_batch(include_str!("schemas/schema_v2.sql"))
                .context("failed to execute schema_v2.sql")?;
            backfill_folded_text(tx)
        }
        other => bail!("no migration defined for version {other}"),
    }
}

/// SQLite `lower()` folds ASCII only, so folded copies of the searchable
/// text are computed here and matched with `instr`.
pub(crate) fn fold_text(text: &str) -> String {
    text.to_lowercase()
}

fn backfill_folded_text(tx: &Transaction<'_>) -> Result<()> {
    let mut select = tx.prepare("SELECT id, name, code, description FROM colors")?;
    let rows = select
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to read colors for folding")?;

    let mut update = tx.prepare(
        "UPDATE colors
         SET name_folded = ?1, code_folded = ?2, description_folded = ?3
         WHERE id = ?4",
    )?;
    for (id, name, code, description) in rows {
        update
            .execute(params![
                fold_text(&name),
                fold_text(&code),
                fold_text(&description),
                id
            ])
            .with_context(|| format!("failed to fold text for color row {id}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        run_migrations(&mut conn)?;
        run_migrations(&mut conn)?;
        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
        Ok(())
    }

    #[test]
    fn newer_database_is_rejected() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION + 1)?;
        assert!(run_migrations(&mut conn).is_err());
        Ok(())
    }

    #[test]
    fn upgrade_folds_existing_rows() -> Result<()> {
        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch(include_str!("schemas/schema_v1.sql"))?;
        conn.pragma_update(None, "user_version", 1)?;
        conn.execute(
            "INSERT INTO colors
                 (name, code, hex, description, family, undertone, style, lrv, document, created_at)
             VALUES
                 ('Crème Brûlée', 'ÉC-1', '#F3E5CF', 'Warm ÉCRU', 'White', 'Warm', 'Minimalist',
                  90, '{}', '')",
            [],
        )?;

        run_migrations(&mut conn)?;

        let folded: (String, String, String) = conn.query_row(
            "SELECT name_folded, code_folded, description_folded FROM colors",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        assert_eq!(
            folded,
            (
                "crème brûlée".to_string(),
                "éc-1".to_string(),
                "warm écru".to_string()
            )
        );
        Ok(())
    }
}
