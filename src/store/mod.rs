//! SQLite-backed script library for offline triage.
//!
//! Stores scripts keyed by id with their review status, rejection reason
//! and comment. `import_dir` ingests a `<dj>/<script>.txt` tree whose
//! filenames follow the generator's `YYYY-MM-DD_HHMM_<dj>_<type>` pattern.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, params};
use tracing::{info, warn};

use crate::api::{Result, ScriptFilters, ScriptPage, ScriptStore, StoreError};
use crate::{
    Decision, DjTally, RejectionReason, ReviewStats, Script, ScriptMetadata, default_reasons,
};

/// Local script library.
///
/// The connection lives behind a mutex so the library can serve the async
/// `ScriptStore` trait; every call is a short synchronous transaction.
pub struct ScriptLibrary {
    conn: Mutex<Connection>,
}

impl ScriptLibrary {
    /// Open or create the library at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS scripts (
                script_id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                dj TEXT NOT NULL,
                content_type TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                word_count INTEGER NOT NULL,
                content TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                reason_id TEXT,
                comment TEXT,
                reviewed_at TEXT
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a script as pending. Returns `false` when the id already
    /// exists (the row is left untouched).
    pub fn insert_script(&self, script: &Script) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let meta = &script.metadata;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO scripts
                (script_id, filename, dj, content_type, timestamp, word_count, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                meta.script_id,
                meta.filename,
                meta.dj,
                meta.content_type,
                meta.timestamp.to_rfc3339(),
                meta.word_count,
                script.content,
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Ingest a directory laid out as `<dj>/<script>.txt`.
    ///
    /// Returns the number of newly imported scripts; files whose ids are
    /// already in the library are skipped.
    pub fn import_dir(&self, dir: &Path) -> Result<usize> {
        let mut imported = 0;

        for dj_entry in fs::read_dir(dir)? {
            let dj_dir = dj_entry?.path();
            if !dj_dir.is_dir() {
                continue;
            }
            let dj = dj_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            for entry in fs::read_dir(&dj_dir)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                    continue;
                }

                let content = match fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable script");
                        continue;
                    }
                };

                let script = script_from_file(&path, &dj, content);
                if self.insert_script(&script)? {
                    imported += 1;
                }
            }
        }

        info!(imported, dir = %dir.display(), "imported scripts");
        Ok(imported)
    }

    fn query_scripts(
        &self,
        filters: &ScriptFilters,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Script>, usize)> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(dj) = &filters.dj {
            clauses.push("dj = ?");
            values.push(dj.clone());
        }
        if let Some(category) = &filters.category {
            clauses.push("lower(content_type) = lower(?)");
            values.push(category.clone());
        }
        if let Some(status) = filters.status {
            clauses.push("status = ?");
            values.push(status.as_str().to_string());
        }
        if let Some(from) = filters.date_from {
            clauses.push("date(timestamp) >= date(?)");
            values.push(from.to_string());
        }
        if let Some(to) = filters.date_to {
            clauses.push("date(timestamp) <= date(?)");
            values.push(to.to_string());
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let conn = self.conn.lock().unwrap();

        let total: usize = conn.query_row(
            &format!("SELECT COUNT(*) FROM scripts{where_clause}"),
            rusqlite::params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let offset = (page.saturating_sub(1)) * page_size;
        let mut stmt = conn.prepare(&format!(
            "SELECT script_id, filename, dj, content_type, timestamp, word_count, content
             FROM scripts{where_clause}
             ORDER BY timestamp, script_id
             LIMIT {page_size} OFFSET {offset}"
        ))?;

        let rows = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, usize>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let scripts = rows
            .into_iter()
            .map(
                |(script_id, filename, dj, content_type, timestamp, word_count, content)| {
                    Script {
                        metadata: ScriptMetadata {
                            script_id,
                            filename,
                            dj,
                            content_type,
                            timestamp: parse_stored_timestamp(&timestamp),
                            word_count,
                            extra: serde_json::Map::new(),
                        },
                        content,
                    }
                },
            )
            .collect();

        Ok((scripts, total))
    }

    fn record_review(
        &self,
        script_id: &str,
        decision: Decision,
        reason_id: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE scripts
             SET status = ?1, reason_id = ?2, comment = ?3, reviewed_at = datetime('now')
             WHERE script_id = ?4 AND status = 'pending'",
            params![decision.as_str(), reason_id, comment, script_id],
        )?;

        if updated == 0 {
            return Err(StoreError::Other(format!(
                "script not found or already reviewed: {script_id}"
            )));
        }
        info!(script_id, decision = decision.as_str(), "recorded review");
        Ok(())
    }

    fn tally(&self) -> Result<ReviewStats> {
        let conn = self.conn.lock().unwrap();
        let mut stats = ReviewStats::default();

        let mut stmt =
            conn.prepare("SELECT dj, status, COUNT(*) FROM scripts GROUP BY dj, status")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, usize>(2)?,
            ))
        })?;

        for row in rows {
            let (dj, status, count) = row?;
            let tally = stats.by_dj.entry(dj).or_insert_with(DjTally::default);
            match status.as_str() {
                "pending" => {
                    tally.pending = count;
                    stats.total_pending += count;
                }
                "approved" => {
                    tally.approved = count;
                    stats.total_approved += count;
                }
                "rejected" => {
                    tally.rejected = count;
                    stats.total_rejected += count;
                }
                _ => {}
            }
        }

        Ok(stats)
    }
}

#[async_trait]
impl ScriptStore for ScriptLibrary {
    async fn list_scripts(
        &self,
        filters: &ScriptFilters,
        page: u32,
        page_size: u32,
    ) -> Result<ScriptPage> {
        let (scripts, total_count) = self.query_scripts(filters, page, page_size)?;
        let total_pages = (total_count as u32).div_ceil(page_size.max(1));
        Ok(ScriptPage {
            scripts,
            total_count,
            total_pages,
            has_more: page * page_size < total_count as u32,
        })
    }

    async fn review_script(
        &self,
        script_id: &str,
        decision: Decision,
        reason_id: Option<&str>,
        comment: Option<&str>,
    ) -> Result<()> {
        self.record_review(script_id, decision, reason_id, comment)
    }

    async fn rejection_reasons(&self) -> Result<Vec<RejectionReason>> {
        Ok(default_reasons())
    }

    async fn stats(&self) -> Result<ReviewStats> {
        self.tally()
    }
}

/// Build a script from a file on disk.
///
/// Filenames follow `YYYY-MM-DD_HHMM_<dj>_<type>.txt`; the dj segment may
/// itself contain underscores, so the type is the last segment and the dj
/// falls out of the middle. Files that don't match keep their stem as the
/// id and inherit the folder's dj.
fn script_from_file(path: &Path, dj_folder: &str, content: String) -> Script {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let parts: Vec<&str> = stem.split('_').collect();
    let (timestamp, content_type) = if parts.len() >= 4 {
        let parsed = NaiveDateTime::parse_from_str(
            &format!("{} {}", parts[0], parts[1]),
            "%Y-%m-%d %H%M",
        )
        .map(|naive| naive.and_utc());
        (
            parsed.unwrap_or_else(|_| file_mtime(path)),
            parts[parts.len() - 1].to_string(),
        )
    } else {
        (file_mtime(path), "Unknown".to_string())
    };

    let word_count = content.split_whitespace().count();

    Script {
        metadata: ScriptMetadata {
            script_id: stem,
            filename,
            dj: dj_folder.to_string(),
            content_type,
            timestamp,
            word_count,
            extra: serde_json::Map::new(),
        },
        content,
    }
}

fn file_mtime(path: &Path) -> DateTime<Utc> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

fn parse_stored_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
