//! [`SqliteStore`] — the SQLite implementation of [`AssessmentStore`].

use std::{collections::BTreeSet, path::Path};

use rusqlite::OptionalExtension as _;
use tracing::{debug, error};

use beck_core::{
  observation::{AssessmentRecord, FieldValue},
  store::{AssessmentStore, RecordOrder},
};

use crate::{
  Error, Result,
  encode::{RawRecord, encode_value},
  schema::{INSERT, SCHEMA, SELECT, TABLE, placeholders},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Ids bound per `DELETE` statement, well under SQLite's variable limit.
const DELETE_CHUNK: usize = 500;

/// An assessment log backed by a single SQLite file.
///
/// Open it once at startup and [`close`](Self::close) it once at shutdown.
pub struct SqliteStore {
  conn: Option<tokio_rusqlite::Connection>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and ensure the schema exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(|source| open_failed(path, source))?;
    let store = Self { conn: Some(conn) };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(|source| open_failed(Path::new(":memory:"), source))?;
    let store = Self { conn: Some(conn) };
    store.ensure_schema().await?;
    Ok(store)
  }

  /// Create the assessment table if it is missing. Safe to call at any time.
  pub async fn ensure_schema(&self) -> Result<()> {
    self
      .conn()?
      .call(|conn| {
        conn.execute_batch(&SCHEMA)?;
        Ok(())
      })
      .await?;
    debug!(table = TABLE, "schema ensured");
    Ok(())
  }

  /// Release the connection. Calling this on a closed store does nothing.
  pub async fn close(&mut self) -> Result<()> {
    if let Some(conn) = self.conn.take() {
      conn.close().await?;
      debug!("store closed");
    }
    Ok(())
  }

  pub fn is_closed(&self) -> bool { self.conn.is_none() }

  pub(crate) fn conn(&self) -> Result<&tokio_rusqlite::Connection> {
    self.conn.as_ref().ok_or(Error::Closed)
  }

  async fn select(&self, clause: &'static str) -> Result<Vec<AssessmentRecord>> {
    let raws: Vec<RawRecord> = self
      .conn()?
      .call(move |conn| {
        let sql = format!("{} {clause}", *SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }
}

pub(crate) fn open_failed(path: &Path, source: tokio_rusqlite::Error) -> Error {
  error!(path = %path.display(), error = %source, "could not open store");
  Error::Open { path: path.to_path_buf(), source }
}

// ─── AssessmentStore impl ────────────────────────────────────────────────────

impl AssessmentStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, values: Vec<FieldValue>) -> Result<i64> {
    let actual = values.len();
    let params: Vec<rusqlite::types::Value> = values.into_iter().map(encode_value).collect();

    let outcome = self
      .conn()?
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&INSERT)?;
        let expected = stmt.parameter_count();
        if expected != actual {
          return Ok(Err(expected));
        }
        Ok(Ok(stmt.insert(rusqlite::params_from_iter(params))?))
      })
      .await
      .inspect_err(|e| error!(error = %e, "insert failed"))?;

    outcome.map_err(|expected| {
      error!(expected, actual, "insert rejected: bound value count does not match");
      Error::SchemaMismatch { expected, actual }
    })
  }

  async fn delete_by_ids(&self, ids: &BTreeSet<i64>) -> Result<usize> {
    if ids.is_empty() {
      return Ok(0);
    }
    let ids: Vec<i64> = ids.iter().copied().collect();

    let removed = self
      .conn()?
      .call(move |conn| {
        // All chunks commit together or not at all.
        let tx = conn.transaction()?;
        let mut removed = 0;
        for chunk in ids.chunks(DELETE_CHUNK) {
          let sql = format!("DELETE FROM {TABLE} WHERE id IN ({})", placeholders(chunk.len()));
          removed += tx.execute(&sql, rusqlite::params_from_iter(chunk.iter()))?;
        }
        tx.commit()?;
        Ok(removed)
      })
      .await
      .inspect_err(|e| error!(error = %e, "delete failed"))?;

    Ok(removed)
  }

  async fn get(&self, id: i64) -> Result<Option<AssessmentRecord>> {
    let raw: Option<RawRecord> = self
      .conn()?
      .call(move |conn| {
        let sql = format!("{} WHERE id = ?1", *SELECT);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id], RawRecord::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn list(&self, order: RecordOrder) -> Result<Vec<AssessmentRecord>> {
    let clause = match order {
      RecordOrder::DateDescending => "ORDER BY date DESC, time DESC, id DESC",
      RecordOrder::Inserted => "ORDER BY id ASC",
    };
    self.select(clause).await
  }
}
