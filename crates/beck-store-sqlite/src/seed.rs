//! First-run creation of the backing file.

use std::path::Path;

use tracing::{debug, info};

use crate::{Error, Result, schema::SCHEMA};

/// What [`initialize`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seeded {
  /// The target already existed and was left untouched.
  AlreadyPresent,
  /// The target was copied from the bundled template.
  CopiedTemplate,
  /// No template was available; an empty database file was created.
  CreatedEmpty,
}

/// Make sure a database file exists at `target`.
///
/// If `target` is missing, copy `template` there when it exists, otherwise
/// create an empty store with the schema in place. An existing `target` is
/// never overwritten, so this is safe to call on every startup. A copied
/// template gets its schema checked later by
/// [`SqliteStore::open`](crate::SqliteStore::open).
pub async fn initialize(target: &Path, template: Option<&Path>) -> Result<Seeded> {
  let seed_err = |source| Error::Seed { path: target.to_path_buf(), source };

  if tokio::fs::try_exists(target).await.map_err(seed_err)? {
    debug!(path = %target.display(), "store already present");
    return Ok(Seeded::AlreadyPresent);
  }

  if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
    tokio::fs::create_dir_all(parent).await.map_err(seed_err)?;
  }

  if let Some(template) = template
    && tokio::fs::try_exists(template).await.map_err(seed_err)?
  {
    tokio::fs::copy(template, target).await.map_err(seed_err)?;
    info!(
      template = %template.display(),
      path = %target.display(),
      "store seeded from template"
    );
    return Ok(Seeded::CopiedTemplate);
  }

  let conn = tokio_rusqlite::Connection::open(target)
    .await
    .map_err(|source| Error::Open { path: target.to_path_buf(), source })?;
  conn
    .call(|conn| {
      conn.execute_batch(&SCHEMA)?;
      Ok(())
    })
    .await?;
  conn.close().await?;
  info!(path = %target.display(), "created empty store");
  Ok(Seeded::CreatedEmpty)
}
