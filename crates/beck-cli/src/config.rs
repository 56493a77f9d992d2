//! Layered settings: defaults, then an optional TOML file, then `BECK_*`
//! environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "~/beck.db";
pub const DEFAULT_TEMPLATE_PATH: &str = "beck.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Where the assessment log lives.
  pub store_path:    PathBuf,
  /// Pre-seeded database copied into place on first run, if present.
  pub template_path: PathBuf,
}

impl Settings {
  pub fn load(file: Option<&Path>, store_override: Option<PathBuf>) -> anyhow::Result<Self> {
    let mut builder = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .set_default("template_path", DEFAULT_TEMPLATE_PATH)?;
    if let Some(file) = file {
      builder = builder.add_source(config::File::from(file.to_path_buf()).required(true));
    }
    let settings = builder
      .add_source(config::Environment::with_prefix("BECK"))
      .build()
      .context("failed to read configuration")?;

    let mut cfg: Settings = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;

    if let Some(path) = store_override {
      cfg.store_path = path;
    }
    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.template_path = expand_tilde(&cfg.template_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
