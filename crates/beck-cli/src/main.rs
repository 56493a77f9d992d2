//! `beck` — record and review self-assessment entries from the terminal.
//!
//! # Usage
//!
//! ```text
//! beck add --scores 0,1,2,3,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,3
//! beck add --set sadness=2 --set 16=1 --date 2024-05-01 --time 21:00:00
//! beck list --limit 10
//! beck delete 4 7
//! ```

mod config;
mod form;
mod table;

use std::{collections::BTreeSet, path::PathBuf};

use anyhow::{Context as _, Result};
use beck_core::{
  capture::Capture,
  item::Item,
  store::{AssessmentStore, RecordOrder},
};
use beck_store_sqlite::{Seeded, SqliteStore, initialize};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{config::Settings, form::Form, table::TableView};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "beck", version, about = "Personal self-assessment log")]
struct Cli {
  /// Path to a TOML config file (store_path, template_path).
  #[arg(short, long, value_name = "FILE", env = "BECK_CONFIG")]
  config: Option<PathBuf>,

  /// Database file to use instead of the configured one.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create the store if it is missing and report what happened.
  Init,

  /// Record a new assessment. Unset items default to 0; date and time
  /// default to now.
  Add {
    /// All 21 scores in item order, comma-separated.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    scores: Option<Vec<i64>>,

    /// Set one item, by name or number: `sleep_changes=2`, `16=2`.
    #[arg(long = "set", value_name = "ITEM=SCORE", value_parser = form::parse_assignment)]
    set: Vec<(Item, i64)>,

    /// yyyy-MM-dd
    #[arg(long)]
    date: Option<String>,

    /// hh:mm:ss
    #[arg(long)]
    time: Option<String>,
  },

  /// Show stored assessments.
  List {
    #[arg(long, value_enum, default_value_t = Order::Date)]
    order: Order,

    #[arg(long)]
    limit: Option<usize>,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
  },

  /// Show one assessment with item labels.
  Show {
    id: i64,

    #[arg(long)]
    json: bool,
  },

  /// Delete assessments by id.
  Delete {
    #[arg(required = true)]
    ids: Vec<i64>,
  },

  /// List the 21 items with their numbers and names.
  Items,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Order {
  /// Most recent date first.
  Date,
  /// Oldest entry first.
  Inserted,
}

impl From<Order> for RecordOrder {
  fn from(o: Order) -> Self {
    match o {
      Order::Date => RecordOrder::DateDescending,
      Order::Inserted => RecordOrder::Inserted,
    }
  }
}

/// Rows shown after an add or delete.
const RECENT_ROWS: usize = 10;

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  if let Command::Items = cli.command {
    print_items();
    return Ok(());
  }

  let settings = Settings::load(cli.config.as_deref(), cli.store)?;

  let seeded = initialize(&settings.store_path, Some(&settings.template_path))
    .await
    .with_context(|| format!("failed to create store at {}", settings.store_path.display()))?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {}", settings.store_path.display()))?;

  let mut capture = Capture::new(store);
  let result = run(cli.command, &mut capture, seeded).await;

  // Close the store regardless of the command's outcome.
  let mut store = capture.into_store();
  store.close().await.context("failed to close store")?;

  result
}

fn print_items() {
  for item in Item::ALL {
    println!("{:>2}  {:<26} {}", item.number(), item.label(), item);
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn run(command: Command, capture: &mut Capture<SqliteStore>, seeded: Seeded) -> Result<()> {
  match command {
    Command::Init => {
      let count = capture.store().list(RecordOrder::Inserted).await?.len();
      let how = match seeded {
        Seeded::AlreadyPresent => "already present",
        Seeded::CopiedTemplate => "copied from template",
        Seeded::CreatedEmpty => "created empty",
      };
      println!("store {how} ({count} record(s))");
    }

    Command::Items => print_items(),

    Command::Add { scores, set, date, time } => {
      let mut form = Form::new(&capture.baseline());
      if let Some(scores) = scores {
        form.set_all(&scores)?;
      }
      for (item, value) in set {
        form.set(item, value);
      }
      if let Some(date) = date {
        form.date = date;
      }
      if let Some(time) = time {
        form.time = time;
      }

      let mut view = TableView::new(RecordOrder::DateDescending, Some(RECENT_ROWS), false);
      match capture.capture(&mut form, &mut view).await {
        Ok(committed) => {
          println!("saved #{} (summary {})", committed.id, committed.summary);
          view.redraw_if_stale(capture.store()).await?;
        }
        Err(e) => {
          eprintln!("not saved; your entry was:\n{}", form.render());
          return Err(e.into());
        }
      }
    }

    Command::List { order, limit, json } => {
      TableView::new(order.into(), limit, json)
        .draw(capture.store())
        .await?;
    }

    Command::Show { id, json } => {
      let record = capture
        .store()
        .get(id)
        .await?
        .with_context(|| format!("no assessment with id {id}"))?;
      if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
      } else {
        print!("{}", table::render_record(&record));
      }
    }

    Command::Delete { ids } => {
      let ids: BTreeSet<i64> = ids.into_iter().collect();
      let mut view = TableView::new(RecordOrder::DateDescending, Some(RECENT_ROWS), false);
      let removed = capture.delete_selected(&ids, &mut view).await;
      println!("deleted {removed} of {} requested", ids.len());
      view.redraw_if_stale(capture.store()).await?;
    }
  }
  Ok(())
}
