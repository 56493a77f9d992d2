//! SQL for the Beck SQLite store.
//!
//! Every statement that names columns is generated from
//! [`Field::ALL`](beck_core::observation::Field::ALL), so the table layout,
//! the insert binding order and the select order are the same list.

use std::sync::LazyLock;

use beck_core::{item::ItemScore, observation::Field};

pub const TABLE: &str = "assessments";

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub static SCHEMA: LazyLock<String> = LazyLock::new(|| {
  let columns: Vec<String> = Field::ALL.iter().map(|f| column_def(*f)).collect();
  format!(
    "
PRAGMA journal_mode = WAL;

-- Rows are never updated; only inserted and deleted.
CREATE TABLE IF NOT EXISTS {TABLE} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    {columns}
);

CREATE INDEX IF NOT EXISTS {TABLE}_date_idx ON {TABLE}(date, time);

PRAGMA user_version = 1;
",
    columns = columns.join(",\n    "),
  )
});

/// `INSERT` with one positional placeholder per field.
pub static INSERT: LazyLock<String> = LazyLock::new(|| {
  let placeholders: Vec<String> =
    (1..=Field::ALL.len()).map(|i| format!("?{i}")).collect();
  format!(
    "INSERT INTO {TABLE} ({}) VALUES ({})",
    column_list(),
    placeholders.join(", "),
  )
});

/// `SELECT` prefix returning `id` followed by every field in order.
pub static SELECT: LazyLock<String> =
  LazyLock::new(|| format!("SELECT id, {} FROM {TABLE}", column_list()));

fn column_list() -> String {
  Field::ALL
    .iter()
    .map(|f| f.column())
    .collect::<Vec<_>>()
    .join(", ")
}

fn column_def(field: Field) -> String {
  let column = field.column();
  match field {
    Field::Item(_) => format!(
      "{column} {} NOT NULL CHECK ({column} BETWEEN {} AND {})",
      field.sql_type(),
      ItemScore::ZERO,
      ItemScore::MAX,
    ),
    _ => format!("{column} {} NOT NULL", field.sql_type()),
  }
}

/// `?, ?, …` for a dynamic `IN` list.
pub fn placeholders(n: usize) -> String { vec!["?"; n].join(", ") }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn insert_has_one_placeholder_per_field() {
    assert_eq!(INSERT.matches('?').count(), 24);
    assert!(INSERT.contains("(date, time, item_1, item_2,"));
    assert!(INSERT.contains("item_21, summary)"));
  }

  #[test]
  fn schema_declares_columns_in_order() {
    let date = SCHEMA.find("date TEXT").unwrap();
    let time = SCHEMA.find("time TEXT").unwrap();
    let first = SCHEMA.find("item_1 INTEGER").unwrap();
    let last = SCHEMA.find("item_21 INTEGER").unwrap();
    let summary = SCHEMA.find("summary INTEGER").unwrap();
    assert!(date < time && time < first && first < last && last < summary);
    assert!(SCHEMA.contains("CHECK (item_7 BETWEEN 0 AND 3)"));
  }

  #[test]
  fn in_list_placeholders() {
    assert_eq!(placeholders(1), "?");
    assert_eq!(placeholders(3), "?, ?, ?");
  }
}
