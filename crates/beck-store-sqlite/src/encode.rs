//! Conversions between domain types and SQLite column values.
//!
//! Dates are stored as `yyyy-MM-dd` text, times as `hh:mm:ss` text, and item
//! scores and the composite as plain integers.

use beck_core::{
  item::{ITEM_COUNT, scores_from_slice},
  observation::{AssessmentRecord, FieldValue, parse_date, parse_time},
};
use rusqlite::types::Value;

use crate::Result;

pub fn encode_value(v: FieldValue) -> Value {
  match v {
    FieldValue::Text(s) => Value::Text(s),
    FieldValue::Integer(i) => Value::Integer(i),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `assessments` row.
pub struct RawRecord {
  pub id:      i64,
  pub date:    String,
  pub time:    String,
  pub items:   Vec<i64>,
  pub summary: i64,
}

impl RawRecord {
  /// Read a row produced by [`SELECT`](crate::schema::SELECT).
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let items = (0..ITEM_COUNT)
      .map(|i| row.get(i + 3))
      .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(Self {
      id: row.get(0)?,
      date: row.get(1)?,
      time: row.get(2)?,
      items,
      summary: row.get(ITEM_COUNT + 3)?,
    })
  }

  pub fn into_record(self) -> Result<AssessmentRecord> {
    Ok(AssessmentRecord {
      id:      self.id,
      date:    parse_date(&self.date)?,
      time:    parse_time(&self.time)?,
      items:   scores_from_slice(&self.items)?,
      summary: self.summary,
    })
  }
}
