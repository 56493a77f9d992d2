//! Observations, persisted records, and the ordered field list they share.
//!
//! [`Field::ALL`] is the one place the column order is declared. Schema
//! creation, insert binding and capture all iterate it, so the three cannot
//! drift apart.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  item::{ITEM_COUNT, Item, ItemScore},
  score,
};

/// `yyyy-MM-dd`
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// `hh:mm:ss`, 24-hour clock.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Number of bound values in one stored row (everything except `id`).
pub const FIELD_COUNT: usize = ITEM_COUNT + 3;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| Error::Date(s.to_owned()))
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|_| Error::Time(s.to_owned()))
}

// ─── Field ───────────────────────────────────────────────────────────────────

/// One user-visible column of an assessment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
  Date,
  Time,
  Item(Item),
  /// The derived composite. Never read from the input surface.
  Summary,
}

impl Field {
  /// Every field in declared column order: date, time, the 21 items, summary.
  pub const ALL: [Field; FIELD_COUNT] = {
    let mut all = [Field::Date; FIELD_COUNT];
    all[1] = Field::Time;
    let mut i = 0;
    while i < ITEM_COUNT {
      all[i + 2] = Field::Item(Item::ALL[i]);
      i += 1;
    }
    all[FIELD_COUNT - 1] = Field::Summary;
    all
  };

  pub fn column(self) -> String {
    match self {
      Field::Date => "date".to_owned(),
      Field::Time => "time".to_owned(),
      Field::Item(item) => item.column(),
      Field::Summary => "summary".to_owned(),
    }
  }

  /// SQL type affinity of the backing column.
  pub fn sql_type(self) -> &'static str {
    match self {
      Field::Date | Field::Time => "TEXT",
      Field::Item(_) | Field::Summary => "INTEGER",
    }
  }
}

impl std::fmt::Display for Field {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Field::Item(item) => write!(f, "{} ({})", item.column(), item),
      other => f.write_str(&other.column()),
    }
  }
}

// ─── FieldValue ──────────────────────────────────────────────────────────────

/// A single positional value bound into the insert statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
  Text(String),
  Integer(i64),
}

impl From<NaiveDate> for FieldValue {
  fn from(d: NaiveDate) -> Self { Self::Text(d.format(DATE_FORMAT).to_string()) }
}

impl From<NaiveTime> for FieldValue {
  fn from(t: NaiveTime) -> Self { Self::Text(t.format(TIME_FORMAT).to_string()) }
}

impl From<ItemScore> for FieldValue {
  fn from(s: ItemScore) -> Self { Self::Integer(s.into()) }
}

impl From<i64> for FieldValue {
  fn from(v: i64) -> Self { Self::Integer(v) }
}

// ─── Observation ─────────────────────────────────────────────────────────────

/// One set of item scores plus date and time, prior to commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
  pub date:  NaiveDate,
  pub time:  NaiveTime,
  pub items: [ItemScore; ITEM_COUNT],
}

impl Observation {
  /// The reset state: date and time set to `now`, every item at zero.
  pub fn baseline(now: NaiveDateTime) -> Self {
    Self {
      date:  now.date(),
      time:  truncate_to_seconds(now.time()),
      items: [ItemScore::ZERO; ITEM_COUNT],
    }
  }

  pub fn item(&self, item: Item) -> ItemScore { self.items[item.index()] }

  pub fn set_item(&mut self, item: Item, score: ItemScore) {
    self.items[item.index()] = score;
  }

  /// Composite of the current items; recomputed on every call.
  pub fn summary(&self) -> i64 { score::composite(&self.items) }

  /// The value this observation binds for `field`.
  pub fn value_of(&self, field: Field) -> FieldValue {
    match field {
      Field::Date => self.date.into(),
      Field::Time => self.time.into(),
      Field::Item(item) => self.item(item).into(),
      Field::Summary => self.summary().into(),
    }
  }

  /// All [`FIELD_COUNT`] values in declared column order.
  pub fn to_values(&self) -> Vec<FieldValue> {
    Field::ALL.iter().map(|f| self.value_of(*f)).collect()
  }
}

/// Stored times carry whole seconds only.
fn truncate_to_seconds(t: NaiveTime) -> NaiveTime {
  use chrono::Timelike as _;
  t.with_nanosecond(0).unwrap_or(t)
}

// ─── AssessmentRecord ────────────────────────────────────────────────────────

/// A persisted observation. Never updated in place; only ever deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
  /// Store-assigned; monotonically increasing and never reused.
  pub id:      i64,
  pub date:    NaiveDate,
  pub time:    NaiveTime,
  pub items:   [ItemScore; ITEM_COUNT],
  /// Composite as written at commit time. Not recomputed on read.
  pub summary: i64,
}

impl AssessmentRecord {
  pub fn item(&self, item: Item) -> ItemScore { self.items[item.index()] }
}
