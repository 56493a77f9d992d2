//! The capture-commit-reset cycle.
//!
//! [`Capture`] reads one observation from an [`InputSurface`], computes its
//! composite, hands the values to an [`AssessmentStore`], and resets the input
//! surface to the baseline only after the insert succeeded. A failed insert
//! leaves the surface exactly as it was so unsaved entries are not lost.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
  item::{Item, ItemScore},
  observation::{FIELD_COUNT, Field, FieldValue, Observation},
  score,
  store::AssessmentStore,
};

// ─── Surfaces ────────────────────────────────────────────────────────────────

/// A single input field could not be read.
#[derive(Debug, Clone, Error)]
#[error("could not read {field}: {reason}")]
pub struct FieldReadError {
  pub field:  Field,
  pub reason: String,
}

impl FieldReadError {
  pub fn new(field: Field, reason: impl Into<String>) -> Self {
    Self { field, reason: reason.into() }
  }
}

/// Whatever the user enters an observation into.
///
/// Each read is independent; a failing read only loses that one field.
pub trait InputSurface {
  fn read_date(&self) -> Result<NaiveDate, FieldReadError>;
  fn read_time(&self) -> Result<NaiveTime, FieldReadError>;
  fn read_item(&self, item: Item) -> Result<ItemScore, FieldReadError>;

  /// Replace every field with the values in `baseline`.
  fn reset(&mut self, baseline: &Observation);
}

/// Whatever shows committed records. Told to re-query after every change.
pub trait DisplaySurface {
  fn refresh(&mut self);
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// The values collected from one pass over the input surface.
#[derive(Debug, Clone, Default)]
pub struct CaptureReport {
  /// Successfully read values in field order, with the composite last.
  pub values:   Vec<FieldValue>,
  /// Fields that could not be read and were left out of `values`.
  pub failures: Vec<FieldReadError>,
  pub summary:  i64,
}

impl CaptureReport {
  pub fn is_complete(&self) -> bool {
    self.failures.is_empty() && self.values.len() == FIELD_COUNT
  }
}

/// A committed observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Committed {
  pub id:      i64,
  pub summary: i64,
}

#[derive(Debug, Error)]
pub enum CaptureError<E: std::error::Error + 'static> {
  /// The store refused the row. Nothing was persisted and the input surface
  /// was not reset.
  #[error("observation was not saved ({} unreadable field(s)): {source}", .unread.len())]
  Rejected {
    #[source]
    source: E,
    unread: Vec<Field>,
  },
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// Coordinates one observation's path from input surface to durable record.
///
/// Owns the store handle for its lifetime; `&mut self` on [`capture`]
/// guarantees a capture runs to completion before another may start.
///
/// [`capture`]: Capture::capture
pub struct Capture<S> {
  store: S,
  clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime { chrono::Local::now().naive_local() }

impl<S: AssessmentStore> Capture<S> {
  pub fn new(store: S) -> Self { Self { store, clock: local_now } }

  /// Use `clock` for the baseline date and time written on reset.
  pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
    self.clock = clock;
    self
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn into_store(self) -> S { self.store }

  /// The observation a freshly reset input surface should show.
  pub fn baseline(&self) -> Observation { Observation::baseline((self.clock)()) }

  /// Read, insert, and on success reset `input` and refresh `display`.
  pub async fn capture<I, D>(
    &mut self,
    input: &mut I,
    display: &mut D,
  ) -> Result<Committed, CaptureError<S::Error>>
  where
    I: InputSurface,
    D: DisplaySurface,
  {
    let report = read_fields(&*input);
    let unread: Vec<Field> = report.failures.iter().map(|f| f.field).collect();
    let summary = report.summary;

    let id = match self.store.insert(report.values).await {
      Ok(id) => id,
      Err(source) => {
        error!(error = %source, unread = unread.len(), "observation not saved");
        return Err(CaptureError::Rejected { source, unread });
      }
    };

    info!(id, summary, "observation saved");
    input.reset(&self.baseline());
    display.refresh();
    Ok(Committed { id, summary })
  }

  /// Delete the selected records and refresh `display`.
  ///
  /// A store failure is logged and reported as zero rows removed; the display
  /// is refreshed either way so it shows whatever actually remains.
  pub async fn delete_selected<D>(&mut self, ids: &BTreeSet<i64>, display: &mut D) -> usize
  where
    D: DisplaySurface,
  {
    let removed = match self.store.delete_by_ids(ids).await {
      Ok(n) => {
        info!(requested = ids.len(), removed = n, "records deleted");
        n
      }
      Err(e) => {
        error!(error = %e, requested = ids.len(), "delete failed");
        0
      }
    };
    display.refresh();
    removed
  }
}

/// Read every input field independently, then append the composite of the
/// items that were read.
pub fn read_fields<I: InputSurface + ?Sized>(input: &I) -> CaptureReport {
  let mut report = CaptureReport {
    values: Vec::with_capacity(FIELD_COUNT),
    ..Default::default()
  };
  let mut scores = Vec::with_capacity(Item::ALL.len());

  for field in Field::ALL {
    let read = match field {
      Field::Date => input.read_date().map(FieldValue::from),
      Field::Time => input.read_time().map(FieldValue::from),
      Field::Item(item) => input.read_item(item).map(|s| {
        scores.push(s);
        FieldValue::from(s)
      }),
      Field::Summary => continue,
    };
    match read {
      Ok(value) => {
        debug!(%field, ?value, "field read");
        report.values.push(value);
      }
      Err(e) => {
        warn!(%field, error = %e.reason, "field read failed; omitting");
        report.failures.push(e);
      }
    }
  }

  report.summary = score::composite(&scores);
  report.values.push(FieldValue::Integer(report.summary));
  report
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::{
    observation::{AssessmentRecord, parse_date, parse_time},
    store::RecordOrder,
  };

  // ── Fakes ─────────────────────────────────────────────────────────────────

  #[derive(Debug, Error)]
  enum FakeError {
    #[error("expected {expected} values, got {actual}")]
    Mismatch { expected: usize, actual: usize },
    #[error("disk full")]
    WriteFailed,
  }

  #[derive(Default)]
  struct FakeStore {
    rows:        Mutex<Vec<(i64, Vec<FieldValue>)>>,
    fail_writes: bool,
  }

  impl AssessmentStore for FakeStore {
    type Error = FakeError;

    async fn insert(&self, values: Vec<FieldValue>) -> Result<i64, FakeError> {
      if values.len() != FIELD_COUNT {
        return Err(FakeError::Mismatch {
          expected: FIELD_COUNT,
          actual:   values.len(),
        });
      }
      if self.fail_writes {
        return Err(FakeError::WriteFailed);
      }
      let mut rows = self.rows.lock().unwrap();
      let id = rows.last().map_or(1, |(id, _)| id + 1);
      rows.push((id, values));
      Ok(id)
    }

    async fn delete_by_ids(&self, ids: &BTreeSet<i64>) -> Result<usize, FakeError> {
      if self.fail_writes {
        return Err(FakeError::WriteFailed);
      }
      let mut rows = self.rows.lock().unwrap();
      let before = rows.len();
      rows.retain(|(id, _)| !ids.contains(id));
      Ok(before - rows.len())
    }

    async fn get(&self, _id: i64) -> Result<Option<AssessmentRecord>, FakeError> {
      Ok(None)
    }

    async fn list(&self, _order: RecordOrder) -> Result<Vec<AssessmentRecord>, FakeError> {
      Ok(Vec::new())
    }
  }

  #[derive(Debug, Clone, PartialEq)]
  struct Form {
    observation: Observation,
    broken:      Option<Field>,
  }

  impl Form {
    fn filled() -> Self {
      let mut observation = Observation {
        date:  parse_date("2024-02-29").unwrap(),
        time:  parse_time("21:15:00").unwrap(),
        items: [ItemScore::ZERO; Item::ALL.len()],
      };
      observation.set_item(Item::Sadness, ItemScore::new(1).unwrap());
      observation.set_item(Item::Crying, ItemScore::new(2).unwrap());
      observation.set_item(Item::Fatigue, ItemScore::MAX);
      Self { observation, broken: None }
    }

    fn check(&self, field: Field) -> Result<(), FieldReadError> {
      if self.broken == Some(field) {
        return Err(FieldReadError::new(field, "widget detached"));
      }
      Ok(())
    }
  }

  impl InputSurface for Form {
    fn read_date(&self) -> Result<NaiveDate, FieldReadError> {
      self.check(Field::Date)?;
      Ok(self.observation.date)
    }

    fn read_time(&self) -> Result<NaiveTime, FieldReadError> {
      self.check(Field::Time)?;
      Ok(self.observation.time)
    }

    fn read_item(&self, item: Item) -> Result<ItemScore, FieldReadError> {
      self.check(Field::Item(item))?;
      Ok(self.observation.item(item))
    }

    fn reset(&mut self, baseline: &Observation) {
      self.observation = baseline.clone();
    }
  }

  #[derive(Default)]
  struct Table {
    refreshes: usize,
  }

  impl DisplaySurface for Table {
    fn refresh(&mut self) { self.refreshes += 1; }
  }

  fn fixed_now() -> NaiveDateTime {
    parse_date("2025-01-01")
      .unwrap()
      .and_time(parse_time("08:00:00").unwrap())
  }

  // ── Tests ─────────────────────────────────────────────────────────────────

  #[test]
  fn read_fields_collects_all_values_with_composite_last() {
    let report = read_fields(&Form::filled());
    assert!(report.is_complete());
    assert_eq!(report.values.len(), FIELD_COUNT);
    assert_eq!(report.summary, 6);
    assert_eq!(report.values.last(), Some(&FieldValue::Integer(6)));
    assert_eq!(report.values[0], FieldValue::Text("2024-02-29".into()));
    assert_eq!(report.values[1], FieldValue::Text("21:15:00".into()));
  }

  #[tokio::test]
  async fn successful_capture_resets_and_refreshes() {
    let mut capture = Capture::new(FakeStore::default()).with_clock(fixed_now);
    let mut form = Form::filled();
    let mut table = Table::default();

    let committed = capture.capture(&mut form, &mut table).await.unwrap();
    assert_eq!(committed, Committed { id: 1, summary: 6 });

    assert_eq!(form.observation, Observation::baseline(fixed_now()));
    assert_eq!(table.refreshes, 1);

    let rows = capture.store().rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].1, Form::filled().observation.to_values());
  }

  #[tokio::test]
  async fn failed_write_leaves_form_untouched() {
    let store = FakeStore { fail_writes: true, ..Default::default() };
    let mut capture = Capture::new(store).with_clock(fixed_now);
    let mut form = Form::filled();
    let before = form.clone();
    let mut table = Table::default();

    let err = capture.capture(&mut form, &mut table).await.unwrap_err();
    let CaptureError::Rejected { source, unread } = err;
    assert!(matches!(source, FakeError::WriteFailed));
    assert!(unread.is_empty());

    assert_eq!(form, before);
    assert_eq!(table.refreshes, 0);
  }

  #[tokio::test]
  async fn unreadable_field_is_omitted_and_insert_rejected() {
    let mut capture = Capture::new(FakeStore::default()).with_clock(fixed_now);
    let mut form = Form::filled();
    form.broken = Some(Field::Item(Item::Agitation));
    let before = form.clone();
    let mut table = Table::default();

    let report = read_fields(&form);
    assert_eq!(report.values.len(), FIELD_COUNT - 1);
    assert_eq!(report.failures.len(), 1);

    let err = capture.capture(&mut form, &mut table).await.unwrap_err();
    let CaptureError::Rejected { source, unread } = err;
    assert!(matches!(source, FakeError::Mismatch { expected: 24, actual: 23 }));
    assert_eq!(unread, vec![Field::Item(Item::Agitation)]);

    assert_eq!(form, before);
    assert_eq!(table.refreshes, 0);
    assert!(capture.store().rows.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn unreadable_date_also_rejected() {
    let mut capture = Capture::new(FakeStore::default());
    let mut form = Form::filled();
    form.broken = Some(Field::Date);
    let mut table = Table::default();

    let err = capture.capture(&mut form, &mut table).await.unwrap_err();
    assert!(err.to_string().contains("1 unreadable field"));
    assert!(form.observation.date == parse_date("2024-02-29").unwrap());
  }

  #[tokio::test]
  async fn delete_reports_only_existing_rows() {
    let mut capture = Capture::new(FakeStore::default()).with_clock(fixed_now);
    let mut table = Table::default();
    for _ in 0..3 {
      capture.capture(&mut Form::filled(), &mut table).await.unwrap();
    }

    let ids = BTreeSet::from([2, 3, 99]);
    let removed = capture.delete_selected(&ids, &mut table).await;
    assert_eq!(removed, 2);
    assert_eq!(table.refreshes, 4);
  }

  #[tokio::test]
  async fn failed_delete_reports_zero_and_still_refreshes() {
    let store = FakeStore { fail_writes: true, ..Default::default() };
    let mut capture = Capture::new(store);
    let mut table = Table::default();

    let removed = capture.delete_selected(&BTreeSet::from([1]), &mut table).await;
    assert_eq!(removed, 0);
    assert_eq!(table.refreshes, 1);
  }
}
