//! Rendering of stored records, and the [`DisplaySurface`] that re-queries
//! the store whenever the capture layer reports a change.

use beck_core::{
  capture::DisplaySurface,
  item::Item,
  observation::AssessmentRecord,
  store::{AssessmentStore, RecordOrder},
};

/// A view over the store that redraws itself after inserts and deletes.
pub struct TableView {
  pub order: RecordOrder,
  pub limit: Option<usize>,
  pub json:  bool,
  stale:     bool,
}

impl TableView {
  pub fn new(order: RecordOrder, limit: Option<usize>, json: bool) -> Self {
    Self { order, limit, json, stale: false }
  }

  pub fn is_stale(&self) -> bool { self.stale }

  /// Re-query and print if a change was signalled since the last draw.
  pub async fn redraw_if_stale<S>(&mut self, store: &S) -> anyhow::Result<()>
  where
    S: AssessmentStore,
  {
    if self.is_stale() {
      self.draw(store).await?;
    }
    Ok(())
  }

  pub async fn draw<S>(&mut self, store: &S) -> anyhow::Result<()>
  where
    S: AssessmentStore,
  {
    let mut records = store.list(self.order).await?;
    if let Some(limit) = self.limit {
      records.truncate(limit);
    }
    self.stale = false;
    if self.json {
      println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
      print!("{}", render_table(&records));
    }
    Ok(())
  }
}

impl DisplaySurface for TableView {
  fn refresh(&mut self) { self.stale = true; }
}

/// One line per record: id, date, time, the 21 scores in order, summary.
pub fn render_table(records: &[AssessmentRecord]) -> String {
  let mut out = String::new();
  let numbers: Vec<String> = Item::ALL.iter().map(|i| format!("{:>2}", i.number())).collect();
  out.push_str(&format!(
    "{:>5}  {:<10}  {:<8}  {}  {:>3}\n",
    "ID",
    "DATE",
    "TIME",
    numbers.join(" "),
    "SUM"
  ));
  for r in records {
    let scores: Vec<String> = r.items.iter().map(|s| format!("{s:>2}")).collect();
    out.push_str(&format!(
      "{:>5}  {:<10}  {:<8}  {}  {:>3}\n",
      r.id,
      r.date,
      r.time.format("%H:%M:%S"),
      scores.join(" "),
      r.summary
    ));
  }
  if records.is_empty() {
    out.push_str("(no records)\n");
  }
  out
}

/// Every item with its label, for a single record.
pub fn render_record(r: &AssessmentRecord) -> String {
  let mut out = format!("#{}  {} {}\n", r.id, r.date, r.time.format("%H:%M:%S"));
  for item in Item::ALL {
    out.push_str(&format!(
      "{:>2}. {:<26} {}\n",
      item.number(),
      item.label(),
      r.item(item)
    ));
  }
  out.push_str(&format!("summary: {}\n", r.summary));
  out
}

#[cfg(test)]
mod tests {
  use beck_core::{
    item::{ITEM_COUNT, scores_from_slice},
    observation::{parse_date, parse_time},
  };

  use super::*;

  fn record(id: i64) -> AssessmentRecord {
    let mut raw = [0; ITEM_COUNT];
    raw[20] = 3;
    AssessmentRecord {
      id,
      date: parse_date("2024-08-09").unwrap(),
      time: parse_time("10:11:12").unwrap(),
      items: scores_from_slice(&raw).unwrap(),
      summary: 3,
    }
  }

  #[test]
  fn table_has_header_and_one_line_per_record() {
    let text = render_table(&[record(1), record(2)]);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("ID") && lines[0].ends_with("SUM"));
    assert!(lines[1].contains("2024-08-09  10:11:12"));
    assert!(lines[1].ends_with(" 3    3"));
  }

  #[test]
  fn empty_table_says_so() {
    assert!(render_table(&[]).contains("(no records)"));
  }

  #[test]
  fn record_view_labels_items() {
    let text = render_record(&record(7));
    assert!(text.starts_with("#7  2024-08-09 10:11:12"));
    assert!(text.contains("21. Loss of interest in sex"));
    assert!(text.ends_with("summary: 3\n"));
  }

  #[test]
  fn refresh_marks_view_stale() {
    let mut view = TableView::new(RecordOrder::default(), None, false);
    assert!(!view.is_stale());
    view.refresh();
    assert!(view.is_stale());
  }
}
