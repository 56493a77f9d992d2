//! The command-line entry form: an [`InputSurface`] filled from flags.
//!
//! Values are kept as the user typed them and only validated when read, so a
//! malformed field surfaces as a [`FieldReadError`] for that field alone.

use beck_core::{
  capture::{FieldReadError, InputSurface},
  item::{ITEM_COUNT, Item, ItemScore},
  observation::{DATE_FORMAT, Field, Observation, TIME_FORMAT, parse_date, parse_time},
  score,
};
use chrono::{NaiveDate, NaiveTime};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
  pub date:  String,
  pub time:  String,
  pub items: [i64; ITEM_COUNT],
}

impl Form {
  /// A form showing `baseline`, as after a reset.
  pub fn new(baseline: &Observation) -> Self {
    let mut form = Self {
      date:  String::new(),
      time:  String::new(),
      items: [0; ITEM_COUNT],
    };
    form.reset(baseline);
    form
  }

  /// Overwrite all 21 items in order.
  pub fn set_all(&mut self, scores: &[i64]) -> anyhow::Result<()> {
    anyhow::ensure!(
      scores.len() == ITEM_COUNT,
      "expected {ITEM_COUNT} comma-separated scores, got {}",
      scores.len()
    );
    self.items.copy_from_slice(scores);
    Ok(())
  }

  pub fn set(&mut self, item: Item, value: i64) { self.items[item.index()] = value; }

  /// Composite over the items that currently hold a valid score.
  pub fn live_summary(&self) -> i64 {
    let valid: Vec<ItemScore> = self
      .items
      .iter()
      .filter_map(|v| ItemScore::new(*v).ok())
      .collect();
    score::composite(&valid)
  }

  /// Print the form, e.g. after a failed save so nothing typed is lost.
  pub fn render(&self) -> String {
    let mut out = format!("date: {}\ntime: {}\n", self.date, self.time);
    for item in Item::ALL {
      out.push_str(&format!(
        "{:>2}. {:<26} {}\n",
        item.number(),
        item.label(),
        self.items[item.index()]
      ));
    }
    out.push_str(&format!("summary: {}\n", self.live_summary()));
    out
  }
}

impl InputSurface for Form {
  fn read_date(&self) -> Result<NaiveDate, FieldReadError> {
    parse_date(&self.date).map_err(|e| FieldReadError::new(Field::Date, e.to_string()))
  }

  fn read_time(&self) -> Result<NaiveTime, FieldReadError> {
    parse_time(&self.time).map_err(|e| FieldReadError::new(Field::Time, e.to_string()))
  }

  fn read_item(&self, item: Item) -> Result<ItemScore, FieldReadError> {
    ItemScore::new(self.items[item.index()])
      .map_err(|e| FieldReadError::new(Field::Item(item), e.to_string()))
  }

  fn reset(&mut self, baseline: &Observation) {
    self.date = baseline.date.format(DATE_FORMAT).to_string();
    self.time = baseline.time.format(TIME_FORMAT).to_string();
    for item in Item::ALL {
      self.items[item.index()] = baseline.item(item).into();
    }
  }
}

/// Parse `name=value` or `number=value`, e.g. `sleep_changes=2` or `16=2`.
pub fn parse_assignment(s: &str) -> Result<(Item, i64), String> {
  let (key, value) = s
    .split_once('=')
    .ok_or_else(|| format!("expected ITEM=SCORE, got {s:?}"))?;
  let key = key.trim();
  let item = match key.parse::<usize>() {
    Ok(n) => Item::from_number(n).ok_or_else(|| format!("no item number {n}"))?,
    Err(_) => key.parse::<Item>().map_err(|_| format!("unknown item {key:?}"))?,
  };
  let value = value
    .trim()
    .parse::<i64>()
    .map_err(|e| format!("invalid score {value:?}: {e}"))?;
  Ok((item, value))
}

#[cfg(test)]
mod tests {
  use beck_core::capture::read_fields;
  use chrono::NaiveDateTime;

  use super::*;

  fn baseline() -> Observation {
    Observation::baseline(
      NaiveDateTime::parse_from_str("2024-10-01 06:30:00", "%Y-%m-%d %H:%M:%S").unwrap(),
    )
  }

  #[test]
  fn new_form_shows_baseline() {
    let form = Form::new(&baseline());
    assert_eq!(form.date, "2024-10-01");
    assert_eq!(form.time, "06:30:00");
    assert_eq!(form.items, [0; ITEM_COUNT]);
    assert!(read_fields(&form).is_complete());
  }

  #[test]
  fn bad_date_is_a_single_field_failure() {
    let mut form = Form::new(&baseline());
    form.date = "2024-02-30".into();
    let report = read_fields(&form);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].field, Field::Date);
    assert_eq!(report.values.len(), 23);
  }

  #[test]
  fn out_of_range_item_is_omitted_from_summary() {
    let mut form = Form::new(&baseline());
    form.set(Item::Crying, 2);
    form.set(Item::Fatigue, 9);
    assert_eq!(form.live_summary(), 2);

    let report = read_fields(&form);
    assert_eq!(report.failures[0].field, Field::Item(Item::Fatigue));
    assert_eq!(report.summary, 2);
  }

  #[test]
  fn set_all_requires_every_item() {
    let mut form = Form::new(&baseline());
    assert!(form.set_all(&[1, 2, 3]).is_err());
    form.set_all(&[1; ITEM_COUNT]).unwrap();
    assert_eq!(form.live_summary(), 21);
  }

  #[test]
  fn assignments_accept_names_and_numbers() {
    assert_eq!(parse_assignment("sleep_changes=2").unwrap(), (Item::SleepChanges, 2));
    assert_eq!(parse_assignment("1 = 3").unwrap(), (Item::Sadness, 3));
    assert!(parse_assignment("22=1").is_err());
    assert!(parse_assignment("mood=1").is_err());
    assert!(parse_assignment("sadness").is_err());
    assert!(parse_assignment("sadness=x").is_err());
  }

  #[test]
  fn render_lists_every_item() {
    let form = Form::new(&baseline());
    let text = form.render();
    assert!(text.contains(" 1. Sadness"));
    assert!(text.contains("21. Loss of interest in sex"));
    assert!(text.ends_with("summary: 0\n"));
  }
}
