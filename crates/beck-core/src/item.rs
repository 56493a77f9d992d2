//! The 21 inventory items and their bounded severity scores.
//!
//! Item order is meaningful: position `n` is always stored in column
//! `item_{n}` and is never reordered between capture, storage and display.

use serde::{Deserialize, Serialize};
use strum::EnumCount;

use crate::{Error, Result};

/// Number of items in one observation.
pub const ITEM_COUNT: usize = 21;

// ─── Item ────────────────────────────────────────────────────────────────────

/// One named symptom of the inventory, in its fixed position.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
  strum::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Item {
  Sadness,
  Pessimism,
  PastFailure,
  LossOfPleasure,
  GuiltyFeelings,
  PunishmentFeelings,
  SelfDislike,
  SelfCriticalness,
  SuicidalThoughts,
  Crying,
  Agitation,
  LossOfInterest,
  Indecisiveness,
  Worthlessness,
  LossOfEnergy,
  SleepChanges,
  Irritability,
  AppetiteChanges,
  ConcentrationDifficulty,
  Fatigue,
  LossOfInterestInSex,
}

const _: () = assert!(Item::COUNT == ITEM_COUNT);

impl Item {
  /// Every item, in column order.
  pub const ALL: [Item; ITEM_COUNT] = [
    Item::Sadness,
    Item::Pessimism,
    Item::PastFailure,
    Item::LossOfPleasure,
    Item::GuiltyFeelings,
    Item::PunishmentFeelings,
    Item::SelfDislike,
    Item::SelfCriticalness,
    Item::SuicidalThoughts,
    Item::Crying,
    Item::Agitation,
    Item::LossOfInterest,
    Item::Indecisiveness,
    Item::Worthlessness,
    Item::LossOfEnergy,
    Item::SleepChanges,
    Item::Irritability,
    Item::AppetiteChanges,
    Item::ConcentrationDifficulty,
    Item::Fatigue,
    Item::LossOfInterestInSex,
  ];

  /// Zero-based position within an observation.
  pub const fn index(self) -> usize { self as usize }

  /// One-based position, as used in column names.
  pub const fn number(self) -> usize { self.index() + 1 }

  /// Look an item up by its one-based position.
  pub fn from_number(number: usize) -> Option<Self> {
    number.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
  }

  /// Name of the backing column.
  pub fn column(self) -> String { format!("item_{}", self.number()) }

  /// Human-readable label for prompts and table headers.
  pub fn label(self) -> &'static str {
    match self {
      Item::Sadness => "Sadness",
      Item::Pessimism => "Pessimism",
      Item::PastFailure => "Past failure",
      Item::LossOfPleasure => "Loss of pleasure",
      Item::GuiltyFeelings => "Guilty feelings",
      Item::PunishmentFeelings => "Punishment feelings",
      Item::SelfDislike => "Self-dislike",
      Item::SelfCriticalness => "Self-criticalness",
      Item::SuicidalThoughts => "Suicidal thoughts",
      Item::Crying => "Crying",
      Item::Agitation => "Agitation",
      Item::LossOfInterest => "Loss of interest",
      Item::Indecisiveness => "Indecisiveness",
      Item::Worthlessness => "Worthlessness",
      Item::LossOfEnergy => "Loss of energy",
      Item::SleepChanges => "Changes in sleep",
      Item::Irritability => "Irritability",
      Item::AppetiteChanges => "Changes in appetite",
      Item::ConcentrationDifficulty => "Concentration difficulty",
      Item::Fatigue => "Tiredness or fatigue",
      Item::LossOfInterestInSex => "Loss of interest in sex",
    }
  }
}

// ─── ItemScore ───────────────────────────────────────────────────────────────

/// A severity rating in the closed range `0..=3`.
///
/// `0` means "no severity" and is also the reset baseline; there is no
/// separate unanswered state.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct ItemScore(u8);

impl ItemScore {
  pub const ZERO: Self = Self(0);
  pub const MAX: Self = Self(3);

  pub fn new(value: i64) -> Result<Self> {
    match u8::try_from(value) {
      Ok(v) if v <= Self::MAX.0 => Ok(Self(v)),
      _ => Err(Error::ScoreOutOfRange(value)),
    }
  }

  pub const fn get(self) -> u8 { self.0 }
}

impl TryFrom<i64> for ItemScore {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> { Self::new(value) }
}

impl From<ItemScore> for i64 {
  fn from(score: ItemScore) -> Self { i64::from(score.0) }
}

impl std::fmt::Display for ItemScore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    std::fmt::Display::fmt(&self.0, f)
  }
}

/// Convert a slice of raw integers into exactly [`ITEM_COUNT`] scores.
pub fn scores_from_slice(values: &[i64]) -> Result<[ItemScore; ITEM_COUNT]> {
  if values.len() != ITEM_COUNT {
    return Err(Error::ItemCount {
      expected: ITEM_COUNT,
      actual:   values.len(),
    });
  }
  let mut scores = [ItemScore::ZERO; ITEM_COUNT];
  for (slot, raw) in scores.iter_mut().zip(values) {
    *slot = ItemScore::new(*raw)?;
  }
  Ok(scores)
}
