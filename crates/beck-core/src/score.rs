//! The composite score rule.

use crate::item::{ITEM_COUNT, ItemScore};

/// Highest composite a complete observation can reach.
pub const MAX_COMPOSITE: i64 = ItemScore::MAX.get() as i64 * ITEM_COUNT as i64;

/// Sum of the item scores that are strictly greater than zero.
///
/// On the `0..=3` domain this equals the plain sum. The zero filter is kept so
/// that zero stays "no contribution" if the domain ever gains negative or
/// sentinel values.
///
/// Accepts any number of scores: the capture path computes the composite over
/// whichever items could actually be read.
pub fn composite(scores: &[ItemScore]) -> i64 {
  scores
    .iter()
    .map(|s| i64::from(*s))
    .filter(|v| *v > 0)
    .sum()
}
