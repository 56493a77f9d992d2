//! The `AssessmentStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `beck-store-sqlite`).
//! The capture orchestrator and the CLI depend on this abstraction, not on
//! any concrete backend.

use std::{collections::BTreeSet, future::Future};

use crate::observation::{AssessmentRecord, FieldValue, Observation};

/// Row order for [`AssessmentStore::list`]. Ordering is applied on read and
/// never changes what is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordOrder {
  /// Most recently dated first; ties broken by time, then by id.
  #[default]
  DateDescending,
  /// Ascending id, i.e. commit order.
  Inserted,
}

/// Abstraction over an assessment store backend.
///
/// Records are created by [`insert`](Self::insert) and destroyed by
/// [`delete_by_ids`](Self::delete_by_ids); there is no update.
pub trait AssessmentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Bind `values` positionally into the insert statement and execute it.
  ///
  /// Implementations must reject the insert, without touching the table, if
  /// the statement's placeholder count differs from `values.len()`. Returns
  /// the newly assigned id.
  fn insert(
    &self,
    values: Vec<FieldValue>,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Insert a complete observation with its composite.
  fn insert_observation(
    &self,
    observation: &Observation,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_ {
    self.insert(observation.to_values())
  }

  /// Delete every row whose id is in `ids`. Returns the number of rows
  /// actually removed; ids that do not exist are ignored.
  fn delete_by_ids<'a>(
    &'a self,
    ids: &'a BTreeSet<i64>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<AssessmentRecord>, Self::Error>> + Send + '_;

  /// All stored records in the requested order.
  fn list(
    &self,
    order: RecordOrder,
  ) -> impl Future<Output = Result<Vec<AssessmentRecord>, Self::Error>> + Send + '_;
}
