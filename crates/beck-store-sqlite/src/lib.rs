//! SQLite backend for the Beck assessment log.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod seed;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use seed::{Seeded, initialize};
pub use store::SqliteStore;
