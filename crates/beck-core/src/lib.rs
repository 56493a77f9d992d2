//! Core types and trait definitions for the Beck self-assessment log.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! It owns the domain model (items, observations, records), the composite
//! score rule, the [`store::AssessmentStore`] abstraction, and the
//! capture-commit-reset orchestrator that ties an input surface to a store.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod capture;
pub mod error;
pub mod item;
pub mod observation;
pub mod score;
pub mod store;

pub use error::{Error, Result};
