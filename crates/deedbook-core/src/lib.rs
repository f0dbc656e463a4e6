//! Client records, the spouse-link rules that govern them, and the store
//! abstraction they live behind.
//!
//! No HTTP and no database here. The SQLite backend and the JSON API both
//! build on this crate.

// Store traits use native `async fn`; the Send-bound advisory does not apply.
#![allow(async_fn_in_trait)]

pub mod client;
pub mod duplicates;
pub mod error;
pub mod manager;
pub mod memory;
pub mod query;
pub mod relationship;
pub mod store;

pub use error::{Error, Result};
