//! SQLite backend for the deedbook client store.
//!
//! All database access goes through [`tokio_rusqlite`], which runs it on a
//! dedicated thread so the async runtime is never blocked.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
