//! SQLite implementation of [`aula_core::store::RecordStore`].
//!
//! Built on [`tokio_rusqlite`]: every query runs on the connection's
//! dedicated thread, keeping the async runtime unblocked.

mod schema;
mod store;

pub use store::SqliteStore;

#[cfg(test)]
mod tests;
