//! Core types and trait definitions for the Aula academic-records
//! store.
//!
//! Everything here is plain data plus the [`store::RecordStore`]
//! contract; HTTP, SQLite and replication concerns live in the sibling
//! crates that depend on this one.

pub mod entity;
pub mod error;
pub mod store;

pub use error::{Error, Result};
