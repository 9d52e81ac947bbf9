//! Persistent indexer for the REX governance power ledger.
//!
//! Reads decoded contract logs from JSON-lines input, maps each log to the
//! asset of its emitting contract and applies it to a [`PowerLedger`] backed
//! by a sled database.
//!
//! [`PowerLedger`]: rex_core::PowerLedger

pub mod config;
pub mod runner;
pub mod source;
pub mod storage;

pub use config::{ContractRegistry, IndexerConfig};
pub use runner::{run, RunSummary};
pub use source::{JsonLinesSource, RawLog};
pub use storage::SledLedgerStore;
