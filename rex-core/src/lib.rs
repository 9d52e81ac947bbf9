// rex-core/src/lib.rs
//! `rex-core` maintains the derived voting and proposition power ledger for
//! REX and stkREX holders.
//!
//! Each token `Transfer` and `DelegateChanged` event is applied incrementally:
//! only the accounts an event touches are loaded, their raw balance and
//! delegation fields are adjusted, and their derived totals are recomputed
//! before the whole event is committed in one store write.
//!
//! # Modules
//!
//! - `power`: the transfer and delegation handlers and the `retotal` function.
//! - `session`: the per-event unit of work that owns every touched account.
//! - `processor`: dispatches events to the handlers and commits the result.
//! - `store`: the ledger store interface and an in-memory implementation.
//!
//! # Usage
//!
//! ```rust
//! use rex_core::{MemoryLedgerStore, PowerLedger};
//! use rex_shared_types::{Address, Amount, Asset, EventMeta, LedgerEvent, LedgerEventKind};
//!
//! let mut ledger = PowerLedger::new(MemoryLedgerStore::new());
//! let holder = Address::parse("0x00000000000000000000000000000000000000a1").unwrap();
//! let mint = LedgerEvent {
//!     asset: Asset::Rex,
//!     meta: EventMeta { block_number: 1, log_index: 0, timestamp: 1_600_000_000, tx_hash: "0x01".into() },
//!     kind: LedgerEventKind::Transfer { from: Address::zero(), to: holder, value: Amount::from_raw(100) },
//! };
//! ledger.process(&mint).unwrap();
//! ```

pub mod audit_log;
pub mod error;
pub mod power;
pub mod processor;
pub mod session;
pub mod store;

pub use error::{LedgerError, Result};
pub use power::retotal;
pub use processor::{EventOutcome, LedgerStats, PowerLedger};
pub use session::{Anomaly, EventSession};
pub use store::{LedgerChanges, LedgerStore, MemoryLedgerStore};
