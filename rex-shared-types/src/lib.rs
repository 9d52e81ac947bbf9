//! Data structures for the REX governance power ledger.
//!
//! These types are shared between the power-recomputation engine in `rex-core`
//! and the persistent indexer in `rex-indexer`. Nothing in this crate mutates
//! ledger state; it only describes it.

pub mod account;
pub mod address;
pub mod amount;
pub mod delegation;
pub mod events;
pub mod power;

pub use account::{Account, AssetPower, PowerPair, RepresentativeCounts};
pub use address::{Address, AddressError, ZERO_ADDRESS};
pub use amount::{Amount, AmountError, DECIMALS};
pub use delegation::Delegation;
pub use events::{EventCursor, EventMeta, LedgerEvent, LedgerEventKind};
pub use power::{Asset, PowerKind, PowerSelector};
