//! JSON-lines ingest of decoded contract logs.
//!
//! Each line is one log emitted by the REX or stkREX contract:
//!
//! ```json
//! {"contract":"0x..","event":"Transfer","params":{"from":"0x..","to":"0x..","value":"100"},
//!  "block_number":12,"log_index":3,"timestamp":1600000000,"tx_hash":"0x.."}
//! ```
//!
//! Amounts are decimal strings so that 18-decimal token values survive JSON.

use std::io::BufRead;

use log::debug;
use serde::{Deserialize, Serialize};

use rex_core::{LedgerError, Result};
use rex_shared_types::{Address, Amount, EventMeta, LedgerEvent, LedgerEventKind, PowerKind};

use crate::config::ContractRegistry;

const TRANSFER: &str = "Transfer";
const DELEGATE_CHANGED: &str = "DelegateChanged";

/// A contract log as it appears in the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLog {
    pub contract: String,
    pub event: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub block_number: u64,
    pub log_index: u32,
    pub timestamp: u64,
    pub tx_hash: String,
}

#[derive(Debug, Deserialize)]
struct TransferParams {
    from: String,
    to: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DelegateChangedParams {
    delegator: String,
    delegatee: String,
    delegation_type: u8,
}

fn params<T: serde::de::DeserializeOwned>(raw: &RawLog) -> Result<T> {
    serde_json::from_value(raw.params.clone()).map_err(|e| {
        LedgerError::MalformedEvent(format!(
            "{} at block {} log {}: {}",
            raw.event, raw.block_number, raw.log_index, e
        ))
    })
}

impl RawLog {
    pub fn meta(&self) -> EventMeta {
        EventMeta {
            block_number: self.block_number,
            log_index: self.log_index,
            timestamp: self.timestamp,
            tx_hash: self.tx_hash.clone(),
        }
    }

    /// Converts the log into a typed ledger event.
    ///
    /// Returns `Ok(None)` for events the ledger does not consume, such as
    /// `Approval`. An unrecognized contract or bad params is an error, whatever
    /// the event.
    pub fn decode(&self, contracts: &ContractRegistry) -> Result<Option<LedgerEvent>> {
        let asset = contracts.asset_for(&Address::parse(&self.contract)?)?;
        let kind = match self.event.as_str() {
            TRANSFER => {
                let p: TransferParams = params(self)?;
                LedgerEventKind::Transfer {
                    from: Address::parse(&p.from)?,
                    to: Address::parse(&p.to)?,
                    value: Amount::from_dec_str(&p.value)?,
                }
            }
            DELEGATE_CHANGED => {
                let p: DelegateChangedParams = params(self)?;
                let power = PowerKind::from_delegation_type(p.delegation_type).ok_or_else(|| {
                    LedgerError::MalformedEvent(format!(
                        "unknown delegationType {} at block {} log {}",
                        p.delegation_type, self.block_number, self.log_index
                    ))
                })?;
                LedgerEventKind::DelegateChanged {
                    delegator: Address::parse(&p.delegator)?,
                    delegatee: Address::parse(&p.delegatee)?,
                    power,
                }
            }
            other => {
                debug!("Ignoring {} log at block {}", other, self.block_number);
                return Ok(None);
            }
        };

        Ok(Some(LedgerEvent {
            asset,
            meta: self.meta(),
            kind,
        }))
    }
}

/// Reads [`RawLog`]s from a JSON-lines stream, skipping blank lines.
///
/// Items carry the 1-based line number they were read from.
pub struct JsonLinesSource<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = Result<(usize, RawLog)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            self.line += 1;
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    return Some(Err(LedgerError::Other(format!(
                        "failed to read line {}: {}",
                        self.line, e
                    ))))
                }
            }
            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }
            return Some(
                serde_json::from_str(text)
                    .map(|raw| (self.line, raw))
                    .map_err(|e| LedgerError::MalformedEvent(format!("line {}: {}", self.line, e))),
            );
        }
    }
}
