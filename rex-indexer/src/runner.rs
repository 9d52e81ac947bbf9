//! Drives a log source through the power ledger.

use std::io::BufRead;

use log::{error, info, warn};

use rex_core::{EventOutcome, LedgerStats, LedgerStore, PowerLedger, Result};
use rex_shared_types::EventCursor;

use crate::config::ContractRegistry;
use crate::source::JsonLinesSource;

/// What a run did, reported once the input is exhausted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub lines_read: usize,
    /// Logs from a known contract that carry no power change (e.g. `Approval`).
    pub logs_ignored: usize,
    pub stats: LedgerStats,
    pub cursor: Option<EventCursor>,
}

/// Applies every log in `reader` to `ledger`, in order.
///
/// Stops at the first structural fault. Events committed before the fault
/// stay committed, so a rerun on the same store resumes after the cursor.
pub fn run<S, R>(ledger: &mut PowerLedger<S>, contracts: &ContractRegistry, reader: R) -> Result<RunSummary>
where
    S: LedgerStore,
    R: BufRead,
{
    let mut summary = RunSummary::default();

    for item in JsonLinesSource::new(reader) {
        let (line, raw) = item?;
        summary.lines_read += 1;

        let event = match raw.decode(contracts) {
            Ok(Some(event)) => event,
            Ok(None) => {
                summary.logs_ignored += 1;
                continue;
            }
            Err(e) => {
                error!("Line {} could not be decoded: {}", line, e);
                return Err(e);
            }
        };

        match ledger.process(&event) {
            Ok(EventOutcome::Applied { anomalies, .. }) if !anomalies.is_empty() => {
                warn!("Line {} applied with {} anomalies", line, anomalies.len());
            }
            Ok(_) => {}
            Err(e) => {
                error!("Line {} ({} at block {}) failed: {}", line, event.name(), event.meta.block_number, e);
                return Err(e);
            }
        }
    }

    summary.stats = ledger.stats().clone();
    summary.cursor = ledger.store().cursor()?;
    info!(
        "Run complete: {} lines, {} applied, {} skipped, {} ignored, {} anomalies",
        summary.lines_read,
        summary.stats.events_applied,
        summary.stats.events_skipped,
        summary.logs_ignored,
        summary.stats.anomalies
    );
    Ok(summary)
}
