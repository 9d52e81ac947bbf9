use rex_shared_types::{Address, Amount, PowerKind, PowerSelector};

use super::{adjust, negate};
use crate::error::Result;
use crate::session::EventSession;
use crate::store::LedgerStore;

/// Applies `Transfer(from, to, value)` for the session's asset.
///
/// The zero address on either side is a mint or burn and is skipped. The
/// sender is debited before the receiver is credited.
pub fn apply_transfer<S: LedgerStore + ?Sized>(
    session: &mut EventSession<'_, S>,
    from: &Address,
    to: &Address,
    value: Amount,
) -> Result<()> {
    if !from.is_zero() {
        let debit = negate(value, from, "transfer value")?;
        apply_balance_change(session, from, debit)?;
    }
    if !to.is_zero() {
        apply_balance_change(session, to, value)?;
    }
    Ok(())
}

/// Moves `delta` into `holder`'s balance and mirrors it through each of the
/// holder's non-self delegates.
fn apply_balance_change<S: LedgerStore + ?Sized>(
    session: &mut EventSession<'_, S>,
    holder: &Address,
    delta: Amount,
) -> Result<()> {
    let asset = session.asset();

    let power = asset.power_mut(session.account(holder)?);
    adjust(&mut power.balance, delta, holder, "balance")?;
    let balance = power.balance;
    let delegates = [
        (PowerKind::Voting, power.voting_delegate.clone()),
        (PowerKind::Proposition, power.proposition_delegate.clone()),
    ];

    if delta.is_negative() && balance.is_negative() {
        session.report_negative_balance(holder, balance);
    }

    for (kind, delegate) in delegates {
        if &delegate == holder {
            continue;
        }
        let delegate_power = asset.power_mut(session.account(&delegate)?);
        adjust(delegate_power.delegated_in.get_mut(kind), delta, &delegate, "delegated-in")?;
        session.mark_retotal(&delegate, kind.into());

        // Outgoing power follows the current balance while delegating.
        let holder_power = asset.power_mut(session.account(holder)?);
        adjust(holder_power.delegated_out.get_mut(kind), delta, holder, "delegated-out")?;
    }

    session.mark_retotal(holder, PowerSelector::Both);
    Ok(())
}
