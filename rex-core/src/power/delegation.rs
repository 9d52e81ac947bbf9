use log::debug;

use rex_shared_types::{Address, Amount, Delegation, PowerKind};

use super::{adjust, negate};
use crate::error::{LedgerError, Result};
use crate::session::EventSession;
use crate::store::LedgerStore;

/// Applies `DelegateChanged(delegator, delegatee, kind)` for the session's
/// asset.
///
/// Delegating to the zero address is treated as returning to
/// self-delegation, since the null address is never an account.
///
/// Only proposition changes write a [`Delegation`] record. A plain
/// `delegate()` call emits a voting and a proposition change in the same
/// transaction and both would share one record id.
pub fn apply_delegation_change<S: LedgerStore + ?Sized>(
    session: &mut EventSession<'_, S>,
    delegator: &Address,
    delegatee: &Address,
    kind: PowerKind,
) -> Result<()> {
    if delegator.is_zero() {
        return Err(LedgerError::MalformedEvent(
            "DelegateChanged emitted for the zero address".to_string(),
        ));
    }
    let asset = session.asset();
    let new_delegate = if delegatee.is_zero() {
        delegator.clone()
    } else {
        delegatee.clone()
    };

    session.account(&new_delegate)?;
    let (balance, previous) = {
        let power = asset.power(session.account(delegator)?);
        (power.balance, power.delegate(kind).clone())
    };

    if kind == PowerKind::Proposition {
        let record = Delegation::new(
            delegator.clone(),
            new_delegate.clone(),
            asset,
            kind,
            balance,
            session.meta(),
        );
        session.stage_delegation(record);
    }

    debug!(
        "{} {} delegation of {} moves from {} to {}",
        asset, kind, delegator, previous, new_delegate
    );

    if &previous != delegator {
        let withdrawn = negate(balance, delegator, "delegated balance")?;
        let previous_account = session.account(&previous)?;
        adjust(
            asset.power_mut(previous_account).delegated_in.get_mut(kind),
            withdrawn,
            &previous,
            "delegated-in",
        )?;
        if asset.tracks_representatives() {
            let count = previous_account.representatives.get_mut(kind);
            match count.checked_sub(1) {
                Some(decremented) => *count = decremented,
                None => session.report_representative_underflow(&previous, kind),
            }
        }
        session.mark_retotal(&previous, kind.into());
    }

    if &new_delegate == delegator {
        *asset
            .power_mut(session.account(delegator)?)
            .delegated_out
            .get_mut(kind) = Amount::ZERO;
    } else {
        *asset
            .power_mut(session.account(delegator)?)
            .delegated_out
            .get_mut(kind) = balance;

        let new_account = session.account(&new_delegate)?;
        adjust(
            asset.power_mut(new_account).delegated_in.get_mut(kind),
            balance,
            &new_delegate,
            "delegated-in",
        )?;
        if asset.tracks_representatives() {
            *new_account.representatives.get_mut(kind) += 1;
        }
        session.mark_retotal(&new_delegate, kind.into());
    }

    asset
        .power_mut(session.account(delegator)?)
        .set_delegate(kind, new_delegate);
    session.mark_retotal(delegator, kind.into());
    Ok(())
}
