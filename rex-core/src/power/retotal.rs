use rex_shared_types::{Account, Amount, Asset, AssetPower, PowerKind, PowerSelector};

use super::overflow;
use crate::error::Result;

fn asset_total(power: &AssetPower, kind: PowerKind) -> Option<Amount> {
    power
        .balance
        .checked_add(power.delegated_in.get(kind))?
        .checked_sub(power.delegated_out.get(kind))
}

/// Recomputes `account`'s derived totals for `asset` from its raw fields.
///
/// For every kind in `selector` the per-asset total becomes
/// `balance + delegated_in - delegated_out`, and the cross-asset total is the
/// sum of the REX and stkREX totals. The update timestamp is stamped either
/// way. Calling it twice with no raw change in between is a no-op.
pub fn retotal(account: &mut Account, asset: Asset, selector: PowerSelector, timestamp: u64) -> Result<()> {
    for &kind in selector.kinds() {
        let total = asset_total(asset.power(account), kind)
            .ok_or_else(|| overflow(&account.id, &format!("{} {} total", asset, kind)))?;
        *asset.power_mut(account).total.get_mut(kind) = total;

        let grand = account
            .rex
            .total
            .get(kind)
            .checked_add(account.stk_rex.total.get(kind))
            .ok_or_else(|| overflow(&account.id, &format!("total {}", kind)))?;
        *account.total.get_mut(kind) = grand;
    }
    account.last_update_timestamp = timestamp;
    Ok(())
}
