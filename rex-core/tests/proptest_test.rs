use proptest::prelude::*;

use rex_core::{LedgerStore, MemoryLedgerStore, PowerLedger};
use rex_shared_types::{
    Account, Address, Amount, Asset, EventMeta, LedgerEvent, LedgerEventKind, PowerKind,
};

const HOLDERS: u8 = 5;

#[derive(Debug, Clone)]
enum Op {
    Transfer { asset: Asset, from: u8, to: u8, value: i128 },
    Delegate { asset: Asset, delegator: u8, delegatee: u8, power: PowerKind },
}

fn holder(index: u8) -> Address {
    Address::parse(&format!("0x{:040x}", u32::from(index) + 1)).unwrap()
}

fn asset_strategy() -> impl Strategy<Value = Asset> {
    prop_oneof![Just(Asset::Rex), Just(Asset::StkRex)]
}

fn power_strategy() -> impl Strategy<Value = PowerKind> {
    prop_oneof![Just(PowerKind::Voting), Just(PowerKind::Proposition)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (asset_strategy(), 0..HOLDERS, 0..HOLDERS, 0i128..1_000)
            .prop_map(|(asset, from, to, value)| Op::Transfer { asset, from, to, value }),
        (asset_strategy(), 0..HOLDERS, 0..HOLDERS, power_strategy()).prop_map(
            |(asset, delegator, delegatee, power)| Op::Delegate { asset, delegator, delegatee, power }
        ),
    ]
}

fn to_event(op: &Op, position: u64) -> LedgerEvent {
    let meta = EventMeta {
        block_number: position + 1,
        log_index: 0,
        timestamp: 1_000 + position,
        tx_hash: format!("0x{:064x}", position),
    };
    let (asset, kind) = match op {
        Op::Transfer { asset, from, to, value } => (
            *asset,
            LedgerEventKind::Transfer {
                from: holder(*from),
                to: holder(*to),
                value: Amount::from_raw(*value),
            },
        ),
        Op::Delegate { asset, delegator, delegatee, power } => (
            *asset,
            LedgerEventKind::DelegateChanged {
                delegator: holder(*delegator),
                delegatee: holder(*delegatee),
                power: *power,
            },
        ),
    };
    LedgerEvent { asset, meta, kind }
}

/// Seeds every holder with a mint of each asset so transfers have something to move.
fn seeded_ledger() -> PowerLedger<MemoryLedgerStore> {
    let mut ledger = PowerLedger::new(MemoryLedgerStore::new());
    let mut position = 0;
    for index in 0..HOLDERS {
        for asset in Asset::ALL {
            let event = LedgerEvent {
                asset,
                meta: EventMeta {
                    block_number: 0,
                    log_index: position,
                    timestamp: 1,
                    tx_hash: "0x00".to_string(),
                },
                kind: LedgerEventKind::Transfer {
                    from: Address::zero(),
                    to: holder(index),
                    value: Amount::from_raw(10_000),
                },
            };
            ledger.process(&event).unwrap();
            position += 1;
        }
    }
    ledger
}

fn total(amounts: impl Iterator<Item = Amount>) -> Amount {
    amounts.fold(Amount::ZERO, |acc, amount| acc.checked_add(amount).unwrap())
}

fn check_account(account: &Account) -> Result<(), TestCaseError> {
    for kind in [PowerKind::Voting, PowerKind::Proposition] {
        for asset in Asset::ALL {
            let power = account.power(asset);
            prop_assert_eq!(
                power.total.get(kind),
                power
                    .balance
                    .checked_add(power.delegated_in.get(kind))
                    .and_then(|sum| sum.checked_sub(power.delegated_out.get(kind)))
                    .unwrap()
            );
            if account.is_self_delegating(asset, kind) {
                prop_assert_eq!(power.delegated_out.get(kind), Amount::ZERO);
            } else {
                prop_assert_eq!(power.delegated_out.get(kind), power.balance);
            }
        }
        prop_assert_eq!(
            account.total.get(kind),
            account.rex.total.get(kind).checked_add(account.stk_rex.total.get(kind)).unwrap()
        );
    }
    Ok(())
}

/// Every account's delegated-in equals what its delegators send it.
fn check_delegation_flows(accounts: &[Account]) -> Result<(), TestCaseError> {
    for target in accounts {
        for asset in Asset::ALL {
            for kind in [PowerKind::Voting, PowerKind::Proposition] {
                let inbound = total(
                    accounts
                        .iter()
                        .filter(|a| a.id != target.id && a.power(asset).delegate(kind) == &target.id)
                        .map(|a| a.power(asset).balance),
                );
                prop_assert_eq!(target.power(asset).delegated_in.get(kind), inbound);
                if asset.tracks_representatives() {
                    let count = accounts
                        .iter()
                        .filter(|a| a.id != target.id && a.power(asset).delegate(kind) == &target.id)
                        .count() as u32;
                    prop_assert_eq!(target.representatives.get(kind), count + 1);
                }
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_invariants_hold_after_every_event(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut ledger = seeded_ledger();
        for (position, op) in ops.iter().enumerate() {
            ledger.process(&to_event(op, position as u64)).unwrap();
            let accounts = ledger.store().accounts().unwrap();
            for account in &accounts {
                check_account(account)?;
            }
            check_delegation_flows(&accounts)?;
        }
    }

    #[test]
    fn test_transfers_conserve_balances(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut ledger = seeded_ledger();
        let supply = |ledger: &PowerLedger<MemoryLedgerStore>, asset: Asset| -> Amount {
            total(ledger.store().accounts().unwrap().iter().map(|a| a.power(asset).balance))
        };
        let rex_supply = supply(&ledger, Asset::Rex);
        let stk_supply = supply(&ledger, Asset::StkRex);

        for (position, op) in ops.iter().enumerate() {
            ledger.process(&to_event(op, position as u64)).unwrap();
        }

        prop_assert_eq!(supply(&ledger, Asset::Rex), rex_supply);
        prop_assert_eq!(supply(&ledger, Asset::StkRex), stk_supply);
    }
}
