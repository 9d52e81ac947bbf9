use rex_core::{LedgerChanges, LedgerStore, PowerLedger};
use rex_indexer::SledLedgerStore;
use rex_shared_types::{
    Account, Address, Amount, Asset, Delegation, EventCursor, EventMeta, LedgerEvent, LedgerEventKind,
    PowerKind,
};
use tempfile::tempdir;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn addr(seed: u8) -> Address {
    Address::parse(&format!("0x{:040x}", seed)).unwrap()
}

fn meta(block_number: u64) -> EventMeta {
    EventMeta {
        block_number,
        log_index: 0,
        timestamp: 1_600_000_000 + block_number,
        tx_hash: format!("0x{:064x}", block_number),
    }
}

fn mint(block_number: u64, to: &Address, value: i128) -> LedgerEvent {
    LedgerEvent {
        asset: Asset::Rex,
        meta: meta(block_number),
        kind: LedgerEventKind::Transfer {
            from: Address::zero(),
            to: to.clone(),
            value: Amount::from_raw(value),
        },
    }
}

fn delegate(block_number: u64, delegator: &Address, delegatee: &Address) -> LedgerEvent {
    LedgerEvent {
        asset: Asset::Rex,
        meta: meta(block_number),
        kind: LedgerEventKind::DelegateChanged {
            delegator: delegator.clone(),
            delegatee: delegatee.clone(),
            power: PowerKind::Voting,
        },
    }
}

#[test]
fn test_commit_writes_accounts_delegations_and_cursor() {
    init_logger();
    let dir = tempdir().unwrap();
    let store = SledLedgerStore::open(dir.path()).unwrap();

    let mut account = Account::new(addr(1));
    account.rex.balance = Amount::from_raw(42);
    let delegation = Delegation::new(
        addr(1),
        addr(2),
        Asset::Rex,
        PowerKind::Voting,
        Amount::from_raw(42),
        &meta(5),
    );
    let cursor = EventCursor { block_number: 5, log_index: 0 };

    store
        .commit(LedgerChanges {
            accounts: vec![account.clone()],
            delegations: vec![delegation.clone()],
            cursor,
        })
        .unwrap();

    assert_eq!(store.get_account(&addr(1)).unwrap(), Some(account));
    assert_eq!(store.get_delegation(&delegation.id).unwrap(), Some(delegation));
    assert_eq!(store.cursor().unwrap(), Some(cursor));
}

#[test]
fn test_delegation_records_are_append_only() {
    init_logger();
    let dir = tempdir().unwrap();
    let store = SledLedgerStore::open(dir.path()).unwrap();

    let first = Delegation::new(
        addr(1),
        addr(2),
        Asset::Rex,
        PowerKind::Voting,
        Amount::from_raw(10),
        &meta(1),
    );
    let mut second = first.clone();
    second.amount = Amount::from_raw(99);

    assert!(store.append_delegation(&first).unwrap());
    assert!(!store.append_delegation(&second).unwrap());

    store
        .commit(LedgerChanges {
            accounts: vec![],
            delegations: vec![second],
            cursor: EventCursor { block_number: 2, log_index: 0 },
        })
        .unwrap();

    let stored = store.get_delegation(&first.id).unwrap().unwrap();
    assert_eq!(stored.amount, Amount::from_raw(10));
}

#[test]
fn test_load_or_create_does_not_persist() {
    init_logger();
    let dir = tempdir().unwrap();
    let store = SledLedgerStore::open(dir.path()).unwrap();

    let account = store.load_or_create(&addr(3)).unwrap();
    assert_eq!(account, Account::new(addr(3)));
    assert_eq!(store.get_account(&addr(3)).unwrap(), None);
    assert!(store.load_or_create(&Address::zero()).is_err());
}

#[test]
fn test_ledger_state_survives_reopen() {
    init_logger();
    let dir = tempdir().unwrap();
    let (alice, bob) = (addr(0xa1), addr(0xb2));

    {
        let mut ledger = PowerLedger::new(SledLedgerStore::open(dir.path()).unwrap());
        ledger.process(&mint(1, &alice, 100)).unwrap();
        ledger.process(&delegate(2, &alice, &bob)).unwrap();
        ledger.store().flush().unwrap();
    }

    let mut ledger = PowerLedger::new(SledLedgerStore::open(dir.path()).unwrap());
    assert_eq!(
        ledger.store().cursor().unwrap(),
        Some(EventCursor { block_number: 2, log_index: 0 })
    );

    // Redelivery after a restart is skipped.
    assert!(!ledger.process(&delegate(2, &alice, &bob)).unwrap().is_applied());
    assert!(ledger.process(&mint(3, &alice, 20)).unwrap().is_applied());

    let alice_account = ledger.store().get_account(&alice).unwrap().unwrap();
    let bob_account = ledger.store().get_account(&bob).unwrap().unwrap();
    assert_eq!(alice_account.rex.balance, Amount::from_raw(120));
    assert_eq!(alice_account.rex.delegated_out.voting, Amount::from_raw(120));
    assert_eq!(bob_account.rex.delegated_in.voting, Amount::from_raw(120));
    assert_eq!(bob_account.total.voting, Amount::from_raw(120));
    assert_eq!(bob_account.representatives.voting, 2);
    assert_eq!(ledger.store().accounts().unwrap().len(), 2);
}
