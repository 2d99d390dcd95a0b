//! Integration tests for the timelocked wallet contract.
//!
//! These mirror the recorded scenarios: owner-gated locking, height
//! validation, beneficiary transfer via bestow, and the one-shot claim
//! with exact transfer-event assertions.

use simnet_contracts::TimelockedWallet;
use simnet_protocol::config::GENESIS_BALANCE;
use simnet_protocol::{Args, Event, Principal, Receipt, Simnet, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn setup() -> (Simnet, Principal) {
    let mut sim = Simnet::new();
    let owner = sim.deployer().clone();
    let wallet = sim
        .deploy("timelocked-wallet", Box::new(TimelockedWallet::new(owner)))
        .unwrap();
    (sim, wallet)
}

fn lock(
    sim: &mut Simnet,
    beneficiary: &Principal,
    unlock_height: u64,
    amount: u64,
    sender: &Principal,
) -> Receipt {
    sim.call_public_fn(
        "timelocked-wallet",
        "lock",
        Args::new(vec![
            Value::Principal(beneficiary.clone()),
            Value::Uint(unlock_height),
            Value::Uint(amount),
        ]),
        sender,
    )
    .unwrap()
}

fn claim(sim: &mut Simnet, sender: &Principal) -> Receipt {
    sim.call_public_fn("timelocked-wallet", "claim", Args::empty(), sender)
        .unwrap()
}

fn bestow(sim: &mut Simnet, new_beneficiary: &Principal, sender: &Principal) -> Receipt {
    sim.call_public_fn(
        "timelocked-wallet",
        "bestow",
        Args::new(vec![Value::Principal(new_beneficiary.clone())]),
        sender,
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// lock
// ---------------------------------------------------------------------------

#[test]
fn owner_can_lock_and_the_escrow_transfer_is_attributed() {
    let (mut sim, wallet) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();

    let receipt = lock(&mut sim, &beneficiary, 20, 10, &deployer);

    assert_eq!(receipt.result.ok_value(), Some(&Value::Bool(true)));
    assert_eq!(
        receipt.events,
        vec![Event::Transfer {
            sender: deployer.clone(),
            recipient: wallet.clone(), // deployer.timelocked-wallet
            amount: 10,
        }]
    );
    assert_eq!(wallet.as_str(), "deployer.timelocked-wallet");
    assert_eq!(sim.balance_of(&wallet), 10);
    assert_eq!(sim.balance_of(&deployer), GENESIS_BALANCE - 10);
}

#[test]
fn lock_rejected_for_non_owner() {
    let (mut sim, wallet) = setup();
    let non_owner = sim.account("wallet_2").unwrap();
    let beneficiary = sim.account("wallet_1").unwrap();

    let receipt = lock(&mut sim, &beneficiary, 20, 10, &non_owner);

    assert_eq!(receipt.result.err_code(), Some(100)); // err-owner-only
    assert_eq!(sim.balance_of(&wallet), 0);
}

#[test]
fn lock_is_one_shot() {
    let (mut sim, _) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();

    assert!(lock(&mut sim, &beneficiary, 20, 10, &deployer).result.is_ok());

    let receipt = lock(&mut sim, &beneficiary, 20, 10, &deployer);
    assert_eq!(receipt.result.err_code(), Some(101)); // err-already-locked
}

#[test]
fn unlock_height_cannot_be_in_the_past() {
    let (mut sim, _) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();

    // Advance the chain beyond the target height first.
    sim.mine_empty_blocks(11);

    let receipt = lock(&mut sim, &beneficiary, 10, 10, &deployer);
    assert_eq!(receipt.result.err_code(), Some(102)); // err-unlock-in-past
}

#[test]
fn lock_with_insufficient_funds_propagates_ledger_code_and_stays_unlocked() {
    let (mut sim, wallet) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();

    let receipt = lock(&mut sim, &beneficiary, 20, GENESIS_BALANCE + 1, &deployer);
    assert_eq!(receipt.result.err_code(), Some(1)); // ledger: insufficient funds
    assert_eq!(sim.balance_of(&wallet), 0);

    // The failed lock must not have consumed the one shot.
    let receipt = lock(&mut sim, &beneficiary, 20, 10, &deployer);
    assert!(receipt.result.is_ok());
}

// ---------------------------------------------------------------------------
// bestow
// ---------------------------------------------------------------------------

#[test]
fn beneficiary_can_bestow_the_claim_right() {
    let (mut sim, _) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();
    let new_beneficiary = sim.account("wallet_2").unwrap();
    lock(&mut sim, &beneficiary, 10, 10, &deployer);

    let receipt = bestow(&mut sim, &new_beneficiary, &beneficiary);

    assert_eq!(receipt.result.ok_value(), Some(&Value::Bool(true)));
    assert_eq!(
        sim.get_data_var("timelocked-wallet", "beneficiary").unwrap(),
        Value::Principal(new_beneficiary)
    );
}

#[test]
fn bestow_rejected_for_everyone_else() {
    let (mut sim, _) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();
    let non_beneficiary = sim.account("wallet_3").unwrap();
    lock(&mut sim, &beneficiary, 10, 10, &deployer);

    // The owner does not hold the claim right either.
    let receipt = bestow(&mut sim, &deployer, &deployer);
    assert_eq!(receipt.result.err_code(), Some(104)); // err-beneficiary-only

    let receipt = bestow(&mut sim, &non_beneficiary, &non_beneficiary);
    assert_eq!(receipt.result.err_code(), Some(104));
}

#[test]
fn bestow_moves_the_effective_claimant() {
    let (mut sim, _) = setup();
    let deployer = sim.deployer().clone();
    let old = sim.account("wallet_1").unwrap();
    let new = sim.account("wallet_2").unwrap();
    lock(&mut sim, &old, 5, 10, &deployer);
    bestow(&mut sim, &new, &old);
    sim.mine_empty_blocks(10);

    // The previous beneficiary's claim now fails with beneficiary-only.
    let receipt = claim(&mut sim, &old);
    assert_eq!(receipt.result.err_code(), Some(104));

    let receipt = claim(&mut sim, &new);
    assert!(receipt.result.is_ok());
}

// ---------------------------------------------------------------------------
// claim
// ---------------------------------------------------------------------------

#[test]
fn claim_pays_out_at_the_unlock_height() {
    let (mut sim, wallet) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();
    lock(&mut sim, &beneficiary, 10, 10, &deployer);

    sim.mine_empty_blocks(10);

    let receipt = claim(&mut sim, &beneficiary);

    assert_eq!(receipt.result.ok_value(), Some(&Value::Bool(true)));
    assert_eq!(
        receipt.events,
        vec![Event::Transfer {
            sender: wallet.clone(), // deployer.timelocked-wallet
            recipient: beneficiary.clone(),
            amount: 10,
        }]
    );
    assert_eq!(sim.balance_of(&wallet), 0);
    assert_eq!(sim.balance_of(&beneficiary), GENESIS_BALANCE + 10);
}

#[test]
fn claim_rejected_below_the_unlock_height() {
    let (mut sim, _) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();
    let unlock_height = 20;
    lock(&mut sim, &beneficiary, unlock_height, 10, &deployer);

    // Height 19 < 20: one block short.
    sim.mine_empty_blocks(18);
    assert!(sim.block_height() < unlock_height);

    let receipt = claim(&mut sim, &beneficiary);
    assert_eq!(receipt.result.err_code(), Some(105)); // err-unlock-height-not-reached
}

#[test]
fn claim_rejected_for_non_beneficiary() {
    let (mut sim, _) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();
    let stranger = sim.account("wallet_2").unwrap();
    lock(&mut sim, &beneficiary, 10, 10, &deployer);
    sim.mine_empty_blocks(10);

    let receipt = claim(&mut sim, &stranger);
    assert_eq!(receipt.result.err_code(), Some(104)); // err-beneficiary-only
}

#[test]
fn second_claim_cannot_drain_twice() {
    let (mut sim, wallet) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();
    lock(&mut sim, &beneficiary, 10, 10, &deployer);
    sim.mine_empty_blocks(10);

    assert!(claim(&mut sim, &beneficiary).result.is_ok());
    let balance_after_first = sim.balance_of(&beneficiary);

    let receipt = claim(&mut sim, &beneficiary);
    assert!(receipt.result.is_err());
    assert!(receipt.events.is_empty());
    assert_eq!(sim.balance_of(&beneficiary), balance_after_first);
    assert_eq!(sim.balance_of(&wallet), 0);
}

#[test]
fn full_lifecycle_lock_ten_until_height_twenty() {
    let (mut sim, wallet) = setup();
    let deployer = sim.deployer().clone();
    let beneficiary = sim.account("wallet_1").unwrap();
    lock(&mut sim, &beneficiary, 20, 10, &deployer);

    // Claim at height 19 fails with 105.
    sim.mine_empty_blocks(18);
    assert_eq!(sim.block_height(), 19);
    assert_eq!(claim(&mut sim, &beneficiary).result.err_code(), Some(105));

    // Claim at height 20 succeeds; wallet empties, beneficiary +10.
    assert_eq!(sim.block_height(), 20);
    let receipt = claim(&mut sim, &beneficiary);
    assert!(receipt.result.is_ok());
    assert_eq!(sim.balance_of(&wallet), 0);
    assert_eq!(sim.balance_of(&beneficiary), GENESIS_BALANCE + 10);

    // Second claim fails.
    assert!(claim(&mut sim, &beneficiary).result.is_err());
}
