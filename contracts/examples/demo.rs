//! End-to-end walkthrough of the simnet and the shipped contracts.
//!
//! Run with `cargo run --example demo -p simnet-contracts`. Set
//! `RUST_LOG=debug` to watch the harness log every block and call.

use tracing::info;
use tracing_subscriber::EnvFilter;

use simnet_contracts::{MultisigVault, SmartClaimant, TimelockedWallet};
use simnet_protocol::{Args, Simnet, Value};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut sim = Simnet::new();
    let deployer = sim.deployer().clone();

    // ---- multisig vault: deposit, vote, withdraw -------------------------

    let vault = sim
        .deploy("multisig-vault", Box::new(MultisigVault::new(deployer.clone())))
        .expect("fresh name");
    info!(account = %vault, "deployed multisig vault");

    let members: Vec<_> = ["wallet_1", "wallet_2", "wallet_3"]
        .iter()
        .map(|n| sim.account(n).expect("roster account"))
        .collect();
    let members_value = Value::List(members.iter().cloned().map(Value::Principal).collect());
    sim.call_public_fn(
        "multisig-vault",
        "start",
        Args::new(vec![members_value, Value::Uint(2)]),
        &deployer,
    )
    .expect("start");

    let depositor = sim.account("wallet_9").expect("roster account");
    sim.call_public_fn(
        "multisig-vault",
        "deposit",
        Args::new(vec![Value::Uint(5_000)]),
        &depositor,
    )
    .expect("deposit");

    let target = sim.account("wallet_5").expect("roster account");
    for voter in &members[..2] {
        sim.call_public_fn(
            "multisig-vault",
            "vote",
            Args::new(vec![Value::Principal(target.clone()), Value::Bool(true)]),
            voter,
        )
        .expect("vote");
    }

    let receipt = sim
        .call_public_fn("multisig-vault", "withdraw", Args::empty(), &target)
        .expect("withdraw");
    info!(result = ?receipt.result, "vault withdrawal");
    for (sender, recipient, amount) in receipt.transfers() {
        info!(%sender, %recipient, amount, "transfer");
    }

    // ---- timelocked wallet with a smart claimant -------------------------

    sim.deploy(
        "timelocked-wallet",
        Box::new(TimelockedWallet::new(deployer.clone())),
    )
    .expect("fresh name");
    let claimant = sim
        .deploy(
            "smart-claimant",
            Box::new(SmartClaimant::new("timelocked-wallet", members)),
        )
        .expect("fresh name");

    let unlock_height = sim.block_height() + 10;
    sim.call_public_fn(
        "timelocked-wallet",
        "lock",
        Args::new(vec![
            Value::Principal(claimant.clone()),
            Value::Uint(unlock_height),
            Value::Uint(900),
        ]),
        &deployer,
    )
    .expect("lock");
    info!(unlock_height, "locked 900 for the claimant");

    // Too early: the wallet refuses with its stable code.
    let early = sim
        .call_public_fn("smart-claimant", "claim", Args::empty(), &deployer)
        .expect("call");
    info!(code = ?early.result.err_code(), "claim before unlock height");

    sim.mine_empty_blocks(10);

    let receipt = sim
        .call_public_fn("smart-claimant", "claim", Args::empty(), &deployer)
        .expect("call");
    info!(result = ?receipt.result, height = sim.block_height(), "claim at unlock height");
    for (sender, recipient, amount) in receipt.transfers() {
        info!(%sender, %recipient, amount, "transfer");
    }
}
