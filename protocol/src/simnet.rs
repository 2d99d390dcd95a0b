//! # Simnet — The Harness Runtime
//!
//! [`Simnet`] is the deterministic chain a test scenario runs against. It
//! owns the ledger, the block clock, and the deployed contracts, and it
//! exposes the full call surface: public calls, read-only calls, block
//! mining, and data-var introspection.
//!
//! ## Execution model
//!
//! Single-threaded, one transaction fully applied before the next begins.
//! Transactions within a block apply in submission order; the clock
//! advances by one after the block, never mid-block. A public call made
//! outside an explicit block is mined as its own single-transaction block,
//! so every public call advances the chain by one height — the same rhythm
//! scenario scripts were written against.

use tracing::{debug, info};

use crate::clock::BlockClock;
use crate::config::{DEPLOYER, GENESIS_BALANCE, STANDARD_WALLET_COUNT, WALLET_PREFIX};
use crate::contract::{
    Contract, ContractRegistry, ContractSlot, ReadContext, SimnetError, TxContext,
};
use crate::ledger::{Ledger, LedgerError};
use crate::principal::Principal;
use crate::receipt::Receipt;
use crate::value::{Args, Value};

// ---------------------------------------------------------------------------
// Call
// ---------------------------------------------------------------------------

/// One transaction to execute: a public entry point invocation.
#[derive(Clone, Debug)]
pub struct Call {
    /// Name of the deployed contract to call.
    pub contract: String,
    /// Public entry point to invoke.
    pub entry: String,
    /// Positional arguments.
    pub args: Args,
    /// The principal submitting the transaction.
    pub sender: Principal,
}

impl Call {
    /// Builds a call.
    pub fn new(
        contract: impl Into<String>,
        entry: impl Into<String>,
        args: Args,
        sender: Principal,
    ) -> Self {
        Self {
            contract: contract.into(),
            entry: entry.into(),
            args,
            sender,
        }
    }
}

// ---------------------------------------------------------------------------
// Simnet
// ---------------------------------------------------------------------------

/// The simulated chain: ledger, clock, and deployed contracts.
pub struct Simnet {
    ledger: Ledger,
    clock: BlockClock,
    registry: ContractRegistry,
    deployer: Principal,
    wallets: Vec<Principal>,
}

impl Simnet {
    /// Creates a fresh chain with the standard pre-funded account roster:
    /// `deployer` plus `wallet_1` .. `wallet_9`, each seeded with
    /// [`GENESIS_BALANCE`].
    pub fn new() -> Self {
        let mut ledger = Ledger::new();
        let deployer = Principal::new(DEPLOYER);
        // Genesis minting cannot overflow an empty ledger.
        let _ = ledger.mint(&deployer, GENESIS_BALANCE);

        let wallets: Vec<Principal> = (1..=STANDARD_WALLET_COUNT)
            .map(|n| Principal::new(format!("{WALLET_PREFIX}{n}")))
            .collect();
        for wallet in &wallets {
            let _ = ledger.mint(wallet, GENESIS_BALANCE);
        }

        info!(
            accounts = wallets.len() + 1,
            balance = GENESIS_BALANCE,
            "simnet initialized"
        );

        Self {
            ledger,
            clock: BlockClock::new(),
            registry: ContractRegistry::new(),
            deployer,
            wallets,
        }
    }

    /// The deploying principal that owns all contracts.
    pub fn deployer(&self) -> &Principal {
        &self.deployer
    }

    /// Looks up a standard account by name (`"deployer"`, `"wallet_1"`, ..).
    pub fn account(&self, name: &str) -> Option<Principal> {
        if name == DEPLOYER {
            return Some(self.deployer.clone());
        }
        self.wallets.iter().find(|w| w.as_str() == name).cloned()
    }

    /// Deploys a contract under `name` and returns its account principal
    /// (`deployer.name`), which is where its escrowed funds will live.
    ///
    /// # Errors
    ///
    /// Returns [`SimnetError::AlreadyDeployed`] if the name is taken.
    pub fn deploy(
        &mut self,
        name: &str,
        contract: Box<dyn Contract>,
    ) -> Result<Principal, SimnetError> {
        let principal = Principal::contract(&self.deployer, name);
        self.registry.insert(
            name.to_string(),
            ContractSlot {
                principal: principal.clone(),
                contract,
            },
        )?;
        debug!(contract = name, account = %principal, "contract deployed");
        Ok(principal)
    }

    /// The account principal of a deployed contract.
    pub fn contract_principal(&self, name: &str) -> Option<Principal> {
        self.registry.get(name).map(|slot| slot.principal.clone())
    }

    /// Current block height.
    pub fn block_height(&self) -> u64 {
        self.clock.height()
    }

    /// Ledger balance of any principal. Read-only convenience for tests.
    pub fn balance_of(&self, account: &Principal) -> u64 {
        self.ledger.balance_of(account)
    }

    /// Mints additional funds to an account. Scenario bootstrapping only.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if the credit would overflow.
    pub fn fund(&mut self, account: &Principal, amount: u64) -> Result<(), LedgerError> {
        self.ledger.mint(account, amount)
    }

    /// Executes one public call as its own single-transaction block.
    ///
    /// The clock advances by one after the call, exactly as if the call
    /// had been passed to [`mine_block`](Self::mine_block) alone.
    pub fn call_public_fn(
        &mut self,
        contract: &str,
        entry: &str,
        args: Args,
        sender: &Principal,
    ) -> Result<Receipt, SimnetError> {
        let call = Call::new(contract, entry, args, sender.clone());
        let receipt = self.execute_call(&call)?;
        self.clock.advance(1);
        Ok(receipt)
    }

    /// Executes a read-only entry point. No block is mined, no state can
    /// change, and the receipt carries no events.
    pub fn call_read_only_fn(
        &self,
        contract: &str,
        entry: &str,
        args: Args,
        sender: &Principal,
    ) -> Result<Receipt, SimnetError> {
        let slot = self
            .registry
            .get(contract)
            .ok_or_else(|| SimnetError::UnknownContract(contract.to_string()))?;

        let ctx = ReadContext {
            caller: sender.clone(),
            self_principal: slot.principal.clone(),
            height: self.clock.height(),
            ledger: &self.ledger,
        };
        let result = slot.contract.call_read_only(&ctx, entry, &args)?;
        Ok(Receipt {
            result,
            events: Vec::new(),
        })
    }

    /// Mines a block: applies all calls in submission order, then advances
    /// the clock by one.
    ///
    /// Contract-level failures land in their receipts; a harness fault in
    /// any call aborts the whole block.
    pub fn mine_block(&mut self, calls: Vec<Call>) -> Result<Vec<Receipt>, SimnetError> {
        let height = self.clock.height();
        let receipts = calls
            .iter()
            .map(|call| self.execute_call(call))
            .collect::<Result<Vec<_>, _>>()?;
        self.clock.advance(1);
        debug!(height, transactions = receipts.len(), "block mined");
        Ok(receipts)
    }

    /// Advances the chain by `n` blocks with no transactions.
    pub fn mine_empty_blocks(&mut self, n: u64) {
        self.clock.advance(n);
        debug!(height = self.clock.height(), "mined {n} empty blocks");
    }

    /// Reads a contract's named data variable. Test introspection only.
    ///
    /// # Errors
    ///
    /// Returns [`SimnetError::UnknownContract`] or
    /// [`SimnetError::UnknownDataVar`].
    pub fn get_data_var(&self, contract: &str, name: &str) -> Result<Value, SimnetError> {
        let slot = self
            .registry
            .get(contract)
            .ok_or_else(|| SimnetError::UnknownContract(contract.to_string()))?;
        slot.contract
            .data_var(name)
            .ok_or_else(|| SimnetError::UnknownDataVar {
                contract: contract.to_string(),
                name: name.to_string(),
            })
    }

    /// Applies one transaction against the current state.
    ///
    /// Events are buffered per call and dropped when the call fails, so a
    /// failing receipt never shows partial effects.
    fn execute_call(&mut self, call: &Call) -> Result<Receipt, SimnetError> {
        let mut slot = self
            .registry
            .take(&call.contract)
            .ok_or_else(|| SimnetError::UnknownContract(call.contract.clone()))?;

        let mut events = Vec::new();
        let mut ctx = TxContext {
            caller: call.sender.clone(),
            self_principal: slot.principal.clone(),
            height: self.clock.height(),
            ledger: &mut self.ledger,
            registry: &mut self.registry,
            events: &mut events,
        };
        let dispatched = slot.contract.call_public(&mut ctx, &call.entry, &call.args);
        self.registry.put_back(call.contract.clone(), slot);

        let result = dispatched?;
        if result.is_err() {
            debug!(
                contract = %call.contract,
                entry = %call.entry,
                code = result.err_code(),
                "call failed"
            );
            events.clear();
        }
        Ok(Receipt { result, events })
    }
}

impl Default for Simnet {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GENESIS_BALANCE;
    use crate::receipt::{CallResult, ErrorCode};

    /// A contract that pays one unit from the caller to itself per "ping".
    struct Toll;

    impl Contract for Toll {
        fn name(&self) -> &'static str {
            "toll"
        }

        fn call_public(
            &mut self,
            ctx: &mut TxContext<'_>,
            entry: &str,
            _args: &Args,
        ) -> Result<CallResult, SimnetError> {
            match entry {
                "ping" => {
                    let caller = ctx.caller.clone();
                    let this = ctx.self_principal.clone();
                    match ctx.transfer(&caller, &this, 1) {
                        Ok(()) => Ok(CallResult::Ok(Value::Bool(true))),
                        Err(e) => Ok(CallResult::Err(e.code())),
                    }
                }
                _ => Err(SimnetError::UnknownEntryPoint {
                    contract: "toll".to_string(),
                    entry: entry.to_string(),
                }),
            }
        }

        fn call_read_only(
            &self,
            ctx: &ReadContext<'_>,
            entry: &str,
            _args: &Args,
        ) -> Result<CallResult, SimnetError> {
            match entry {
                "height" => Ok(CallResult::Ok(Value::Uint(ctx.height))),
                _ => Err(SimnetError::UnknownReadOnly {
                    contract: "toll".to_string(),
                    entry: entry.to_string(),
                }),
            }
        }
    }

    #[test]
    fn roster_is_funded_at_genesis() {
        let sim = Simnet::new();
        assert_eq!(sim.balance_of(sim.deployer()), GENESIS_BALANCE);
        for n in 1..=STANDARD_WALLET_COUNT {
            let wallet = sim.account(&format!("wallet_{n}")).unwrap();
            assert_eq!(sim.balance_of(&wallet), GENESIS_BALANCE);
        }
        assert!(sim.account("wallet_0").is_none());
        assert!(sim.account("mallory").is_none());
    }

    #[test]
    fn public_call_mines_its_own_block() {
        let mut sim = Simnet::new();
        sim.deploy("toll", Box::new(Toll)).unwrap();
        let wallet = sim.account("wallet_1").unwrap();

        assert_eq!(sim.block_height(), 0);
        sim.call_public_fn("toll", "ping", Args::empty(), &wallet)
            .unwrap();
        assert_eq!(sim.block_height(), 1);
    }

    #[test]
    fn mine_block_applies_in_order_then_advances_once() {
        let mut sim = Simnet::new();
        let toll = sim.deploy("toll", Box::new(Toll)).unwrap();
        let wallet = sim.account("wallet_1").unwrap();

        let receipts = sim
            .mine_block(vec![
                Call::new("toll", "ping", Args::empty(), wallet.clone()),
                Call::new("toll", "ping", Args::empty(), wallet.clone()),
                Call::new("toll", "ping", Args::empty(), wallet),
            ])
            .unwrap();

        assert_eq!(receipts.len(), 3);
        assert!(receipts.iter().all(|r| r.result.is_ok()));
        assert_eq!(sim.block_height(), 1);
        assert_eq!(sim.balance_of(&toll), 3);
    }

    #[test]
    fn empty_blocks_advance_the_clock_only() {
        let mut sim = Simnet::new();
        let supply_before = sim.ledger.total_supply();
        sim.mine_empty_blocks(7);
        assert_eq!(sim.block_height(), 7);
        assert_eq!(sim.ledger.total_supply(), supply_before);
    }

    #[test]
    fn read_only_calls_do_not_mine() {
        let mut sim = Simnet::new();
        sim.deploy("toll", Box::new(Toll)).unwrap();
        let wallet = sim.account("wallet_1").unwrap();

        let receipt = sim
            .call_read_only_fn("toll", "height", Args::empty(), &wallet)
            .unwrap();

        assert_eq!(receipt.result.ok_value(), Some(&Value::Uint(0)));
        assert!(receipt.events.is_empty());
        assert_eq!(sim.block_height(), 0);
    }

    #[test]
    fn unknown_contract_is_a_harness_fault() {
        let mut sim = Simnet::new();
        let wallet = sim.account("wallet_1").unwrap();
        let result = sim.call_public_fn("ghost", "ping", Args::empty(), &wallet);
        assert!(matches!(result, Err(SimnetError::UnknownContract(_))));
    }

    #[test]
    fn failed_call_receipt_has_no_events() {
        let mut sim = Simnet::new();
        let toll = sim.deploy("toll", Box::new(Toll)).unwrap();
        let pauper = Principal::new("pauper"); // not on the roster, zero balance

        let receipt = sim
            .call_public_fn("toll", "ping", Args::empty(), &pauper)
            .unwrap();

        assert!(receipt.result.is_err());
        assert!(receipt.events.is_empty());
        assert_eq!(sim.balance_of(&toll), 0);
    }

    #[test]
    fn duplicate_deploy_rejected() {
        let mut sim = Simnet::new();
        sim.deploy("toll", Box::new(Toll)).unwrap();
        let result = sim.deploy("toll", Box::new(Toll));
        assert!(matches!(result, Err(SimnetError::AlreadyDeployed(_))));
    }

    #[test]
    fn contract_principal_is_deployer_scoped() {
        let mut sim = Simnet::new();
        let principal = sim.deploy("toll", Box::new(Toll)).unwrap();
        assert_eq!(principal.as_str(), "deployer.toll");
        assert_eq!(sim.contract_principal("toll"), Some(principal));
    }
}
