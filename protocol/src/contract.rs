//! # The Contract Seam
//!
//! Everything a contract can see or touch during a call comes through here.
//! A contract implements [`Contract`] and receives an explicit context per
//! call — the caller, the contract's own account, the block height, and the
//! ledger. No ambient state, no thread-locals: a contract is an ordinary
//! value you can drive from a unit test without a harness.
//!
//! ## Mutation discipline
//!
//! Atomicity rests on one rule, enforced by convention and review: an entry
//! point performs **all** of its failure checks before its first state
//! mutation. Authorization first, then state preconditions, then resource
//! checks via the ledger's own atomic transfer. A call that returns an
//! error code has changed nothing.
//!
//! ## Nested calls
//!
//! [`TxContext::contract_call`] lets one contract invoke another (the
//! smart-claimant pattern). The callee's slot is checked out of the
//! registry for the duration of the call, which incidentally makes direct
//! re-entry into the caller impossible — its own slot is already out.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::events::Event;
use crate::ledger::{Ledger, LedgerError};
use crate::principal::Principal;
use crate::receipt::CallResult;
use crate::value::{Args, ValueError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Harness-level faults: bugs in the scenario script or the deployment
/// setup, as opposed to contract error codes, which are ordinary outcomes.
#[derive(Debug, Error)]
pub enum SimnetError {
    /// No contract is deployed under this name.
    #[error("unknown contract: {0}")]
    UnknownContract(String),

    /// A contract name was deployed twice.
    #[error("contract already deployed: {0}")]
    AlreadyDeployed(String),

    /// The contract has no such public entry point.
    #[error("contract {contract} has no public entry point '{entry}'")]
    UnknownEntryPoint {
        /// The contract that was called.
        contract: String,
        /// The entry point that does not exist.
        entry: String,
    },

    /// The contract has no such read-only entry point.
    #[error("contract {contract} has no read-only entry point '{entry}'")]
    UnknownReadOnly {
        /// The contract that was called.
        contract: String,
        /// The entry point that does not exist.
        entry: String,
    },

    /// The named data variable does not exist on the contract.
    #[error("contract {contract} has no data var '{name}'")]
    UnknownDataVar {
        /// The contract that was inspected.
        contract: String,
        /// The variable that does not exist.
        name: String,
    },

    /// Malformed call arguments.
    #[error(transparent)]
    BadArgument(#[from] ValueError),
}

// ---------------------------------------------------------------------------
// Contract trait
// ---------------------------------------------------------------------------

/// A deployed contract: a named bundle of state with public entry points,
/// read-only entry points, and introspectable data variables.
pub trait Contract {
    /// The contract's name, used in error messages and event attribution.
    fn name(&self) -> &'static str;

    /// Dispatches a public (state-mutating) entry point.
    ///
    /// Contract-level failures are returned as `Ok(CallResult::Err(code))`;
    /// the outer `Result` is reserved for harness faults such as unknown
    /// entry points or malformed arguments.
    fn call_public(
        &mut self,
        ctx: &mut TxContext<'_>,
        entry: &str,
        args: &Args,
    ) -> Result<CallResult, SimnetError>;

    /// Dispatches a read-only entry point.
    ///
    /// Takes `&self`: read-only calls cannot mutate contract state by
    /// construction, and [`ReadContext`] only hands out a shared ledger.
    fn call_read_only(
        &self,
        ctx: &ReadContext<'_>,
        entry: &str,
        args: &Args,
    ) -> Result<CallResult, SimnetError>;

    /// Exposes a named state variable for test introspection. Contracts
    /// never call this on each other.
    fn data_var(&self, _name: &str) -> Option<crate::value::Value> {
        None
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// A deployed contract plus the principal that holds its funds.
pub struct ContractSlot {
    /// The contract's own account (`deployer.name`).
    pub principal: Principal,
    /// The contract state and logic.
    pub contract: Box<dyn Contract>,
}

/// All deployed contracts, keyed by name.
///
/// Dispatch checks a slot out of the registry, runs the call, and puts it
/// back — the take/put-back dance is what lets a contract borrow the rest
/// of the world (ledger, other contracts) while it runs.
#[derive(Default)]
pub struct ContractRegistry {
    slots: BTreeMap<String, ContractSlot>,
}

impl ContractRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a contract under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SimnetError::AlreadyDeployed`] if the name is taken.
    pub fn insert(&mut self, name: String, slot: ContractSlot) -> Result<(), SimnetError> {
        if self.slots.contains_key(&name) {
            return Err(SimnetError::AlreadyDeployed(name));
        }
        self.slots.insert(name, slot);
        Ok(())
    }

    /// Checks a slot out for execution. The contract is absent from the
    /// registry until [`put_back`](Self::put_back).
    pub fn take(&mut self, name: &str) -> Option<ContractSlot> {
        self.slots.remove(name)
    }

    /// Returns a checked-out slot.
    pub fn put_back(&mut self, name: String, slot: ContractSlot) {
        self.slots.insert(name, slot);
    }

    /// Shared access to a deployed contract, for read-only dispatch.
    pub fn get(&self, name: &str) -> Option<&ContractSlot> {
        self.slots.get(name)
    }
}

// ---------------------------------------------------------------------------
// Execution contexts
// ---------------------------------------------------------------------------

/// Everything a public entry point can touch during one transaction.
pub struct TxContext<'a> {
    /// Who submitted (or, for nested calls, made) this call.
    pub caller: Principal,
    /// The executing contract's own account.
    pub self_principal: Principal,
    /// Block height at which this transaction executes.
    pub height: u64,
    /// The shared ledger. The only cross-contract mutable resource.
    pub ledger: &'a mut Ledger,
    /// The rest of the deployed world, for nested calls.
    pub registry: &'a mut ContractRegistry,
    /// Sink for events emitted by this transaction.
    pub events: &'a mut Vec<Event>,
}

impl TxContext<'_> {
    /// Moves funds on the ledger and records the transfer event.
    ///
    /// Contracts move only their own funds or their caller's — `from`
    /// should be `self.caller` or `self.self_principal`.
    ///
    /// # Errors
    ///
    /// Propagates [`LedgerError`] unchanged; no event is recorded on
    /// failure.
    pub fn transfer(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.ledger.transfer(from, to, amount)?;
        self.events.push(Event::Transfer {
            sender: from.clone(),
            recipient: to.clone(),
            amount,
        });
        Ok(())
    }

    /// Invokes a public entry point on another contract.
    ///
    /// The callee sees this contract's account as its caller. Ledger,
    /// events, and height are shared with the outer transaction; the
    /// callee's outcome is returned unchanged so the caller can propagate
    /// wire codes verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SimnetError::UnknownContract`] if no such contract is
    /// deployed — or if the target is this contract itself, whose slot is
    /// checked out while it runs.
    pub fn contract_call(
        &mut self,
        target: &str,
        entry: &str,
        args: &Args,
    ) -> Result<CallResult, SimnetError> {
        let mut slot = self
            .registry
            .take(target)
            .ok_or_else(|| SimnetError::UnknownContract(target.to_string()))?;

        let mut inner = TxContext {
            caller: self.self_principal.clone(),
            self_principal: slot.principal.clone(),
            height: self.height,
            ledger: &mut *self.ledger,
            registry: &mut *self.registry,
            events: &mut *self.events,
        };
        let result = slot.contract.call_public(&mut inner, entry, args);

        self.registry.put_back(target.to_string(), slot);
        result
    }
}

/// Everything a read-only entry point can see. No mutation paths.
pub struct ReadContext<'a> {
    /// Who made the read-only call.
    pub caller: Principal,
    /// The executing contract's own account.
    pub self_principal: Principal,
    /// Current block height.
    pub height: u64,
    /// Shared view of the ledger.
    pub ledger: &'a Ledger,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    /// Minimal contract that echoes its caller and forwards calls.
    struct Echo;

    impl Contract for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn call_public(
            &mut self,
            ctx: &mut TxContext<'_>,
            entry: &str,
            args: &Args,
        ) -> Result<CallResult, SimnetError> {
            match entry {
                "whoami" => Ok(CallResult::Ok(Value::Principal(ctx.caller.clone()))),
                "forward" => {
                    // Nested call into another echo instance.
                    ctx.contract_call("echo-2", "whoami", args)
                }
                "recurse" => ctx.contract_call("echo", "whoami", args),
                _ => Err(SimnetError::UnknownEntryPoint {
                    contract: self.name().to_string(),
                    entry: entry.to_string(),
                }),
            }
        }

        fn call_read_only(
            &self,
            _ctx: &ReadContext<'_>,
            entry: &str,
            _args: &Args,
        ) -> Result<CallResult, SimnetError> {
            Err(SimnetError::UnknownReadOnly {
                contract: self.name().to_string(),
                entry: entry.to_string(),
            })
        }
    }

    fn deploy(registry: &mut ContractRegistry, name: &str) {
        registry
            .insert(
                name.to_string(),
                ContractSlot {
                    principal: Principal::contract(&Principal::new("deployer"), name),
                    contract: Box::new(Echo),
                },
            )
            .unwrap();
    }

    fn dispatch(
        registry: &mut ContractRegistry,
        ledger: &mut Ledger,
        events: &mut Vec<Event>,
        contract: &str,
        entry: &str,
    ) -> Result<CallResult, SimnetError> {
        let mut slot = registry.take(contract).unwrap();
        let mut ctx = TxContext {
            caller: Principal::new("wallet_1"),
            self_principal: slot.principal.clone(),
            height: 0,
            ledger,
            registry,
            events,
        };
        let result = slot.contract.call_public(&mut ctx, entry, &Args::empty());
        registry.put_back(contract.to_string(), slot);
        result
    }

    #[test]
    fn nested_call_sees_contract_as_caller() {
        let mut registry = ContractRegistry::new();
        deploy(&mut registry, "echo");
        deploy(&mut registry, "echo-2");
        let mut ledger = Ledger::new();
        let mut events = Vec::new();

        let result = dispatch(&mut registry, &mut ledger, &mut events, "echo", "forward").unwrap();

        assert_eq!(
            result.ok_value(),
            Some(&Value::Principal(Principal::contract(
                &Principal::new("deployer"),
                "echo"
            )))
        );
    }

    #[test]
    fn self_reentry_is_blocked() {
        let mut registry = ContractRegistry::new();
        deploy(&mut registry, "echo");
        let mut ledger = Ledger::new();
        let mut events = Vec::new();

        let result = dispatch(&mut registry, &mut ledger, &mut events, "echo", "recurse");

        assert!(matches!(result, Err(SimnetError::UnknownContract(_))));
        // The slot must be back in the registry after the failed call.
        assert!(registry.get("echo").is_some());
    }

    #[test]
    fn duplicate_deploy_rejected() {
        let mut registry = ContractRegistry::new();
        deploy(&mut registry, "echo");
        let result = registry.insert(
            "echo".to_string(),
            ContractSlot {
                principal: Principal::new("deployer.echo"),
                contract: Box::new(Echo),
            },
        );
        assert!(matches!(result, Err(SimnetError::AlreadyDeployed(_))));
    }

    #[test]
    fn context_transfer_records_event() {
        let mut registry = ContractRegistry::new();
        let mut ledger = Ledger::new();
        let alice = Principal::new("alice");
        let vault = Principal::new("deployer.vault");
        ledger.mint(&alice, 100).unwrap();
        let mut events = Vec::new();

        let mut ctx = TxContext {
            caller: alice.clone(),
            self_principal: vault.clone(),
            height: 0,
            ledger: &mut ledger,
            registry: &mut registry,
            events: &mut events,
        };
        ctx.transfer(&alice, &vault, 40).unwrap();

        assert_eq!(
            events,
            vec![Event::Transfer {
                sender: alice,
                recipient: vault,
                amount: 40,
            }]
        );
    }

    #[test]
    fn failed_transfer_records_nothing() {
        let mut registry = ContractRegistry::new();
        let mut ledger = Ledger::new();
        let mut events = Vec::new();
        let alice = Principal::new("alice");
        let vault = Principal::new("deployer.vault");

        let mut ctx = TxContext {
            caller: alice.clone(),
            self_principal: vault.clone(),
            height: 0,
            ledger: &mut ledger,
            registry: &mut registry,
            events: &mut events,
        };
        assert!(ctx.transfer(&alice, &vault, 40).is_err());
        assert!(events.is_empty());
    }
}
