//! # Multisig Vault Contract
//!
//! A fixed-membership voting state machine over fund custody. The lifecycle
//! is deliberately one-shot:
//!
//! 1. **Start** — the owner locks in the member list and the quorum
//!    (`votes-required`), exactly once, forever.
//! 2. **Vote** — members record ballots for arbitrary target principals;
//!    last write wins, ballots can flip any number of times.
//! 3. **Withdraw** — a caller who has gathered quorum (`true` ballots with
//!    themselves as target ≥ `votes-required`) drains the vault.
//!
//! Deposits are always allowed, even before `start` — custody is just a
//! ledger balance under the vault's own account.
//!
//! ## Wire error codes (stable forever)
//!
//! | code | meaning |
//! |------|---------|
//! | 100  | caller is not the owner |
//! | 101  | vault already locked |
//! | 102  | quorum larger than membership |
//! | 103  | caller is not a member |
//! | 104  | quorum not met |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use simnet_protocol::{
    Args, CallResult, Contract, ErrorCode, LedgerError, Principal, ReadContext, SimnetError,
    TxContext, Value,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors a vault entry point can fail with.
#[derive(Debug, Error)]
pub enum VaultError {
    /// `start` attempted by someone other than the owner.
    #[error("caller is not the contract owner")]
    OwnerOnly,

    /// `start` attempted after the vault was already locked.
    #[error("vault is already locked")]
    AlreadyLocked,

    /// The requested quorum exceeds the member count.
    #[error("votes required ({required}) exceeds member count ({members})")]
    MoreVotesThanMembers {
        /// The quorum that was requested.
        required: u64,
        /// How many members were supplied.
        members: usize,
    },

    /// `vote` attempted by a principal outside the member list.
    #[error("caller is not a vault member")]
    NotAMember,

    /// `withdraw` attempted without quorum.
    #[error("required vote count not met: have {tally}, need {required}")]
    VotesRequiredNotMet {
        /// Affirming ballots counted for the caller.
        tally: u64,
        /// The locked-in quorum.
        required: u64,
    },

    /// A ledger fault, propagated unchanged.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ErrorCode for VaultError {
    fn code(&self) -> u64 {
        match self {
            VaultError::OwnerOnly => 100,
            VaultError::AlreadyLocked => 101,
            VaultError::MoreVotesThanMembers { .. } => 102,
            VaultError::NotAMember => 103,
            VaultError::VotesRequiredNotMet { .. } => 104,
            VaultError::Ledger(e) => e.code(),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// The vault's one-shot lifecycle. Membership and quorum only exist once
/// locked, so "members set but not locked" cannot be represented.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum VaultLifecycle {
    /// Deployed, not yet started. No members, no quorum.
    Uninitialized,
    /// `start` succeeded. Membership and quorum are immutable from here on.
    Locked {
        /// The fixed member roster, in the order the owner supplied it.
        members: Vec<Principal>,
        /// Affirming ballots needed to authorize a withdrawal.
        votes_required: u64,
    },
}

/// The multisig vault contract state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultisigVault {
    /// Fixed at deployment; the only principal allowed to call `start`.
    owner: Principal,
    /// One-shot lifecycle holding membership and quorum once locked.
    lifecycle: VaultLifecycle,
    /// Ballots: voter → target → in-favor. Only members ever get entries.
    votes: BTreeMap<Principal, BTreeMap<Principal, bool>>,
}

impl MultisigVault {
    /// Creates an uninitialized vault owned by `owner`.
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            lifecycle: VaultLifecycle::Uninitialized,
            votes: BTreeMap::new(),
        }
    }

    /// The member roster. Empty until `start` succeeds.
    pub fn members(&self) -> &[Principal] {
        match &self.lifecycle {
            VaultLifecycle::Uninitialized => &[],
            VaultLifecycle::Locked { members, .. } => members,
        }
    }

    /// The locked-in quorum, zero until `start` succeeds.
    pub fn votes_required(&self) -> u64 {
        match &self.lifecycle {
            VaultLifecycle::Uninitialized => 0,
            VaultLifecycle::Locked { votes_required, .. } => *votes_required,
        }
    }

    /// Locks in the member list and quorum. One-shot.
    ///
    /// # Errors
    ///
    /// - [`VaultError::OwnerOnly`] — caller is not the owner.
    /// - [`VaultError::AlreadyLocked`] — `start` already succeeded;
    ///   every later call fails this way regardless of arguments.
    /// - [`VaultError::MoreVotesThanMembers`] — quorum impossible to reach.
    pub fn start(
        &mut self,
        caller: &Principal,
        members: Vec<Principal>,
        votes_required: u64,
    ) -> Result<Value, VaultError> {
        if caller != &self.owner {
            return Err(VaultError::OwnerOnly);
        }
        if matches!(self.lifecycle, VaultLifecycle::Locked { .. }) {
            return Err(VaultError::AlreadyLocked);
        }
        if votes_required > members.len() as u64 {
            return Err(VaultError::MoreVotesThanMembers {
                required: votes_required,
                members: members.len(),
            });
        }

        self.lifecycle = VaultLifecycle::Locked {
            members,
            votes_required,
        };
        Ok(Value::Bool(true))
    }

    /// Records the caller's ballot for `target`. Last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotAMember`] if the caller is not in the
    /// member roster (which includes everyone while uninitialized).
    pub fn vote(
        &mut self,
        caller: &Principal,
        target: Principal,
        in_favor: bool,
    ) -> Result<Value, VaultError> {
        if !self.members().contains(caller) {
            return Err(VaultError::NotAMember);
        }

        self.votes
            .entry(caller.clone())
            .or_default()
            .insert(target, in_favor);
        Ok(Value::Bool(true))
    }

    /// The stored ballot of `voter` for `target`, `false` if absent.
    pub fn get_vote(&self, voter: &Principal, target: &Principal) -> bool {
        self.votes
            .get(voter)
            .and_then(|ballots| ballots.get(target))
            .copied()
            .unwrap_or(false)
    }

    /// Counts members whose current ballot for `target` is affirmative.
    pub fn tally_votes(&self, target: &Principal) -> u64 {
        self.members()
            .iter()
            .filter(|member| self.get_vote(member, target))
            .count() as u64
    }

    /// Moves `amount` from the caller into vault custody. Always allowed.
    ///
    /// # Errors
    ///
    /// Propagates [`LedgerError`] if the caller cannot cover the deposit.
    pub fn deposit(&mut self, ctx: &mut TxContext<'_>, amount: u64) -> Result<Value, VaultError> {
        let caller = ctx.caller.clone();
        let vault = ctx.self_principal.clone();
        ctx.transfer(&caller, &vault, amount)?;
        Ok(Value::Bool(true))
    }

    /// Drains the entire vault balance to the caller, if the caller has
    /// gathered quorum (ballots are keyed on the caller as target).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::VotesRequiredNotMet`] without quorum. An
    /// unstarted vault has no reachable quorum, so it fails the same way.
    pub fn withdraw(&mut self, ctx: &mut TxContext<'_>) -> Result<Value, VaultError> {
        let required = match &self.lifecycle {
            VaultLifecycle::Locked { votes_required, .. } => *votes_required,
            VaultLifecycle::Uninitialized => {
                return Err(VaultError::VotesRequiredNotMet {
                    tally: 0,
                    required: u64::MAX,
                })
            }
        };

        let tally = self.tally_votes(&ctx.caller);
        if tally < required {
            return Err(VaultError::VotesRequiredNotMet { tally, required });
        }

        let caller = ctx.caller.clone();
        let vault = ctx.self_principal.clone();
        let balance = ctx.ledger.balance_of(&vault);
        ctx.transfer(&vault, &caller, balance)?;
        Ok(Value::Uint(balance))
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

impl Contract for MultisigVault {
    fn name(&self) -> &'static str {
        "multisig-vault"
    }

    fn call_public(
        &mut self,
        ctx: &mut TxContext<'_>,
        entry: &str,
        args: &Args,
    ) -> Result<CallResult, SimnetError> {
        match entry {
            "start" => {
                let members = args.principal_list(0)?;
                let votes_required = args.uint(1)?;
                Ok(self.start(&ctx.caller, members, votes_required).into())
            }
            "vote" => {
                let target = args.principal(0)?;
                let in_favor = args.boolean(1)?;
                Ok(self.vote(&ctx.caller, target, in_favor).into())
            }
            "deposit" => {
                let amount = args.uint(0)?;
                Ok(self.deposit(ctx, amount).into())
            }
            "withdraw" => Ok(self.withdraw(ctx).into()),
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
        args: &Args,
    ) -> Result<CallResult, SimnetError> {
        match entry {
            "get-vote" => {
                let voter = args.principal(0)?;
                let target = args.principal(1)?;
                Ok(CallResult::Ok(Value::Bool(self.get_vote(&voter, &target))))
            }
            "tally-votes" => {
                let target = args.principal(0)?;
                Ok(CallResult::Ok(Value::Uint(self.tally_votes(&target))))
            }
            _ => Err(SimnetError::UnknownReadOnly {
                contract: self.name().to_string(),
                entry: entry.to_string(),
            }),
        }
    }

    fn data_var(&self, name: &str) -> Option<Value> {
        match name {
            "members" => Some(Value::List(
                self.members()
                    .iter()
                    .cloned()
                    .map(Value::Principal)
                    .collect(),
            )),
            "votes-required" => Some(Value::Uint(self.votes_required())),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
