//! # Smart Claimant Contract
//!
//! A fan-out beneficiary for the timelocked wallet. Register this
//! contract's account as the wallet's beneficiary; when anyone triggers its
//! `claim`, it claims the wallet as an ordinary caller and splits the
//! proceeds equally among a fixed recipient list. The integer-division
//! remainder stays parked under the claimant's own account.
//!
//! Deliberately knows nothing the wallet doesn't advertise: it is wired up
//! purely through the public call surface, proving the wallet needs no
//! special cases for contract beneficiaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use simnet_protocol::{
    Args, CallResult, Contract, ErrorCode, LedgerError, Principal, ReadContext, SimnetError,
    TxContext, Value,
};

/// The fan-out claimant contract state. Configuration is fixed at
/// deployment; the contract itself holds no mutable state at all.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SmartClaimant {
    /// Deployed name of the timelocked wallet to claim from.
    wallet: String,
    /// Accounts the claimed amount is split across, equally.
    recipients: Vec<Principal>,
}

impl SmartClaimant {
    /// Creates a claimant that will claim from the contract deployed under
    /// `wallet` and disburse to `recipients`.
    pub fn new(wallet: impl Into<String>, recipients: Vec<Principal>) -> Self {
        Self {
            wallet: wallet.into(),
            recipients,
        }
    }

    /// Claims the wallet and disburses equal shares.
    ///
    /// The wallet sees this contract's account as the caller, so the claim
    /// only succeeds if this contract is the registered beneficiary and the
    /// unlock height has been reached. Wallet error codes are propagated
    /// unchanged.
    ///
    /// The wallet claim is this contract's point of no return: it drains
    /// the escrow and retires the wallet. So the share transfers are
    /// validated against the ledger *before* the nested call — a payout
    /// that cannot complete must fail while nothing has moved yet.
    fn claim(&self, ctx: &mut TxContext<'_>) -> Result<CallResult, SimnetError> {
        if let Some(e) = self.payout_blocker(ctx) {
            return Ok(CallResult::Err(e.code()));
        }

        let claimed = ctx.contract_call(&self.wallet, "claim", &Args::empty())?;
        if claimed.is_err() {
            return Ok(claimed);
        }

        if self.recipients.is_empty() {
            // Nothing to disburse to; the full amount stays parked here.
            return Ok(CallResult::Ok(Value::Bool(true)));
        }

        let this = ctx.self_principal.clone();
        let balance = ctx.ledger.balance_of(&this);
        let share = balance / self.recipients.len() as u64;

        for recipient in &self.recipients {
            if let Err(e) = ctx.transfer(&this, recipient, share) {
                return Ok(CallResult::Err(e.code()));
            }
        }
        Ok(CallResult::Ok(Value::Bool(true)))
    }

    /// Checks whether every recipient can absorb their share of the
    /// prospective payout, walking the credits against a scratch view of
    /// the ledger so duplicate recipients accumulate correctly.
    ///
    /// Returns the ledger error the disbursement would hit, or `None` when
    /// the fan-out is safe to attempt. A pool that itself overflows is not
    /// a blocker: the wallet claim fails atomically on that credit and
    /// nothing needs guarding.
    fn payout_blocker(&self, ctx: &TxContext<'_>) -> Option<LedgerError> {
        if self.recipients.is_empty() {
            return None;
        }

        let this = &ctx.self_principal;
        let incoming = ctx
            .registry
            .get(&self.wallet)
            .map(|slot| ctx.ledger.balance_of(&slot.principal))
            .unwrap_or(0);
        let pool = match ctx.ledger.balance_of(this).checked_add(incoming) {
            Some(pool) => pool,
            // The wallet claim itself fails atomically on that credit.
            None => return None,
        };
        let share = pool / self.recipients.len() as u64;

        let mut prospective: BTreeMap<&Principal, u64> = BTreeMap::new();
        for recipient in &self.recipients {
            if recipient == this {
                // Self-transfer is a ledger no-op.
                continue;
            }
            let current = prospective
                .get(recipient)
                .copied()
                .unwrap_or_else(|| ctx.ledger.balance_of(recipient));
            match current.checked_add(share) {
                Some(credited) => {
                    prospective.insert(recipient, credited);
                }
                None => {
                    return Some(LedgerError::Overflow {
                        account: recipient.clone(),
                        current,
                        credit: share,
                    })
                }
            }
        }
        None
    }
}

impl Contract for SmartClaimant {
    fn name(&self) -> &'static str {
        "smart-claimant"
    }

    fn call_public(
        &mut self,
        ctx: &mut TxContext<'_>,
        entry: &str,
        _args: &Args,
    ) -> Result<CallResult, SimnetError> {
        match entry {
            "claim" => self.claim(ctx),
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
