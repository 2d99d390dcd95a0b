//! # Counter Contract
//!
//! A per-principal monotonic counter. Each caller gets their own count,
//! created lazily on first increment; nothing ever resets or destroys an
//! entry. No authorization, no time, no funds — this contract exists as
//! the baseline sanity check for the call surface itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use simnet_protocol::{
    Args, CallResult, Contract, Principal, ReadContext, SimnetError, TxContext, Value,
};

/// Per-principal counts. Absent entry means zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Counter {
    counts: BTreeMap<Principal, u64>,
}

impl Counter {
    /// Creates a counter with no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the caller's count and returns the new value.
    /// Always succeeds; saturates at `u64::MAX` rather than wrapping.
    pub fn count_up(&mut self, caller: &Principal) -> u64 {
        let count = self.counts.entry(caller.clone()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    /// The count for a principal, zero if they never counted.
    pub fn get_count(&self, who: &Principal) -> u64 {
        self.counts.get(who).copied().unwrap_or(0)
    }
}

impl Contract for Counter {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn call_public(
        &mut self,
        ctx: &mut TxContext<'_>,
        entry: &str,
        _args: &Args,
    ) -> Result<CallResult, SimnetError> {
        match entry {
            "count-up" => Ok(CallResult::Ok(Value::Uint(self.count_up(&ctx.caller)))),
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
            "get-count" => {
                let who = args.principal(0)?;
                Ok(CallResult::Ok(Value::Uint(self.get_count(&who))))
            }
            _ => Err(SimnetError::UnknownReadOnly {
                contract: self.name().to_string(),
                entry: entry.to_string(),
            }),
        }
    }
}
