//! # Call Results, Wire Codes, and Receipts
//!
//! A public call either returns a [`Value`] or fails with a small integer
//! error code. The codes are part of the external contract — scenario
//! scripts written years ago assert on them bit-exactly — so contracts
//! implement [`ErrorCode`] to map their typed error enums onto the stable
//! wire representation.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::principal::Principal;
use crate::value::Value;

/// Maps a typed contract error onto its stable wire code.
///
/// Codes must never change once published: they are asserted bit-exactly
/// by external harnesses.
pub trait ErrorCode {
    /// The stable integer code for this error.
    fn code(&self) -> u64;
}

/// The outcome of a public or read-only call: a value or a wire code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallResult {
    /// The call succeeded with this return value.
    Ok(Value),
    /// The call failed with this stable error code. Prior state is intact.
    Err(u64),
}

impl CallResult {
    /// Returns `true` if the call succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, CallResult::Ok(_))
    }

    /// Returns `true` if the call failed.
    pub fn is_err(&self) -> bool {
        matches!(self, CallResult::Err(_))
    }

    /// The returned value, if the call succeeded.
    pub fn ok_value(&self) -> Option<&Value> {
        match self {
            CallResult::Ok(v) => Some(v),
            CallResult::Err(_) => None,
        }
    }

    /// The wire error code, if the call failed.
    pub fn err_code(&self) -> Option<u64> {
        match self {
            CallResult::Ok(_) => None,
            CallResult::Err(code) => Some(*code),
        }
    }
}

impl<E: ErrorCode> From<Result<Value, E>> for CallResult {
    fn from(result: Result<Value, E>) -> Self {
        match result {
            Ok(value) => CallResult::Ok(value),
            Err(e) => CallResult::Err(e.code()),
        }
    }
}

/// What the harness gets back for one executed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// The call outcome.
    pub result: CallResult,
    /// Events emitted during execution. Empty for failed calls and for
    /// read-only calls.
    pub events: Vec<Event>,
}

impl Receipt {
    /// Events narrowed to transfer triples `(sender, recipient, amount)`.
    /// Convenience for the exact-match assertions tests like to write.
    pub fn transfers(&self) -> Vec<(&Principal, &Principal, u64)> {
        self.events
            .iter()
            .map(|event| match event {
                Event::Transfer {
                    sender,
                    recipient,
                    amount,
                } => (sender, recipient, *amount),
            })
            .collect()
    }
}
