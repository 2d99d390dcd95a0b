//! # Values — The Dynamic Call Surface
//!
//! Arguments and results cross the contract boundary as [`Value`]s: a small
//! dynamic type covering exactly what the contracts need — unsigned
//! integers, booleans, principals, and lists thereof. Inside a contract the
//! values are immediately narrowed back to concrete types via the [`Args`]
//! accessors, which turn arity and type mistakes into structured errors
//! instead of panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::principal::Principal;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while narrowing dynamic values to concrete types.
///
/// These are harness-level faults: a malformed call is a bug in the test
/// script, not a contract failure, so they never become wire error codes.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The call supplied fewer arguments than the entry point requires.
    #[error("missing argument at index {index}, expected {expected}")]
    MissingArgument {
        /// Position of the missing argument.
        index: usize,
        /// The type the entry point expected there.
        expected: &'static str,
    },

    /// An argument had the wrong type.
    #[error("type mismatch at index {index}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Position of the offending argument.
        index: usize,
        /// The type the entry point expected.
        expected: &'static str,
        /// The type actually supplied.
        found: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A dynamic value crossing the public call surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// A non-negative integer (amounts, heights, counts, vote thresholds).
    Uint(u64),
    /// A boolean (ballots, success flags).
    Bool(bool),
    /// An account identity.
    Principal(Principal),
    /// A homogeneous-by-convention list (e.g. vault membership).
    List(Vec<Value>),
}

impl Value {
    /// Human-readable type name, used in mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Bool(_) => "bool",
            Value::Principal(_) => "principal",
            Value::List(_) => "list",
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Principal> for Value {
    fn from(v: Principal) -> Self {
        Value::Principal(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

/// Positional arguments to a contract entry point, with typed accessors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Args(Vec<Value>);

impl Args {
    /// Wraps a list of values as call arguments.
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// An empty argument list, for no-arg entry points.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn get(&self, index: usize, expected: &'static str) -> Result<&Value, ValueError> {
        self.0
            .get(index)
            .ok_or(ValueError::MissingArgument { index, expected })
    }

    /// The argument at `index`, narrowed to `u64`.
    pub fn uint(&self, index: usize) -> Result<u64, ValueError> {
        match self.get(index, "uint")? {
            Value::Uint(v) => Ok(*v),
            other => Err(ValueError::TypeMismatch {
                index,
                expected: "uint",
                found: other.type_name(),
            }),
        }
    }

    /// The argument at `index`, narrowed to `bool`.
    pub fn boolean(&self, index: usize) -> Result<bool, ValueError> {
        match self.get(index, "bool")? {
            Value::Bool(v) => Ok(*v),
            other => Err(ValueError::TypeMismatch {
                index,
                expected: "bool",
                found: other.type_name(),
            }),
        }
    }

    /// The argument at `index`, narrowed to a [`Principal`].
    pub fn principal(&self, index: usize) -> Result<Principal, ValueError> {
        match self.get(index, "principal")? {
            Value::Principal(p) => Ok(p.clone()),
            other => Err(ValueError::TypeMismatch {
                index,
                expected: "principal",
                found: other.type_name(),
            }),
        }
    }

    /// The argument at `index`, narrowed to a list of principals.
    pub fn principal_list(&self, index: usize) -> Result<Vec<Principal>, ValueError> {
        let items = match self.get(index, "list")? {
            Value::List(items) => items,
            other => {
                return Err(ValueError::TypeMismatch {
                    index,
                    expected: "list",
                    found: other.type_name(),
                })
            }
        };
        items
            .iter()
            .map(|item| match item {
                Value::Principal(p) => Ok(p.clone()),
                other => Err(ValueError::TypeMismatch {
                    index,
                    expected: "principal",
                    found: other.type_name(),
                }),
            })
            .collect()
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
