//! # Principals — Opaque Account Identities
//!
//! A [`Principal`] identifies an account on the simulated chain. It is an
//! opaque string: the core never parses it beyond exact equality, which is
//! all that membership checks, vote keys, and balance lookups need.
//!
//! Two kinds exist by convention:
//!
//! - **Standard principals** — plain names like `wallet_1`, owned by the
//!   harness.
//! - **Contract principals** — rendered as `deployer.contract-name`, owned
//!   by a deployed contract. Funds held in escrow live under these.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque account identity. Equality is exact string equality.
///
/// `Principal` is cheap to clone and ordered, so it works as a map key in
/// the deterministic `BTreeMap`s used throughout the core.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Creates a principal from any string-like identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the principal that owns a deployed contract's account.
    ///
    /// Rendered as `"{deployer}.{name}"` — the same attribution that shows
    /// up as sender/recipient in transfer events when a contract moves its
    /// escrowed funds.
    pub fn contract(deployer: &Principal, name: &str) -> Self {
        Self(format!("{}.{}", deployer.0, name))
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this is a contract principal (by the `.` naming
    /// convention). Purely informational; the core never branches on it.
    pub fn is_contract(&self) -> bool {
        self.0.contains('.')
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Principal {
    fn from(id: String) -> Self {
        Self(id)
    }
}
