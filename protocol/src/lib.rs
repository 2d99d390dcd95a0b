// Copyright (c) 2026 Simnet Contributors. MIT License.
// See LICENSE for details.

//! # Simnet Protocol — Core Library
//!
//! A minimal deterministic ledger and contract-simulation core. This is the
//! machine your contract tests run against: a single-asset ledger, a block
//! clock, and a synchronous call dispatcher that behaves the same way every
//! single run. No networking, no mempool, no consensus — determinism is the
//! whole product.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual concerns of a
//! simulated chain:
//!
//! - **config** — Protocol constants and the genesis account roster.
//! - **principal** — Opaque account identities, standard and contract-owned.
//! - **ledger** — Single-asset balances with atomic, checked transfers.
//! - **clock** — The monotonic block-height counter.
//! - **value** — Dynamic values crossing the public call surface.
//! - **events** — Transfer events emitted by successful ledger movements.
//! - **receipt** — Call results, wire error codes, and receipts.
//! - **contract** — The `Contract` trait and per-call execution contexts.
//! - **simnet** — The harness runtime: deploy, call, mine, inspect.
//!
//! ## Design Philosophy
//!
//! 1. Every call is a synchronous state transition. Nothing suspends.
//! 2. A failed call changes nothing. Check everything, then mutate.
//! 3. The caller is an explicit parameter, never ambient context.
//! 4. If it touches balances, it has tests. Plural.

pub mod clock;
pub mod config;
pub mod contract;
pub mod events;
pub mod ledger;
pub mod principal;
pub mod receipt;
pub mod simnet;
pub mod value;

pub use clock::BlockClock;
pub use contract::{Contract, ReadContext, SimnetError, TxContext};
pub use events::Event;
pub use ledger::{Ledger, LedgerError};
pub use principal::Principal;
pub use receipt::{CallResult, ErrorCode, Receipt};
pub use simnet::{Call, Simnet};
pub use value::{Args, Value, ValueError};
