#![doc(test(attr(deny(warnings))))]

//! Expense Core tracks monthly spending: a month-keyed transaction ledger,
//! category budgets, informal debts, bill splits, JSON persistence and backups,
//! plus an interactive shell over all of it.
//!
//! - [`ledger`] holds the domain types and their invariants.
//! - [`storage`] persists each store and reads/writes backup documents.
//! - [`core`] wires the stores together behind [`core::AppContext`].
//! - [`config`] keeps user preferences such as theme and default sort.
//! - [`cli`] is the command shell.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "expense core initialized");
    });
}
