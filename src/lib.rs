#![doc(test(attr(deny(warnings))))]

//! Brewcost is a client for a homebrew-recipe costing server: it keeps a
//! recipe's ingredient ledger and per-category catalog caches consistent with
//! server state, derives line costs and running totals, and submits
//! packaging/markup parameters to the server-side pricing endpoint.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod pricing;
pub mod session;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env().add_directive("brewcost=info".parse().unwrap());
        fmt().with_env_filter(filter).init();
        tracing::info!("Brewcost tracing initialized.");
    });
}
