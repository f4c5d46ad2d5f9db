// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::indexing_slicing
    )
)]

pub mod asset;
pub mod auth;
pub mod block;
pub mod config;
pub mod cors;
pub mod db;
pub mod drop;
pub mod gallery;
pub mod http_logging;
pub mod logging;
pub mod metrics;
pub mod notification;
pub mod ordering;
pub mod search;
pub mod server;
pub mod stream;
pub mod user;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, load_config_from, ServerConfig};
pub use db::{Database, DbError};
pub use server::{build_router, AppState};
