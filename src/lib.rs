//! shopapi: HTTP host for product search.
//!
//! Wires the [`shop_search`] core into an axum server:
//! - **Config**: TOML file with `[server]` and `[search]` tables
//! - **Server**: `GET /search?q=` returning `{query, cached, results}`
//!
//! Searching, fallback between sources, caching and package-size
//! normalisation all live in `shop-search`.

pub mod config;
pub mod error;
pub mod server;

pub use config::{AppConfig, ServerConfig};
pub use error::{AppError, Result};
pub use server::{SearchResponse, router, run_server, serve};
