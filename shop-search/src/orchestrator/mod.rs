//! Source orchestrator: concurrent queries and fixed-precedence fallback.
//!
//! This module fans out a product query to every configured source
//! concurrently, waits for all of them, and keeps the listings of the first
//! source in configuration order that found anything.

pub mod fetch;

pub use fetch::{select_winner, FetchOrchestrator};
