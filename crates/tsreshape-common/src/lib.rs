//! Shared utilities for tsreshape crates.
//!
//! This crate provides common utilities used across the tsreshape workspace,
//! including Polars `AnyValue` rendering and positional gather helpers.

pub mod gather;
pub mod values;

// Re-export commonly used functions at crate root for convenience
pub use gather::{gather, gather_stacked, stack_series};
pub use values::{any_to_string, format_numeric};
