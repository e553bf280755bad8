//! Dealabs-specific modules for HTTP client, parsing, and selectors.

pub mod client;
pub mod parser;
pub mod selectors;

pub use client::{DealSource, DealabsClient};
pub use parser::{parse_search, parse_thread};
