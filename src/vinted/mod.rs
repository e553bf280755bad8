//! Vinted-specific modules for HTTP client, parsing, and selectors.

pub mod client;
pub mod parser;
pub mod selectors;

pub use client::{MarketSource, VintedClient};
pub use parser::{parse_item, parse_search};
