//! Domain types: bars and quotes.

pub mod bar;
pub mod quote;

pub use bar::PriceBar;
pub use quote::QuoteRecord;
