//! Analysis modules.
//!
//! The aggregation core: pure functions over the loaded roster.

pub mod aggregator;

pub use aggregator::*;
