//! Campaign statistics from a Telegram-style promotion platform.
//!
//! [`Collector::collect`] fetches a campaign's dashboard page and its daily
//! graph export, scrapes and parses both, and reduces them into a single
//! [`Statistics`] value.

pub mod collector;
pub mod config;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod header;
pub mod output;
pub mod stats;

pub use collector::Collector;
pub use config::Config;
pub use error::{ErrorKind, StatsError};
pub use stats::{Statistics, StatsElem};
