//! Domain services: slug generation and usage limiting.

pub mod slug;
pub mod usage;

pub use usage::{CounterStore, DAILY_MESSAGE_LIMIT, LimitCheck, UsageLedger, UsageStats};
