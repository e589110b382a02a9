//! Dashboard counters.

use serde::Serialize;

/// Number of stored records per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub services: u64,
    pub trainers: u64,
    pub products: u64,
    pub news: u64,
    pub training_requests: u64,
}
