//! Time and timestamp helpers.

use chrono::{DateTime, SubsecRound, Utc};

/// UTC timestamp used for `created_at`, `updated_at` and token bookkeeping.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time, truncated to whole seconds so the value
/// survives an RFC 3339 roundtrip through storage unchanged.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(0)
}
