//! UTC timestamp normalization, grounded on the original's
//! `core/utils/datetime_utils.py`.

use chrono::{DateTime, Utc};

/// Returns a [`DateTime<Utc>`] unchanged. `chrono::DateTime<Utc>` is always
/// offset-aware and in UTC by construction, so there's no naive/aware
/// mismatch to fix up here; this function exists as the single named
/// choke-point every timestamp entering persistence must pass through, per
/// the design notes' "normalization helper" requirement.
pub fn normalize_to_utc(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt
}

/// The current UTC instant.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Whether `expires_at` is at or before the current instant.
pub fn is_expired(expires_at: DateTime<Utc>) -> bool {
    normalize_to_utc(expires_at) <= now_utc()
}
