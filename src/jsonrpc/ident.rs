//! Request identifiers and timestamps
//!
//! The upstream service checks that request ids and job timestamps have the
//! same numeric shape its own browser extension produces. Nothing here needs
//! cryptographic strength.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Range the id is drawn from before being scaled by [`ID_SCALE`]
pub const ID_RANGE: RangeInclusive<i64> = 8_300_000..=8_399_999;

/// Every id is a multiple of this
pub const ID_SCALE: i64 = 1000;

fn since_epoch() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

/// Generate a fresh request id in `[8_300_000_000, 8_399_999_000]`
///
/// The generator is reseeded from the nanosecond clock on every call, so two
/// requests issued back to back draw from different sequences.
pub fn new_id() -> i64 {
    let mut rng = StdRng::seed_from_u64(since_epoch().as_nanos() as u64);
    rng.gen_range(ID_RANGE) * ID_SCALE
}

/// Count occurrences of the lowercase letter `i`
///
/// Must be computed over the original, unsplit input text.
pub fn count_i(text: &str) -> usize {
    text.matches('i').count()
}

/// Job timestamp for the current time, adjusted by `i_count`
pub fn timestamp(i_count: usize) -> i64 {
    timestamp_at(since_epoch().as_millis() as i64, i_count)
}

/// Adjust a millisecond timestamp the way the upstream integrity check expects
///
/// With `i_count == 0` the timestamp is returned unchanged. Otherwise, with
/// `n = i_count + 1`, the result is `ts - ts % n + n`, which is always an
/// exact multiple of `n`.
///
/// # Example
///
/// ```
/// use deeplx::jsonrpc::ident::timestamp_at;
///
/// assert_eq!(timestamp_at(1_000_003, 0), 1_000_003);
/// assert_eq!(timestamp_at(1_000_003, 1), 1_000_004);
/// ```
pub fn timestamp_at(ts: i64, i_count: usize) -> i64 {
    if i_count == 0 {
        return ts;
    }
    let n = i_count as i64 + 1;
    ts - ts % n + n
}
