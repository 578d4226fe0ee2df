use std::time::Duration;

use rand::Rng;

/// Add up to `jitter_percent` percent of random jitter to `base`.
pub fn jitter_wait(base: Duration, jitter_percent: u8) -> Duration {
    if jitter_percent == 0 || base.is_zero() {
        return base;
    }
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let jitter_range = std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100);
    let mut rng = rand::rng();
    base + Duration::from_millis(rng.random_range(0..jitter_range))
}
