use chrono::SecondsFormat;
use mockable::Clock;

/// Every timestamp we persist goes through here: UTC, whole seconds,
/// `+00:00` offset. Keeping one format means `created_at` and `updated_at`
/// sort correctly as plain strings.
pub fn timestamp(clock: &dyn Clock) -> String {
    clock.utc().to_rfc3339_opts(SecondsFormat::Secs, false)
}

#[cfg(test)]
pub use manual::ManualClock;
