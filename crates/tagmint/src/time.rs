use chrono::{Datelike, Utc};

use crate::DatePartition;

/// A trait for clock sources that report the current calendar date.
///
/// Allocation partitions identifiers by the day they were minted, so the
/// engine only ever needs a date, never a time of day. This abstraction
/// allows you to plug in the system clock or a fixed date in tests.
///
/// # Example
///
/// ```
/// use tagmint::{DatePartition, DateSource};
///
/// struct FixedDate;
/// impl DateSource for FixedDate {
///     fn today(&self) -> DatePartition {
///         DatePartition::new(2024, 11, 18).expect("in bounds")
///     }
/// }
///
/// assert_eq!(FixedDate.today().to_string(), "20241118");
/// ```
pub trait DateSource: Send + Sync {
    /// Returns the date partition new identifiers should be minted under.
    fn today(&self) -> DatePartition;
}

/// A [`DateSource`] backed by the system clock, in UTC.
///
/// Sequences reset at UTC midnight regardless of the host timezone, so
/// identifiers from every deployment region land in the same partitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct UtcClock;

impl DateSource for UtcClock {
    /// Returns the current UTC calendar date.
    ///
    /// # Panics
    ///
    /// Panics if the system clock reports a date outside the supported
    /// 2000..=2100 year window.
    fn today(&self) -> DatePartition {
        let now = Utc::now().date_naive();
        u16::try_from(now.year())
            .ok()
            .and_then(|year| DatePartition::new(year, now.month() as u8, now.day() as u8).ok())
            .expect("system clock outside the supported 2000-2100 year window")
    }
}
