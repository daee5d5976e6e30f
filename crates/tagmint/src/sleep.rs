use core::time::Duration;

/// A trait that abstracts over how to sleep for a given [`Duration`] in
/// async contexts.
///
/// Allocation backoff and backfill pacing both need a timer, but the
/// engine does not pick an async runtime. Implementations bridge to
/// `tokio`, `smol`, or anything else that can produce a sleep future.
pub trait SleepProvider {
    /// We require `Send` so that the future can be safely moved across threads
    type Sleep: Future<Output = ()> + Send;

    fn sleep_for(dur: Duration) -> Self::Sleep;
}
