//! Delay policy applied between attempts that failed at the transport level.
//!
//! Only transport failures (connection refused, DNS failure, timeouts) are
//! retried. A response with a non-2xx status ends the call immediately.

use std::time::Duration;

/// Default step of the linear backoff.
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(500);

/// Defines how long to wait before the next attempt.
///
/// # Examples
///
/// ```
/// use requester::Backoff;
/// use std::time::Duration;
///
/// // 500ms, 1s, 1.5s, ...
/// let linear = Backoff::default();
/// assert_eq!(linear.delay_after(1), Duration::from_millis(500));
/// assert_eq!(linear.delay_after(3), Duration::from_millis(1500));
///
/// // Retry immediately
/// let none = Backoff::None;
/// assert_eq!(none.delay_after(5), Duration::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Retry without waiting.
    None,

    /// Wait `attempt * step` after the given failed attempt.
    ///
    /// The delay grows linearly, is not capped and carries no jitter.
    Linear {
        /// The delay added for each failed attempt.
        step: Duration,
    },
}

impl Backoff {
    /// Creates a linear backoff with the given step.
    pub fn linear(step: Duration) -> Self {
        Backoff::Linear { step }
    }

    /// Returns the delay to wait after a failed attempt.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The attempt that just failed (1-indexed, so 1 = first attempt)
    pub fn delay_after(&self, attempt: usize) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Linear { step } => {
                step.saturating_mul(u32::try_from(attempt).unwrap_or(u32::MAX))
            }
        }
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Linear {
            step: DEFAULT_BACKOFF_STEP,
        }
    }
}
