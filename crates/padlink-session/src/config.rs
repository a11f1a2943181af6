//! Session timing configuration.

use std::time::Duration;

use tracing::warn;

/// Timing knobs for a [`Session`](crate::Session).
///
/// Sensible defaults are provided; values are clamped into safe ranges by
/// [`validated`](SessionConfig::validated), which the session applies on
/// construction.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Bounded wait of one [`poll`](crate::Session::poll) pump.
    ///
    /// Long enough not to busy-spin, short enough not to starve the
    /// caller's input sampling. Default: 2 ms.
    pub poll_wait: Duration,

    /// How long [`disconnect`](crate::Session::disconnect) waits for the
    /// peer to acknowledge a graceful close before forcibly resetting it.
    ///
    /// Default: 3 s. This is the one intentionally long wait in the
    /// session and only ever runs during teardown.
    pub disconnect_wait: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_wait: Duration::from_millis(2),
            disconnect_wait: Duration::from_secs(3),
        }
    }
}

impl SessionConfig {
    /// Shortest allowed poll wait. Zero would busy-spin the loop.
    pub const MIN_POLL_WAIT: Duration = Duration::from_millis(1);
    /// Longest allowed poll wait. Anything above this starves sampling.
    pub const MAX_POLL_WAIT: Duration = Duration::from_millis(100);
    /// Longest allowed teardown drain.
    pub const MAX_DISCONNECT_WAIT: Duration = Duration::from_secs(30);

    /// Clamps out-of-range values so the config is safe to use.
    pub fn validated(mut self) -> Self {
        if self.poll_wait < Self::MIN_POLL_WAIT
            || self.poll_wait > Self::MAX_POLL_WAIT
        {
            warn!(
                poll_wait_ms = self.poll_wait.as_millis() as u64,
                "poll_wait out of range — clamping"
            );
            self.poll_wait = self
                .poll_wait
                .clamp(Self::MIN_POLL_WAIT, Self::MAX_POLL_WAIT);
        }
        if self.disconnect_wait > Self::MAX_DISCONNECT_WAIT {
            warn!(
                disconnect_wait_ms = self.disconnect_wait.as_millis() as u64,
                "disconnect_wait out of range — clamping"
            );
            self.disconnect_wait = Self::MAX_DISCONNECT_WAIT;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_range() {
        let config = SessionConfig::default().validated();
        assert_eq!(config.poll_wait, Duration::from_millis(2));
        assert_eq!(config.disconnect_wait, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_poll_wait_is_clamped_up() {
        let config = SessionConfig {
            poll_wait: Duration::ZERO,
            ..Default::default()
        }
        .validated();
        assert_eq!(config.poll_wait, SessionConfig::MIN_POLL_WAIT);
    }

    #[test]
    fn test_oversized_waits_are_clamped_down() {
        let config = SessionConfig {
            poll_wait: Duration::from_secs(5),
            disconnect_wait: Duration::from_secs(600),
        }
        .validated();
        assert_eq!(config.poll_wait, SessionConfig::MAX_POLL_WAIT);
        assert_eq!(
            config.disconnect_wait,
            SessionConfig::MAX_DISCONNECT_WAIT
        );
    }
}
