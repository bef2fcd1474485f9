//! Monotonic time source
//!
//! Used for the bounded startup wait and for swap frame pacing.

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since an arbitrary fixed epoch (usually boot)
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `since_ms`, saturating at zero
    fn elapsed_ms(&self, since_ms: u64) -> u64 {
        self.now_ms().saturating_sub(since_ms)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u64 {
        T::now_ms(self)
    }
}

/// Clock backed by the embassy time driver
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn test_elapsed_ms() {
        let clock = FixedClock(1_500);
        assert_eq!(clock.elapsed_ms(1_000), 500);
    }

    #[test]
    fn test_elapsed_ms_saturates() {
        let clock = FixedClock(100);
        assert_eq!(clock.elapsed_ms(250), 0);
    }
}
