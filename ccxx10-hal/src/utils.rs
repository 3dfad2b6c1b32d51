use embedded_hal_1::delay::DelayNs;

/// A bounded wait ran out of time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout {
    /// Time spent waiting before giving up, in microseconds.
    pub waited_us: u32,
}

/// Blocks until a condition becomes false or a timeout is reached.
///
/// `condition` is polled once immediately and then every `interval_us`.
/// Returns the time spent waiting, in microseconds.
#[inline]
pub fn blocking_wait_timeout<D, F>(
    delay: &mut D,
    mut condition: F,
    timeout_us: u32,
    interval_us: u32,
) -> Result<u32, Timeout>
where
    D: DelayNs + ?Sized,
    F: FnMut() -> bool,
{
    let mut waited: u32 = 0;

    while condition() {
        if waited >= timeout_us {
            return Err(Timeout { waited_us: waited });
        }
        delay.delay_us(interval_us);
        waited = waited.saturating_add(interval_us);
    }

    Ok(waited)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingDelay {
        elapsed_us: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.elapsed_us += ns / 1_000;
        }

        fn delay_us(&mut self, us: u32) {
            self.elapsed_us += us;
        }
    }

    #[test]
    fn ready_condition_returns_without_delay() {
        let mut delay = CountingDelay { elapsed_us: 0 };
        assert_eq!(blocking_wait_timeout(&mut delay, || false, 100, 10), Ok(0));
        assert_eq!(delay.elapsed_us, 0);
    }

    #[test]
    fn condition_clears_after_some_polls() {
        let mut delay = CountingDelay { elapsed_us: 0 };
        let mut polls = 0;
        let res = blocking_wait_timeout(
            &mut delay,
            || {
                polls += 1;
                polls <= 3
            },
            100,
            10,
        );
        assert_eq!(res, Ok(30));
        assert_eq!(delay.elapsed_us, 30);
    }

    #[test]
    fn stuck_condition_times_out_at_bound() {
        let mut delay = CountingDelay { elapsed_us: 0 };
        let res = blocking_wait_timeout(&mut delay, || true, 95, 10);
        // Polls at 0, 10, .., 90 then 100 >= 95.
        assert_eq!(res, Err(Timeout { waited_us: 100 }));
        assert_eq!(delay.elapsed_us, 100);
    }
}
