use embedded_hal::delay::DelayNs;

/// Repeatedly calls an `nb` poll function, sleeping between attempts, until it
/// completes or `timeout_us` has been spent waiting.
///
/// This is the bounded replacement for a bare `nb::block!`: the polling itself
/// is unchanged, only termination is guaranteed.
///
/// # Arguments
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `timeout_us`: Total time to wait, in microseconds. `0` polls exactly once.
/// - `interval_us`: Delay between two polls, in microseconds.
/// - `poll`: Returns `Err(nb::Error::WouldBlock)` while the operation is pending.
///
/// # Returns
/// - `Ok(Some(value))` once `poll` completes
/// - `Ok(None)` if the budget ran out first
/// - `Err(e)` as soon as `poll` fails
///
/// # Example
/// ```rust,ignore
/// let done = poll_with_timeout(&mut delay, 10_000, 100, || radio.poll_send())?;
/// ```
pub fn poll_with_timeout<D, T, E, F>(
    delay: &mut D,
    timeout_us: u32,
    interval_us: u32,
    mut poll: F,
) -> Result<Option<T>, E>
where
    D: DelayNs,
    F: FnMut() -> nb::Result<T, E>,
{
    let mut waited_us: u32 = 0;
    loop {
        match poll() {
            Ok(value) => return Ok(Some(value)),
            Err(nb::Error::Other(e)) => return Err(e),
            Err(nb::Error::WouldBlock) => {}
        }
        if waited_us >= timeout_us {
            return Ok(None);
        }
        let step = interval_us.min(timeout_us - waited_us).max(1);
        delay.delay_us(step);
        waited_us = waited_us.saturating_add(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn test_poll_returns_ready_value() {
        let mut delay = NoopDelay::new();
        let mut calls = 0;
        let result: Result<Option<u8>, ()> = poll_with_timeout(&mut delay, 1_000, 100, || {
            calls += 1;
            if calls < 3 {
                Err(nb::Error::WouldBlock)
            } else {
                Ok(7)
            }
        });
        assert_eq!(result, Ok(Some(7)));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_poll_gives_up_after_budget() {
        let mut delay = NoopDelay::new();
        let mut calls = 0;
        let result: Result<Option<()>, ()> = poll_with_timeout(&mut delay, 300, 100, || {
            calls += 1;
            Err(nb::Error::WouldBlock)
        });
        assert_eq!(result, Ok(None));
        // at 0, 100, 200 and 300 us
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_zero_timeout_polls_once() {
        let mut delay = NoopDelay::new();
        let mut calls = 0;
        let result: Result<Option<()>, ()> = poll_with_timeout(&mut delay, 0, 100, || {
            calls += 1;
            Err(nb::Error::WouldBlock)
        });
        assert_eq!(result, Ok(None));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_poll_propagates_errors() {
        let mut delay = NoopDelay::new();
        let result: Result<Option<()>, &str> =
            poll_with_timeout(&mut delay, 1_000, 100, || Err(nb::Error::Other("bus")));
        assert_eq!(result, Err("bus"));
    }
}
