//! Millisecond timestamps
//!
//! Time arrives as a free-running `u32` millisecond counter that wraps
//! after about 49 days. Deadlines are compared on the wrapped difference,
//! which stays correct as long as they lie less than 24 days ahead.

/// Check whether `deadline` has been reached at `now`
pub const fn reached(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Deadline `delay_ms` after `now`
pub const fn after(now: u32, delay_ms: u32) -> u32 {
    now.wrapping_add(delay_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reached() {
        assert!(reached(100, 100));
        assert!(reached(101, 100));
        assert!(!reached(99, 100));
    }

    #[test]
    fn test_wraparound() {
        let deadline = after(u32::MAX - 5, 10);
        assert_eq!(deadline, 4);
        assert!(!reached(u32::MAX, deadline));
        assert!(reached(4, deadline));
    }

    proptest! {
        #[test]
        fn test_reached_after_delay(now in any::<u32>(), delay in 1u32..0x7FFF_FFFF) {
            let deadline = after(now, delay);
            prop_assert!(!reached(now, deadline));
            prop_assert!(reached(deadline, deadline));
            prop_assert!(reached(deadline.wrapping_add(1), deadline));
        }
    }
}
