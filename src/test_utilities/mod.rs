//! Utilities for testing.

use crate::backend::HostInterface;
use std::fmt::Debug;

/// A host useful for writing automated tests.
///
/// It remembers whether the plugin asked to stop.
#[derive(Debug, Default)]
pub struct TestHost {
    stop_requested: bool,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }
}

impl HostInterface for TestHost {
    fn stop(&mut self) {
        self.stop_requested = true;
    }
}

/// Assert that `observed` differs at most `tolerance` from `expected`.
pub fn assert_approximately_equal<F>(observed: F, expected: F, tolerance: F)
where
    F: num_traits::Float + Debug,
{
    assert!(
        (observed - expected).abs() <= tolerance,
        "expected {:?} (with a tolerance of {:?}), but got {:?}",
        expected,
        tolerance,
        observed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_remembers_stop_requests() {
        let mut host = TestHost::new();
        assert!(!host.stop_requested());
        host.stop();
        assert!(host.stop_requested());
    }

    #[test]
    #[should_panic]
    fn approximate_comparison_fails_outside_the_tolerance() {
        assert_approximately_equal(1.0, 1.1, 0.01);
    }
}
