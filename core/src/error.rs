use std::fmt;

use crate::reduce::Strategy;

/// A reducer disagreed with the ground truth recorded at generation time.
///
/// This means either the generator or the reducer is broken, so a run that
/// hits it must stop instead of reporting further timings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityViolation {
    pub strategy: Strategy,
    pub iteration: usize,
    pub expected: i32,
    pub found: i32,
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "largest number found ({}) != largest number generated ({}) in {} run {}: benchmark is broken",
            self.found, self.expected, self.strategy, self.iteration
        )
    }
}

impl std::error::Error for IntegrityViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_both_values() {
        let err = IntegrityViolation {
            strategy: Strategy::Threads,
            iteration: 3,
            expected: 9,
            found: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("found (5)"));
        assert!(msg.contains("generated (9)"));
        assert!(msg.contains("threads run 3"));
    }

    #[test]
    fn test_downcasts_through_anyhow() {
        let err: anyhow::Error = IntegrityViolation {
            strategy: Strategy::Serial,
            iteration: 0,
            expected: 1,
            found: 2,
        }
        .into();
        let violation = err.downcast_ref::<IntegrityViolation>().expect("typed error survives");
        assert_eq!(violation.found, 2);
    }
}
