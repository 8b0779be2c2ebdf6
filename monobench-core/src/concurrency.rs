// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Concurrency advisor for the benchmarked tools.
//!
//! The values computed here are passed to the tools' own `--concurrency`
//! style flags; monobench itself always runs one process at a time.
//!
//! - explicit override: prep = measure = override
//! - CI:    prep = max(1, cpus/2 - 1), measure = max(1, cpus - 1)
//! - local: prep = measure = max(1, cpus/2 - 1)

use serde::{Deserialize, Serialize};

/// Recommended parallelism for each phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concurrency {
    pub prep: u32,
    pub measure: u32,
}

/// Compute the recommended parallelism.
///
/// Never returns a value below 1.
pub fn recommend(cpu_count: usize, is_ci: bool, override_value: Option<u32>) -> Concurrency {
    if let Some(n) = override_value.filter(|n| *n > 0) {
        return Concurrency { prep: n, measure: n };
    }

    let cpus = u32::try_from(cpu_count.max(1)).unwrap_or(u32::MAX);
    let half_minus_one = (cpus / 2).saturating_sub(1).max(1);

    let measure = if is_ci {
        cpus.saturating_sub(1).max(1)
    } else {
        half_minus_one
    };

    Concurrency {
        prep: half_minus_one,
        measure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        assert_eq!(
            recommend(16, true, Some(3)),
            Concurrency { prep: 3, measure: 3 }
        );
        assert_eq!(
            recommend(2, false, Some(12)),
            Concurrency { prep: 12, measure: 12 }
        );
    }

    #[test]
    fn test_zero_override_ignored() {
        assert_eq!(recommend(8, false, Some(0)), recommend(8, false, None));
    }

    #[test]
    fn test_ci_policy() {
        assert_eq!(
            recommend(8, true, None),
            Concurrency { prep: 3, measure: 7 }
        );
        assert_eq!(
            recommend(5, true, None),
            Concurrency { prep: 1, measure: 4 }
        );
    }

    #[test]
    fn test_local_policy() {
        assert_eq!(
            recommend(16, false, None),
            Concurrency { prep: 7, measure: 7 }
        );
        assert_eq!(
            recommend(3, false, None),
            Concurrency { prep: 1, measure: 1 }
        );
    }

    #[test]
    fn test_never_below_one() {
        for cpus in 0..=64 {
            for ci in [false, true] {
                let c = recommend(cpus, ci, None);
                assert!(c.prep >= 1, "prep < 1 for cpus={} ci={}", cpus, ci);
                assert!(c.measure >= 1, "measure < 1 for cpus={} ci={}", cpus, ci);
            }
        }
        assert_eq!(
            recommend(1, true, None),
            Concurrency { prep: 1, measure: 1 }
        );
    }
}
