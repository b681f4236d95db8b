//! Categorical tiers and the threshold ladders that assign them.

use serde::Serialize;

/// A categorical band assigned to a ratio value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tier {
    /// Short level name, e.g. `Good`.
    pub level: &'static str,
    /// One-line description of what the level means.
    pub description: &'static str,
}

impl Tier {
    /// Creates a tier.
    #[must_use]
    pub const fn new(level: &'static str, description: &'static str) -> Self {
        Self { level, description }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    AtLeast,
    AtMost,
}

/// An ordered threshold ladder.
///
/// Rungs are tested in order and the first one whose bound is satisfied wins;
/// a value satisfying none (including NaN) falls through to `fallback`.
/// Cut points are inclusive: with an `at_least` ladder a value exactly on a
/// bound lands in that bound's rung.
///
/// ```rust
/// use fincalc_core::types::Ladder;
///
/// static RISK: Ladder<&str> = Ladder::at_least(&[(2.0, "Low"), (1.0, "High")], "Critical");
/// assert_eq!(RISK.classify(2.0), "Low");
/// assert_eq!(RISK.classify(1.99), "High");
/// assert_eq!(RISK.classify(0.5), "Critical");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Ladder<T: 'static> {
    direction: Direction,
    rungs: &'static [(f64, T)],
    fallback: T,
}

impl<T: Copy + 'static> Ladder<T> {
    /// Ladder whose rungs match when `value >= bound`; bounds descend.
    #[must_use]
    pub const fn at_least(rungs: &'static [(f64, T)], fallback: T) -> Self {
        Self {
            direction: Direction::AtLeast,
            rungs,
            fallback,
        }
    }

    /// Ladder whose rungs match when `value <= bound`; bounds ascend.
    #[must_use]
    pub const fn at_most(rungs: &'static [(f64, T)], fallback: T) -> Self {
        Self {
            direction: Direction::AtMost,
            rungs,
            fallback,
        }
    }

    /// Classifies a value.
    #[must_use]
    pub fn classify(&self, value: f64) -> T {
        self.rungs
            .iter()
            .find(|(bound, _)| match self.direction {
                Direction::AtLeast => value >= *bound,
                Direction::AtMost => value <= *bound,
            })
            .map_or(self.fallback, |(_, tier)| *tier)
    }
}
