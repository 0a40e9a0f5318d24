//! Discrete trading signal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A discrete directional signal.
///
/// Raw strategy output is clipped into this three-state domain before the
/// execution pipeline acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    /// Target a short position (-1).
    Short,
    /// Target no position (0).
    Flat,
    /// Target a long position (+1).
    Long,
}

impl Signal {
    /// Clip a raw signal value into {-1, 0, +1}.
    ///
    /// Any positive value maps to `Long`, any negative value to `Short`,
    /// zero and non-finite values to `Flat`.
    #[must_use]
    pub fn from_raw(value: f64) -> Self {
        if !value.is_finite() || value == 0.0 {
            Self::Flat
        } else if value > 0.0 {
            Self::Long
        } else {
            Self::Short
        }
    }

    /// Target position multiplier: -1, 0 or +1.
    #[must_use]
    pub fn sign(&self) -> Decimal {
        match self {
            Self::Short => -Decimal::ONE,
            Self::Flat => Decimal::ZERO,
            Self::Long => Decimal::ONE,
        }
    }

    /// Integer form, for event logging.
    #[must_use]
    pub const fn as_i8(&self) -> i8 {
        match self {
            Self::Short => -1,
            Self::Flat => 0,
            Self::Long => 1,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Short => write!(f, "SHORT"),
            Self::Flat => write!(f, "FLAT"),
            Self::Long => write!(f, "LONG"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_clips_magnitude() {
        assert_eq!(Signal::from_raw(3.7), Signal::Long);
        assert_eq!(Signal::from_raw(-0.2), Signal::Short);
        assert_eq!(Signal::from_raw(0.0), Signal::Flat);
    }

    #[test]
    fn test_from_raw_non_finite_is_flat() {
        assert_eq!(Signal::from_raw(f64::NAN), Signal::Flat);
        assert_eq!(Signal::from_raw(f64::INFINITY), Signal::Flat);
    }

    #[test]
    fn test_sign_matches_as_i8() {
        for signal in [Signal::Short, Signal::Flat, Signal::Long] {
            assert_eq!(signal.sign(), Decimal::from(signal.as_i8()));
        }
    }
}
