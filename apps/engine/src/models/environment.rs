//! Trading environment identifier.

use serde::{Deserialize, Serialize};

/// Trading environment (PAPER, TESTNET or LIVE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Environment {
    /// Paper trading mode - fully simulated, orders never leave the process.
    Paper,
    /// Testnet mode - exchange sandbox, orders may be validated remotely.
    Testnet,
    /// Live trading mode - real orders with real money.
    Live,
}

impl Environment {
    /// Returns true if this is the live trading environment.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Returns true if this is the paper trading environment.
    #[must_use]
    pub const fn is_paper(&self) -> bool {
        matches!(self, Self::Paper)
    }

    /// Returns true if this is the testnet environment.
    #[must_use]
    pub const fn is_testnet(&self) -> bool {
        matches!(self, Self::Testnet)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paper => write!(f, "PAPER"),
            Self::Testnet => write!(f, "TESTNET"),
            Self::Live => write!(f, "LIVE"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PAPER" => Ok(Self::Paper),
            "TESTNET" => Ok(Self::Testnet),
            "LIVE" => Ok(Self::Live),
            _ => Err(format!(
                "Invalid environment: {s}. Must be PAPER, TESTNET or LIVE."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_predicates() {
        assert!(Environment::Live.is_live());
        assert!(!Environment::Paper.is_live());
        assert!(Environment::Testnet.is_testnet());
        assert!(Environment::Paper.is_paper());
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("LIVE".parse::<Environment>(), Ok(Environment::Live));
        assert_eq!("testnet".parse::<Environment>(), Ok(Environment::Testnet));
        assert_eq!("paper".parse::<Environment>(), Ok(Environment::Paper));
        assert!("prod".parse::<Environment>().is_err());
    }

    #[test]
    fn test_environment_display_round_trip() {
        for env in [Environment::Paper, Environment::Testnet, Environment::Live] {
            assert_eq!(env.to_string().parse::<Environment>(), Ok(env));
        }
    }
}
