//! Ball numbering - the position of a delivery within an innings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Position of a delivery within an innings, e.g. `15.3` = over 15, ball 3.
///
/// The ball index is a sequential delivery counter within the over: wides and
/// no-balls get their own index, so ball numbers are strictly increasing over
/// the course of an innings and an over can run past `.6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallNumber {
    pub over: u32,
    pub ball: u8,
}

impl BallNumber {
    /// Create a ball number from over and ball-in-over.
    pub fn new(over: u32, ball: u8) -> Self {
        Self { over, ball }
    }
}

impl fmt::Display for BallNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.over, self.ball)
    }
}

/// Error parsing a ball number from its `over.ball` string form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseBallNumberError {
    #[error("ball number '{0}' is not in over.ball form")]
    MissingSeparator(String),
    #[error("invalid over component in '{0}'")]
    InvalidOver(String),
    #[error("invalid ball component in '{0}'")]
    InvalidBall(String),
}

impl FromStr for BallNumber {
    type Err = ParseBallNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (over, ball) = s
            .split_once('.')
            .ok_or_else(|| ParseBallNumberError::MissingSeparator(s.to_string()))?;
        let over = over
            .parse::<u32>()
            .map_err(|_| ParseBallNumberError::InvalidOver(s.to_string()))?;
        let ball = ball
            .parse::<u8>()
            .map_err(|_| ParseBallNumberError::InvalidBall(s.to_string()))?;
        Ok(Self { over, ball })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let ball = BallNumber::new(15, 3);
        assert_eq!(ball.to_string(), "15.3");
        assert_eq!("15.3".parse::<BallNumber>().unwrap(), ball);
    }

    #[test]
    fn test_ordering() {
        assert!(BallNumber::new(0, 6) < BallNumber::new(1, 1));
        assert!(BallNumber::new(15, 3) < BallNumber::new(15, 4));
        // Wides can push an over past six deliveries
        assert!(BallNumber::new(15, 7) < BallNumber::new(16, 1));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "15".parse::<BallNumber>(),
            Err(ParseBallNumberError::MissingSeparator(_))
        ));
        assert!(matches!(
            "x.3".parse::<BallNumber>(),
            Err(ParseBallNumberError::InvalidOver(_))
        ));
        assert!(matches!(
            "15.x".parse::<BallNumber>(),
            Err(ParseBallNumberError::InvalidBall(_))
        ));
    }
}
