/// Problems with the inputs of a run. All of them are detected before a search
/// loop starts.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unsupported memory size {0}: no lookback layout has that many bits")]
    UnsupportedMemorySize(usize),
    #[error("payoff matrix must be 2x2, got {rows} rows with lengths {cols:?}")]
    PayoffShape { rows: usize, cols: Vec<usize> },
    #[error("payoff matrix entry [{row}][{col}] is not finite")]
    NonFinitePayoff { row: usize, col: usize },
    #[error("opponent pool is empty")]
    EmptyOpponentPool,
    #[error("unknown strategy name: {0:?}")]
    UnknownStrategy(String),
    #[error("{0} must be at least 1")]
    Zero(&'static str),
    #[error("{name} = {value} is outside {range}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },
    #[error("invalid bit string: {0}")]
    BitString(String),
    #[error("round range {min}..={max} is empty")]
    RoundRange { min: usize, max: usize },
    #[error("flip range {min}..={max} must satisfy 1 <= min <= max")]
    FlipRange { min: usize, max: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Checks that `value` lies in `(0, 1]`.
pub(crate) fn check_fraction(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            range: "(0, 1]",
        })
    }
}

pub(crate) fn check_nonzero(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::Zero(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_bounds() {
        assert!(check_fraction("p", 1.0).is_ok());
        assert!(check_fraction("p", 0.5).is_ok());
        assert!(check_fraction("p", 0.0).is_err());
        assert!(check_fraction("p", 1.5).is_err());
        assert!(check_fraction("p", f64::NAN).is_err());
    }

    #[test]
    fn test_messages_name_the_field() {
        let err = check_nonzero("num_restarts", 0).unwrap_err();
        assert_eq!(err.to_string(), "num_restarts must be at least 1");
        let err: Error = ConfigError::EmptyOpponentPool.into();
        assert_eq!(err.to_string(), "configuration error: opponent pool is empty");
    }
}
