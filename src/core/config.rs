//! Beacon protocol parameters.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("min_proposers ({min_proposers}) must exceed poly_degree ({poly_degree})")]
    QuorumBelowDegree { poly_degree: u32, min_proposers: u32 },
    #[error("malformed config document: {0}")]
    Document(String),
}

/// Protocol-wide parameters every committee member must agree on.
///
/// `poly_degree` is the sharing polynomial degree `t`; reconstruction
/// needs `t + 1` shares. `min_proposers` is the minimum number of
/// published signatures accepted before the beacon falls back, and must
/// exceed `t` so that any accepted set spans the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconConfig {
    pub poly_degree: u32,
    pub min_proposers: u32,
}

impl BeaconConfig {
    pub fn new(poly_degree: u32, min_proposers: u32) -> Result<Self, ConfigError> {
        Self {
            poly_degree,
            min_proposers,
        }
        .validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.min_proposers <= self.poly_degree {
            return Err(ConfigError::QuorumBelowDegree {
                poly_degree: self.poly_degree,
                min_proposers: self.min_proposers,
            });
        }
        Ok(self)
    }

    pub fn from_toml_str(doc: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            toml::from_str(doc).map_err(|e| ConfigError::Document(e.to_string()))?;
        cfg.validated()
    }

    /// Number of shares needed for reconstruction, `t + 1`.
    pub fn threshold(&self) -> usize {
        self.poly_degree as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_must_exceed_degree() {
        assert!(BeaconConfig::new(2, 3).is_ok());
        assert_eq!(
            BeaconConfig::new(2, 2),
            Err(ConfigError::QuorumBelowDegree {
                poly_degree: 2,
                min_proposers: 2
            })
        );
    }

    #[test]
    fn parses_toml() {
        let cfg = BeaconConfig::from_toml_str("poly_degree = 1\nmin_proposers = 2\n").unwrap();
        assert_eq!(cfg.threshold(), 2);
        assert!(BeaconConfig::from_toml_str("poly_degree = 5\nmin_proposers = 2\n").is_err());
    }
}
