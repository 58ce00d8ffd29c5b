//! Value oracles: anything that maps a position to a scalar estimate.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::chess::{ChessPosition, Turn};

/// Failure of a value oracle for a given position.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("model error: {0}")]
    Model(String),

    #[error("oracle returned a non-finite value ({value}) for {key}")]
    InvalidOutput { key: String, value: f64 },

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scalar estimate of a position from the side to move.
///
/// Implementations must be stationary: the same position always yields the
/// same value for the lifetime of any cache the oracle is used with.
pub trait ValueOracle<P> {
    fn predict(&self, position: &P) -> Result<f64, OracleError>;
}

impl<P, O: ValueOracle<P> + ?Sized> ValueOracle<P> for &O {
    fn predict(&self, position: &P) -> Result<f64, OracleError> {
        (**self).predict(position)
    }
}

/// Material count squashed into (-1, 1) with `tanh(balance / scale)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialOracle {
    pub scale: f64,
}

impl Default for MaterialOracle {
    fn default() -> Self {
        Self { scale: 10.0 }
    }
}

impl ValueOracle<ChessPosition> for MaterialOracle {
    fn predict(&self, position: &ChessPosition) -> Result<f64, OracleError> {
        if self.scale <= 0.0 || !self.scale.is_finite() {
            return Err(OracleError::Model(format!(
                "material scale must be positive, got {}",
                self.scale
            )));
        }
        Ok((position.material_balance() as f64 / self.scale).tanh())
    }
}

const BOARD_FEATURES: usize = 64;

/// Linear model over the 64 signed piece codes of [`ChessPosition::board_array`].
///
/// The board encoding is side-independent, so the raw prediction is negated
/// when white is to move to keep the side-to-move convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearOracle {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

impl LinearOracle {
    pub fn new(weights: Vec<f64>, bias: f64) -> Result<Self, OracleError> {
        let oracle = Self { weights, bias };
        oracle.check_shape()?;
        Ok(oracle)
    }

    /// Loads `{"weights": [...64 numbers], "bias": 0.0}` from a JSON file.
    pub fn from_json_file<Q: AsRef<Path>>(path: Q) -> Result<Self, OracleError> {
        let raw = fs::read_to_string(path.as_ref())?;
        let oracle: LinearOracle = serde_json::from_str(&raw)?;
        oracle.check_shape()?;
        log::info!(
            "Loaded linear value model from {}",
            path.as_ref().display()
        );
        Ok(oracle)
    }

    fn check_shape(&self) -> Result<(), OracleError> {
        if self.weights.len() != BOARD_FEATURES {
            return Err(OracleError::Model(format!(
                "expected {} weights, got {}",
                BOARD_FEATURES,
                self.weights.len()
            )));
        }
        Ok(())
    }
}

impl ValueOracle<ChessPosition> for LinearOracle {
    fn predict(&self, position: &ChessPosition) -> Result<f64, OracleError> {
        self.check_shape()?;
        let raw: f64 = position
            .board_array()
            .iter()
            .zip(&self.weights)
            .map(|(&code, weight)| code as f64 * weight)
            .sum::<f64>()
            + self.bias;
        let value = match position.turn() {
            Turn::Black => raw,
            Turn::White => -raw,
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_material_oracle_is_symmetric() {
        let oracle = MaterialOracle::default();
        assert_eq!(oracle.predict(&ChessPosition::new()).unwrap(), 0.0);

        let fen = "4k3/8/8/8/8/8/8/R3K3";
        let white = ChessPosition::from_fen_with_turn(fen, Turn::White).unwrap();
        let black = ChessPosition::from_fen_with_turn(fen, Turn::Black).unwrap();
        let up = oracle.predict(&white).unwrap();
        let down = oracle.predict(&black).unwrap();
        assert!(up > 0.0 && up < 1.0);
        assert!((up + down).abs() < 1e-12);
    }

    #[test]
    fn test_material_oracle_rejects_bad_scale() {
        let oracle = MaterialOracle { scale: 0.0 };
        assert!(matches!(
            oracle.predict(&ChessPosition::new()),
            Err(OracleError::Model(_))
        ));
    }

    #[test]
    fn test_linear_oracle_shape_check() {
        assert!(LinearOracle::new(vec![0.0; 64], 0.0).is_ok());
        assert!(matches!(
            LinearOracle::new(vec![0.0; 3], 0.0),
            Err(OracleError::Model(_))
        ));
    }

    #[test]
    fn test_linear_oracle_prediction() {
        // Unit weight on a8 only: black rook code 4.
        let mut weights = vec![0.0; 64];
        weights[0] = 1.0;
        let oracle = LinearOracle::new(weights, 0.5).unwrap();

        let fen = "r3k3/8/8/8/8/8/8/4K3";
        let black = ChessPosition::from_fen_with_turn(fen, Turn::Black).unwrap();
        let white = ChessPosition::from_fen_with_turn(fen, Turn::White).unwrap();
        assert!((oracle.predict(&black).unwrap() - 4.5).abs() < 1e-12);
        assert!((oracle.predict(&white).unwrap() + 4.5).abs() < 1e-12);
    }

    #[test]
    fn test_linear_oracle_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let weights = vec![0.25; 64];
        let body = serde_json::json!({ "weights": weights, "bias": 1.0 });
        write!(file, "{}", body).unwrap();

        let oracle = LinearOracle::from_json_file(file.path()).unwrap();
        assert_eq!(oracle.weights.len(), 64);
        assert_eq!(oracle.bias, 1.0);
        // Starting position codes sum to zero.
        let value = oracle.predict(&ChessPosition::new()).unwrap();
        assert!((value + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_oracle_rejects_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"weights\": [1.0, 2.0]}}").unwrap();
        assert!(matches!(
            LinearOracle::from_json_file(file.path()),
            Err(OracleError::Model(_))
        ));

        let mut garbage = tempfile::NamedTempFile::new().unwrap();
        write!(garbage, "not json").unwrap();
        assert!(matches!(
            LinearOracle::from_json_file(garbage.path()),
            Err(OracleError::Json(_))
        ));

        assert!(matches!(
            LinearOracle::from_json_file("/definitely/missing/weights.json"),
            Err(OracleError::Io(_))
        ));
    }
}
