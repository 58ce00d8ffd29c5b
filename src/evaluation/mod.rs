//! Cache-checked position evaluation.

pub mod cache;
pub mod oracle;

pub use cache::{CacheStats, EvaluationCache, SharedEvaluationCache, ValueCache};
pub use oracle::{LinearOracle, MaterialOracle, OracleError, ValueOracle};

use crate::game::position::GamePosition;

/// Returns the oracle value of `position`, consulting `cache` first.
///
/// On a miss the oracle is called once and its value stored. Oracle errors
/// and non-finite values are returned to the caller and never cached.
pub fn evaluate<P, O, C>(position: &P, oracle: &O, cache: &mut C) -> Result<f64, OracleError>
where
    P: GamePosition,
    O: ValueOracle<P> + ?Sized,
    C: ValueCache + ?Sized,
{
    let key = position.canonical_key();
    if let Some(value) = cache.lookup(&key) {
        return Ok(value);
    }

    let value = oracle.predict(position)?;
    if !value.is_finite() {
        return Err(OracleError::InvalidOutput { key, value });
    }
    cache.store(key, value);
    Ok(value)
}
