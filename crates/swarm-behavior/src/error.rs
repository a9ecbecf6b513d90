use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;

/// Reject a non-finite or negative parameter at the construction boundary.
pub(crate) fn check_param(name: &str, value: f32) -> BehaviorResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(BehaviorError::Config(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

/// Like [`check_param`], but zero is also rejected (divisors, rates).
pub(crate) fn check_positive(name: &str, value: f32) -> BehaviorResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BehaviorError::Config(format!(
            "{name} must be finite and positive, got {value}"
        )))
    }
}
