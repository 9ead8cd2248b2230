use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("propagation failed: {0}")]
    Propagation(String),
    #[error("element set is {age_days} days from epoch, limit is {max_days}")]
    StaleElements { age_days: i64, max_days: i64 },
}
