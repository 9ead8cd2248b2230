use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("satellite {0:?} not found in catalog")]
    NotFound(String),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("invalid element set: {0}")]
    InvalidTle(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Unavailable(err.to_string())
    }
}
