use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Invalid search query: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),
}

/// Coarse classification of a [`CatalogError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorKind {
    InvalidInput,
    Network,
    Decode,
}

impl CatalogError {
    /// A non-success status counts as a network failure.
    pub fn kind(&self) -> CatalogErrorKind {
        match self {
            CatalogError::InvalidInput(_) => CatalogErrorKind::InvalidInput,
            CatalogError::Network(_) | CatalogError::HttpStatus { .. } => {
                CatalogErrorKind::Network
            }
            CatalogError::Decode(_) => CatalogErrorKind::Decode,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            CatalogError::InvalidInput("".into()).kind(),
            CatalogErrorKind::InvalidInput
        );
        assert_eq!(
            CatalogError::HttpStatus {
                status: 502,
                body: String::new()
            }
            .kind(),
            CatalogErrorKind::Network
        );
        assert_eq!(
            CatalogError::Decode("eof".into()).kind(),
            CatalogErrorKind::Decode
        );
    }
}
