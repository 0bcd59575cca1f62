use reel_api::CatalogError;
use reel_core::error::ReelError;

/// User-facing outcome of a failed search or detail fetch.
///
/// Cancellation is deliberately absent: a superseded request never
/// produces one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("request failed")]
    RequestFailed,
    #[error("movie not found")]
    NotFound,
    #[error("malformed response")]
    MalformedResponse,
}

impl From<&CatalogError> for LoadError {
    fn from(err: &CatalogError) -> Self {
        match err {
            CatalogError::Http(_) | CatalogError::Api { .. } => Self::RequestFailed,
            CatalogError::NotFound(_) => Self::NotFound,
            CatalogError::Parse(_) => Self::MalformedResponse,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Core(#[from] ReelError),
    #[error("no movie details loaded")]
    NothingSelected,
    #[error("details for {0} are still loading")]
    StillLoading(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_messages() {
        let api = CatalogError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(LoadError::from(&api).to_string(), "request failed");

        let missing = CatalogError::NotFound("Movie not found!".into());
        assert_eq!(LoadError::from(&missing).to_string(), "movie not found");

        let garbled = CatalogError::Parse("expected value".into());
        assert_eq!(LoadError::from(&garbled), LoadError::MalformedResponse);
    }
}
