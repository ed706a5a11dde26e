use thiserror::Error;

/// Failure of a single scrape attempt. The `Display` text is shown to the user as-is.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to fetch data. Status code: {0}")]
    Status(u16),

    #[error("An error occurred during scraping: {0}")]
    Network(#[from] reqwest::Error),

    #[error("An error occurred during scraping: invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

/// Failure to obtain a completion from the generation backend.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("An error occurred while generating a response: {0}")]
    Request(#[from] reqwest::Error),

    #[error("An error occurred while generating a response: backend returned status {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("An error occurred while generating a response: {0}")]
    Decode(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide a valid query!")]
    EmptyQuery,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_text() {
        assert_eq!(
            ScrapeError::Status(403).to_string(),
            "Failed to fetch data. Status code: 403"
        );
    }

    #[test]
    fn test_empty_query_text() {
        assert_eq!(
            ValidationError::EmptyQuery.to_string(),
            "Please provide a valid query!"
        );
    }

    #[test]
    fn test_backend_error_text() {
        let err = GenerationError::Backend {
            status: 500,
            body: "model not loaded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "An error occurred while generating a response: backend returned status 500: model not loaded"
        );
    }
}
