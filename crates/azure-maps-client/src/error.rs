use std::fmt;

/// Errors from the Azure Maps client
#[derive(Debug)]
pub enum AzureMapsError {
    /// No subscription key or base URL was configured
    MissingCredentials,
    /// Transport failure, timeout, or undecodable body. The request URL is
    /// stripped since it carries the subscription key.
    Http(reqwest::Error),
    /// Azure Maps answered with a non-success status
    Status { status: u16, body: String },
}

impl fmt::Display for AzureMapsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "Azure Maps API credentials not configured"),
            Self::Http(e) if e.is_timeout() => write!(f, "Azure Maps request timed out: {e}"),
            Self::Http(e) => write!(f, "Azure Maps HTTP error: {e}"),
            Self::Status { status, body } => {
                write!(f, "Azure Maps returned status {status}: {body}")
            }
        }
    }
}

impl std::error::Error for AzureMapsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AzureMapsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, AzureMapsError>;
