use thiserror::Error;

/// Main error type for the Pokedex Explorer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    /// A request to the remote catalog failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The user asked for a game or species the catalogs don't contain
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),
    /// Terminal input or output failed
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExplorerError {
    fn from(error: std::io::Error) -> Self {
        ExplorerError::Io(error.to_string())
    }
}

/// A recoverable failure talking to the remote catalog.
///
/// Never fatal: the session records the message and keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    /// The request never produced a response (DNS, TLS, timeout, reset...)
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The body was not the JSON shape we expected
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {message}")]
    Read { path: String, message: String },
    #[error("malformed config file {path}: {message}")]
    Parse { path: String, message: String },
    #[error("could not build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown game '{0}'")]
    UnknownVersion(String),
    #[error("'{0}' is not available in the selected game")]
    UnknownSpecies(String),
    #[error("the {0} catalog has not finished loading")]
    CatalogNotLoaded(&'static str),
}

/// Type alias for Results using ExplorerError
pub type ExplorerResult<T> = Result<T, ExplorerError>;

/// Type alias for Results using FetchError
pub type FetchResult<T> = Result<T, FetchError>;
