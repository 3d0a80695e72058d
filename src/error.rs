use thiserror::Error;

/// Errors raised while loading the bundle or answering questions.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No local file and nowhere to fetch it from
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote fetch failed or returned nothing
    #[error("Download error: {0}")]
    Download(String),

    /// Bundle file unreadable or of unexpected shape
    #[error("Failed to load bundle: {0}")]
    Deserialize(String),

    /// The index rejected a search
    #[error("Search error: {0}")]
    Search(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    pub fn deserialize(msg: impl Into<String>) -> Self {
        Self::Deserialize(msg.into())
    }

    pub fn search(msg: impl Into<String>) -> Self {
        Self::Search(msg.into())
    }
}

impl From<bincode::Error> for ChatError {
    fn from(e: bincode::Error) -> Self {
        Self::Deserialize(e.to_string())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        Self::Download(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
