use thiserror::Error;

/// Markup that could not be turned into a tree at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("markup is empty")]
    Empty,
    #[error("markup is {len} bytes, limit is {limit}")]
    TooLarge { len: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("extraction worker failed: {0}")]
    Worker(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
