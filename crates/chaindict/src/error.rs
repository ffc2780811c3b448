use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    /// Lookup of a key that was never set
    #[error("key not found")]
    KeyNotFound,

    /// The key does not support hashing, like a list or a set
    #[error("unhashable type: '{type_name}'")]
    UnhashableKey { type_name: &'static str },
}

pub type Result<T> = std::result::Result<T, DictError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("initial capacity must be at least 1 bucket")]
    ZeroCapacity,

    #[error("max load factor must be finite and positive, got: {0}")]
    InvalidLoadFactor(f64),

    #[error("growth factor must be at least 2, got: {0}")]
    InvalidGrowthFactor(usize),
}
