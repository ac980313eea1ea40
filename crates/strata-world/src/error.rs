use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid chunk dimensions {sx}x{sy}x{sz}: every dimension must be positive")]
pub struct InvalidDimensions {
    pub sx: i64,
    pub sy: i64,
    pub sz: i64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read world config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse world config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Dimensions(#[from] InvalidDimensions),
    #[error("invalid world config: {0}")]
    Invalid(String),
}
