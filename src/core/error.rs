use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid grid dimensions: width={width}, height={height}, cell_size={cell_size}")]
    InvalidDimensions {
        width: i32,
        height: i32,
        cell_size: f32,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
