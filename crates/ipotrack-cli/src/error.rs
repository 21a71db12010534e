use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ipotrack_core::ValidationError),

    #[error("ticker {0} is not in the tracked dataset")]
    NotTracked(String),

    #[error(transparent)]
    Core(#[from] ipotrack_core::CoreError),

    #[error(transparent)]
    Store(#[from] ipotrack_core::StoreError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::NotTracked(_) => 3,
            Self::Core(_) | Self::Store(_) | Self::Serialization(_) => 10,
        }
    }
}
