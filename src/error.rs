use crate::schema::Variant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RollupError {
    #[error("required column '{column}' missing from {variant} file")]
    MissingColumn {
        variant: Variant,
        column: &'static str,
    },

    #[error("no structural configuration defined for fiscal year {0}")]
    UnknownEjercicio(i32),

    #[error("no {dimension} found after aggregation: file does not look like a {variant} export")]
    EmptyDimension {
        variant: Variant,
        dimension: &'static str,
    },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RollupError>;
