use thiserror::Error;

use crate::api::Capability;
use crate::core::{AlignmentAxis, SeriesId};

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    /// A list-mutation call hit an items source that lacks the capability.
    #[error(
        "`{property}` does not support `{operation}`: the source lacks {capability} support"
    )]
    MissingCapability {
        property: &'static str,
        operation: &'static str,
        capability: Capability,
    },

    #[error("invalid {axis} alignment `{value}`")]
    InvalidAlignment { axis: AlignmentAxis, value: String },

    #[error("invalid data labels position `{value}`")]
    InvalidPosition { value: String },

    /// Raised by series variants that never supplied logic for `operation`.
    #[error("`{operation}` is not implemented by series {series}")]
    Unimplemented {
        operation: &'static str,
        series: SeriesId,
    },

    #[error("mapping failed at index {index}: {message}")]
    Mapping { index: usize, message: String },

    #[error("no mapper configured or registered for `{model}` -> `{coordinate}`")]
    MissingMapper {
        model: &'static str,
        coordinate: &'static str,
    },

    #[error("series {0} is not registered in this chart")]
    SeriesNotFound(SeriesId),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl ChartError {
    /// Convenience constructor for user mapper and point-builder closures.
    #[must_use]
    pub fn mapping(index: usize, message: impl Into<String>) -> Self {
        Self::Mapping {
            index,
            message: message.into(),
        }
    }
}
