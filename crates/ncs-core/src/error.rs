//! Error types for option decoding.

use thiserror::Error;

/// Raw option bytes that do not match the option's native type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionDecodeError {
    #[error("expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("length {len} is not a multiple of element size {elem_size}")]
    Misaligned { len: usize, elem_size: usize },

    #[error("unknown FIFO data type code {0}")]
    UnknownDataType(i32),

    #[error("option {0} has no decoder")]
    NoDecoder(String),
}

pub type Result<T> = std::result::Result<T, OptionDecodeError>;
