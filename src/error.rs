//! Centralized error type for the ncs crate.
//!
//! Driver statuses travel unchanged inside [`Error::Status`]; everything else
//! is a local failure of the bindings.

use ncs_core::{DriverResult, OptionDecodeError, Operation, Status};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{op} failed: {status} ({})", .status.code())]
    Status { op: Operation, status: Status },

    #[error("{0} handle already destroyed")]
    Destroyed(&'static str),

    #[error("Option {0} not implemented")]
    OptionNotImplemented(String),

    #[error("Failed to decode option {option}: {reason}")]
    OptionDecode {
        option: String,
        reason: OptionDecodeError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(feature = "mvnc")]
    #[error("libmvnc: {0}")]
    Library(#[from] ncs_mvnc::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// The exact driver status, if the driver reported this error.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The failed driver operation, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Error::Status { op, .. } => Some(*op),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach the operation to a driver result and log the call.
pub(crate) trait DriverResultExt<T> {
    fn during(self, op: Operation) -> Result<T>;
}

impl<T> DriverResultExt<T> for DriverResult<T> {
    fn during(self, op: Operation) -> Result<T> {
        match self {
            Ok(value) => {
                tracing::debug!(op = %op, "driver call ok");
                Ok(value)
            }
            Err(status) => {
                tracing::debug!(op = %op, status = %status, code = status.code(), "driver call failed");
                Err(Error::Status { op, status })
            }
        }
    }
}
