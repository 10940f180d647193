//! Error types for loading libmvnc

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load {path}\n  Reason: {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("Missing symbol {symbol}: {reason}")]
    MissingSymbol {
        symbol: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
