//! Native Neural Compute Stick driver.
//!
//! [`MvncDriver`] loads `libmvnc` at runtime and implements
//! [`ncs_core::Driver`] by forwarding each call to the matching NCAPI v2
//! entry point.
//!
//! ```ignore
//! use ncs_mvnc::{MvncConfig, MvncDriver};
//!
//! let driver = MvncDriver::load(&MvncConfig::default())?;
//! ```

mod api;
pub mod config;
mod driver;
pub mod error;

pub use config::{MvncConfig, DEFAULT_LIBRARY_NAMES, LIBRARY_ENV};
pub use driver::MvncDriver;
pub use error::{Error, Result};
