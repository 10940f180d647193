use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable that overrides [`MvncConfig::library_path`].
pub const LIBRARY_ENV: &str = "NCS_MVNC_LIBRARY";

/// Library names tried in order when no path is configured.
#[cfg(target_os = "macos")]
pub const DEFAULT_LIBRARY_NAMES: &[&str] = &["libmvnc.0.dylib", "libmvnc.dylib"];
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_LIBRARY_NAMES: &[&str] = &["libmvnc.so.0", "libmvnc.so"];

/// Where to find `libmvnc`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MvncConfig {
    /// Explicit library path. Unset means the dynamic loader's search path.
    pub library_path: Option<PathBuf>,
}

impl MvncConfig {
    pub fn with_library_path(path: impl Into<PathBuf>) -> Self {
        Self {
            library_path: Some(path.into()),
        }
    }

    /// Paths to try, honoring [`LIBRARY_ENV`].
    pub fn candidates(&self) -> Vec<PathBuf> {
        candidates(std::env::var_os(LIBRARY_ENV), self.library_path.as_ref())
    }
}

fn candidates(env: Option<OsString>, configured: Option<&PathBuf>) -> Vec<PathBuf> {
    if let Some(path) = env.filter(|p| !p.is_empty()) {
        return vec![PathBuf::from(path)];
    }
    if let Some(path) = configured {
        return vec![path.clone()];
    }
    DEFAULT_LIBRARY_NAMES.iter().map(PathBuf::from).collect()
}
