//! Environment file loading.
//!
//! The `.env` file is parsed into an explicit [`EnvVars`] map that is handed to
//! the configuration builder. The process environment is consulted for
//! overrides but never written to.

use crate::error::{ProbeError, ProbeResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Location of the env file relative to the directory holding the executable.
pub const DEFAULT_ENV_FILE: &str = "../.env";

/// Key/value pairs loaded from an env file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `KEY=value` pairs from `path`.
    ///
    /// Fails with [`ProbeError::EnvFileNotFound`] before reading anything when
    /// the file does not exist.
    pub fn load(path: &Path) -> ProbeResult<Self> {
        if !path.exists() {
            return Err(ProbeError::env_file_not_found(path));
        }

        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| ProbeError::env_file_invalid(path, e.to_string()))?;

        let mut vars = HashMap::new();
        for item in iter {
            let (key, value) =
                item.map_err(|e| ProbeError::env_file_invalid(path, e.to_string()))?;
            // Later definitions of a key replace earlier ones.
            vars.insert(key, value);
        }

        info!(path = %path.display(), count = vars.len(), "Loaded env file");
        Ok(Self { vars })
    }

    /// Let values already present in `process_env` take precedence for `keys`.
    pub fn with_overrides(
        mut self,
        keys: &[&str],
        process_env: &HashMap<String, String>,
    ) -> Self {
        for key in keys {
            if let Some(value) = process_env.get(*key) {
                debug!(key = %key, "Using value from process environment");
                self.vars.insert((*key).to_string(), value.clone());
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolve the default env file path next to the running executable.
pub fn default_env_file_path() -> ProbeResult<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| ProbeError::internal(format!("Cannot locate executable: {}", e)))?;
    let dir = exe
        .parent()
        .ok_or_else(|| ProbeError::internal("Executable has no parent directory"))?;
    Ok(dir.join(DEFAULT_ENV_FILE))
}
