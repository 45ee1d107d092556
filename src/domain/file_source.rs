// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size-checked reading of configuration files.

use crate::domain::errors::{ConfigError, Result};
use std::fs;
use std::path::Path;

/// Maximum allowed size for configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
pub(crate) const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Reads a configuration file to a string.
///
/// I/O errors are returned unchanged; files over [`MAX_CONFIG_FILE_SIZE`] are
/// refused with [`ConfigError::SourceError`] before being read.
pub(crate) fn read_config_file(path: &Path) -> Result<String> {
    read_with_limit(path, MAX_CONFIG_FILE_SIZE)
}

fn read_with_limit(path: &Path, limit: u64) -> Result<String> {
    let metadata = fs::metadata(path)?;
    if metadata.len() > limit {
        return Err(ConfigError::SourceError {
            source_name: path.display().to_string(),
            message: format!(
                "Configuration file too large: {} bytes (max {} bytes)",
                metadata.len(),
                limit
            ),
            source: None,
        });
    }
    Ok(fs::read_to_string(path)?)
}
