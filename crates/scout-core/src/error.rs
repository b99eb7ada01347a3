//! Error types for the scout-core crate.
//!
//! This module provides the [`ConfigError`] type for scan-request validation
//! errors shared across the workspace.

/// Errors that can occur while building or validating a scan request.
///
/// # Examples
///
/// ```
/// use scout_core::ConfigError;
///
/// let error = ConfigError::EmptyExtension(".".to_owned());
/// assert!(error.to_string().contains("extension"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An extension was empty after stripping its leading dot.
    #[error("invalid extension '{0}': empty after stripping the leading dot")]
    EmptyExtension(String),

    /// A root directory entry was the empty string.
    #[error("root paths must not be empty strings")]
    EmptyRoot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_extension_display() {
        let error = ConfigError::EmptyExtension(".".to_owned());
        let msg = error.to_string();
        assert!(msg.contains('.'));
        assert!(msg.contains("leading dot"));
    }

    #[test]
    fn test_empty_root_display() {
        let error = ConfigError::EmptyRoot;
        assert!(error.to_string().contains("root paths"));
    }
}
