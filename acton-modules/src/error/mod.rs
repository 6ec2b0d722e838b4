//! Error types and error handling
//!
//! Every fallible registry, repository, and generator operation returns a
//! [`RegistryResult`]. Errors fall into two groups:
//!
//! - **Validation** (`NotFound`, `AlreadyExists`, `InvalidSlug`,
//!   `InvalidArtifactName`): the caller asked
//!   for something that does not make sense for the current registry state. The
//!   CLI renders these as plain messages.
//! - **Infrastructure** (`Io`, `Database`, `Serialization`, `Configuration`): the
//!   backing store or configuration failed. These propagate to the process
//!   boundary.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Registry error type
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Referenced module does not exist
    #[error("Module [{0}] does not exist.")]
    NotFound(String),

    /// Module already exists and cannot be scaffolded again
    #[error("Module [{0}] already exists.")]
    AlreadyExists(String),

    /// Input could not be normalised into a slug
    #[error("Invalid module slug: '{0}'. Use lowercase letters, digits, and underscores, starting with a letter")]
    InvalidSlug(String),

    /// Controller or table name with nothing usable after normalisation
    #[error("Invalid artifact name: '{0}'. Use letters or digits")]
    InvalidArtifactName(String),

    /// Filesystem failure at a specific path
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Database backend failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Descriptor or settings could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration (unsupported driver, missing custom repository, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

impl RegistryError {
    /// Wrap an I/O error with the path it occurred at
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error is a user-facing validation failure rather than an
    /// infrastructure failure
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::AlreadyExists(_)
                | Self::InvalidSlug(_)
                | Self::InvalidArtifactName(_)
        )
    }
}

impl From<figment::Error> for RegistryError {
    fn from(error: figment::Error) -> Self {
        Self::Configuration(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(RegistryError::NotFound("blog".into()).is_validation());
        assert!(RegistryError::AlreadyExists("blog".into()).is_validation());
        assert!(RegistryError::InvalidSlug("Bad Slug".into()).is_validation());
        assert!(RegistryError::InvalidArtifactName("--".into()).is_validation());
        assert!(!RegistryError::Configuration("nope".into()).is_validation());

        let io = RegistryError::io("/tmp/x", std::io::Error::other("boom"));
        assert!(!io.is_validation());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            RegistryError::NotFound("blog".into()).to_string(),
            "Module [blog] does not exist."
        );
        assert_eq!(
            RegistryError::AlreadyExists("Blog".into()).to_string(),
            "Module [Blog] already exists."
        );

        let io = RegistryError::io("/tmp/modules", std::io::Error::other("denied"));
        assert_eq!(io.to_string(), "I/O error at /tmp/modules: denied");
    }
}
