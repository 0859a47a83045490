//! Server configuration.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Configuration for a [`Server`](crate::server::Server).
///
/// All fields have defaults suitable for serving the current directory on
/// port 3000 with every feature enabled. The configuration is immutable once
/// a server is constructed from it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host name or address to bind
    pub hostname: String,

    /// Port number to bind
    pub port: u16,

    /// TLS certificate file, carried for front-ends that terminate TLS
    pub tls_cert: Option<PathBuf>,

    /// TLS key file, carried for front-ends that terminate TLS
    pub tls_key: Option<PathBuf>,

    /// Directory index file name, served when a path resolves to a directory
    pub directory_index: String,

    /// Reload connected browser tabs when files under the document root change
    pub live_reload: bool,

    /// Bundle `*.bundle.js` requests from same-named TypeScript sources
    pub bundle: bool,

    /// Serve the playground page on `*.playground` requests
    pub playground: bool,

    /// Document root directory
    pub document_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 3000,
            tls_cert: None,
            tls_key: None,
            directory_index: "index.html".to_string(),
            live_reload: true,
            bundle: true,
            playground: true,
            document_root: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the document root does not exist or is not a directory
    /// - the directory index is empty or contains path separators
    /// - only one of the TLS certificate/key pair is set
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.document_root.is_dir() {
            return Err(ConfigError::DocumentRootNotFound(
                self.document_root.clone(),
            ));
        }

        if self.directory_index.is_empty()
            || self.directory_index.contains('/')
            || self.directory_index.contains('\\')
        {
            return Err(ConfigError::InvalidValue {
                field: "directoryIndex".to_string(),
                value: self.directory_index.clone(),
                hint: "Use a bare filename such as index.html, not a path".to_string(),
            });
        }

        if self.tls_cert.is_some() != self.tls_key.is_some() {
            return Err(ConfigError::InvalidValue {
                field: "tlsCert/tlsKey".to_string(),
                value: "only one of the pair is set".to_string(),
                hint: "Provide both the certificate and the key, or neither".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.hostname, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.directory_index, "index.html");
        assert!(config.live_reload);
        assert!(config.bundle);
        assert!(config.playground);
        assert_eq!(config.document_root, PathBuf::from("."));
        assert!(config.tls_cert.is_none());
        assert!(config.tls_key.is_none());
    }

    #[test]
    fn test_validate_ok() {
        let temp = TempDir::new().unwrap();
        let config = ServerConfig {
            document_root: temp.path().to_path_buf(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_document_root() {
        let config = ServerConfig {
            document_root: PathBuf::from("/nonexistent/devsrv-test"),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DocumentRootNotFound(_))
        ));
    }

    #[test]
    fn test_validate_rejects_directory_index_path() {
        let temp = TempDir::new().unwrap();
        let config = ServerConfig {
            document_root: temp.path().to_path_buf(),
            directory_index: "pages/index.html".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_half_tls_pair() {
        let temp = TempDir::new().unwrap();
        let config = ServerConfig {
            document_root: temp.path().to_path_buf(),
            tls_cert: Some(PathBuf::from("cert.pem")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
