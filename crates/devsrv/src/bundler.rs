//! Module bundling behind a trait boundary.
//!
//! The server never bundles anything itself; it hands an entry point to a
//! [`Bundler`] and serves whatever comes back. The default implementation
//! shells out to the `esbuild` executable. Bundling is treated as idempotent
//! and side-effect-free, so concurrent requests for the same entry may run
//! redundant builds.

use crate::error::BundleError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Options forwarded to the bundler.
#[derive(Debug, Clone, Default)]
pub struct BundleOptions {
    /// Minify the produced code
    pub minify: bool,

    /// Module patterns to leave unresolved (e.g. `npm:*`, `./node_modules/*`)
    pub externals: Vec<String>,
}

/// A module bundler: entry point in, browser-loadable code out.
#[async_trait]
pub trait Bundler: Send + Sync {
    /// Bundle the module graph rooted at `entry` into a single ESM script.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundler cannot be launched or the build fails.
    async fn bundle(&self, entry: &Path, options: &BundleOptions) -> Result<String, BundleError>;
}

/// Bundler backed by the `esbuild` executable.
pub struct EsbuildBundler {
    executable: PathBuf,
}

impl EsbuildBundler {
    /// Create a bundler that invokes `esbuild` from `PATH`.
    pub fn new() -> Self {
        Self {
            executable: PathBuf::from("esbuild"),
        }
    }

    /// Create a bundler that invokes a specific executable.
    pub fn with_executable(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

impl Default for EsbuildBundler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn bundle(&self, entry: &Path, options: &BundleOptions) -> Result<String, BundleError> {
        let mut command = Command::new(&self.executable);
        command
            .arg(entry)
            .arg("--bundle")
            .arg("--format=esm")
            .arg("--platform=neutral")
            .arg("--target=esnext");

        if options.minify {
            command.arg("--minify");
        }
        for external in &options.externals {
            command.arg(format!("--external:{}", external));
        }

        let output = command.output().await.map_err(BundleError::Spawn)?;

        if !output.status.success() {
            return Err(BundleError::Failed {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BundleOptions::default();
        assert!(!options.minify);
        assert!(options.externals.is_empty());
    }

    #[tokio::test]
    async fn test_spawn_failure_on_missing_executable() {
        let bundler = EsbuildBundler::with_executable("/nonexistent/esbuild-test");
        let result = bundler
            .bundle(Path::new("main.ts"), &BundleOptions::default())
            .await;
        assert!(matches!(result, Err(BundleError::Spawn(_))));
    }

    #[tokio::test]
    async fn test_failed_build_carries_stderr() {
        // `false` exits non-zero without output; the error variant matters here
        let bundler = EsbuildBundler::with_executable("false");
        let result = bundler
            .bundle(Path::new("main.ts"), &BundleOptions::default())
            .await;
        assert!(matches!(result, Err(BundleError::Failed { .. })));
    }
}
