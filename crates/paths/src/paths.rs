//! Path context for runtime environment detection and project-aware paths.
//!
//! Layout below the base path:
//!
//! ```text
//! <base>/<studio>/<project_id>/
//!     config.json5 | config.toml
//!     logs/<app_id>.<timestamp>.log
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory name below the platform data dir in production.
const PRODUCT_DIR: &str = "Storefront";

/// Identifies the runtime environment where the application is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running via `cargo run` or in development mode
    Development,
    /// Running as an installed binary
    Production,
}

/// Context for managing application paths based on studio/project/app structure.
#[derive(Debug, Clone)]
pub struct PathContext {
    environment: RuntimeEnvironment,
    base_path: Arc<Path>,
    studio: String,
    project_id: String,
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext with automatic environment detection.
    pub fn new(
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        let environment = Self::detect_environment();
        let base_path = Self::determine_base_path(environment);

        Self {
            environment,
            base_path: base_path.into(),
            studio: studio.into(),
            project_id: project_id.into(),
            app_id,
        }
    }

    /// Creates a PathContext with an explicit base path (useful for testing).
    pub fn with_base_path(
        base_path: PathBuf,
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        Self {
            environment: Self::detect_environment(),
            base_path: base_path.into(),
            studio: studio.into(),
            project_id: project_id.into(),
            app_id,
        }
    }

    fn detect_environment() -> RuntimeEnvironment {
        if let Ok(exe_path) = std::env::current_exe() {
            if exe_path.components().any(|c| c.as_os_str() == "target") {
                return RuntimeEnvironment::Development;
            }
        }

        if std::env::var("CARGO").is_ok() || std::env::var("CARGO_MANIFEST_DIR").is_ok() {
            return RuntimeEnvironment::Development;
        }

        RuntimeEnvironment::Production
    }

    fn determine_base_path(environment: RuntimeEnvironment) -> PathBuf {
        match environment {
            RuntimeEnvironment::Development => std::env::var("CARGO_MANIFEST_DIR")
                .map(PathBuf::from)
                .or_else(|_| std::env::current_dir())
                .unwrap_or_else(|_| PathBuf::from(".")),
            // Application Support on macOS, LocalAppData on Windows, XDG_DATA_HOME elsewhere.
            RuntimeEnvironment::Production => dirs::data_local_dir()
                .map(|dir| dir.join(PRODUCT_DIR))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn studio(&self) -> &str {
        &self.studio
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn app_id(&self) -> &str {
        self.app_id
    }

    /// `<base>/<studio>/<project_id>`
    pub fn project_root(&self) -> PathBuf {
        self.base_path.join(&self.studio).join(&self.project_id)
    }

    /// Directory searched for `config.json5` / `config.toml`.
    pub fn config_dir(&self) -> PathBuf {
        self.project_root()
    }

    /// `<project_root>/config.<extension>`
    pub fn config_file(&self, extension: &str) -> PathBuf {
        self.config_dir().join(format!("config.{extension}"))
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.project_root().join("logs")
    }

    /// `<project_root>/logs/<app_id>.<timestamp>.log`
    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{}.log", self.app_id, timestamp))
    }

    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        self.log_file(&timestamp)
    }

    /// Creates the project root and the log directory if missing.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [self.project_root(), self.logs_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_context_structure() {
        let ctx = PathContext::with_base_path(
            PathBuf::from("/test/base"),
            "storefront",
            "address_book",
            "storefront",
        );

        assert_eq!(ctx.studio(), "storefront");
        assert_eq!(ctx.project_id(), "address_book");
        assert_eq!(ctx.app_id(), "storefront");
        assert_eq!(
            ctx.project_root(),
            PathBuf::from("/test/base/storefront/address_book")
        );
    }

    #[test]
    fn test_config_paths() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "studio", "project", "app");

        assert_eq!(ctx.config_dir(), PathBuf::from("/base/studio/project"));
        assert_eq!(
            ctx.config_file("json5"),
            PathBuf::from("/base/studio/project/config.json5")
        );
    }

    #[test]
    fn test_log_file_path() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "studio", "project", "app");

        let log_path = ctx.log_file("20240315-120000");
        assert_eq!(
            log_path,
            PathBuf::from("/base/studio/project/logs/app.20240315-120000.log")
        );
    }

    #[test]
    fn test_ensure_directories_creates_logs() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = PathContext::with_base_path(tmp.path().to_path_buf(), "s", "p", "app");

        ctx.ensure_directories().unwrap();
        assert!(ctx.logs_dir().is_dir());
        // Second call is a no-op.
        ctx.ensure_directories().unwrap();
    }
}
