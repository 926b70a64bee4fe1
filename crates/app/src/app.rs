use paths::PathContext;
use std::marker::PhantomData;
#[cfg(debug_assertions)]
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Contains path management, version info, and logging infrastructure.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "storefront";
    const PROJECT_ID: &'static str = "address_book";
    /// Mirror log events to stderr. Full-screen terminal apps turn this off.
    const CONSOLE_LOG: bool = true;
}

/// Builder for creating applications with proper initialization.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new application builder.
    ///
    /// This performs all the common initialization:
    /// - Sets up path context (platform-specific directories)
    /// - Ensures all directories exist
    /// - Initializes logging (file + optional console)
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        #[cfg(debug_assertions)]
        let path_context = PathContext::with_base_path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join(".out"),
            A::STUDIO,
            A::PROJECT_ID,
            A::APP_ID,
        );
        #[cfg(not(debug_assertions))]
        let path_context = PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID);

        Self::with_path_context(path_context, version)
    }

    /// Same as `new`, with the directory layout supplied by the caller.
    pub fn with_path_context(
        path_context: PathContext,
        version: &'static str,
    ) -> Result<Self, BoxError> {
        path_context.ensure_directories()?;

        let log_file_path = path_context.log_file_now();
        let (Some(log_dir), Some(log_filename)) =
            (log_file_path.parent(), log_file_path.file_name())
        else {
            return Err(format!("invalid log file path: {}", log_file_path.display()).into());
        };

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        #[cfg(debug_assertions)]
        let default_level = "info";
        #[cfg(not(debug_assertions))]
        let default_level = "warn";

        // RUST_LOG wins over the build-dependent default.
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking);

        let console_layer = A::CONSOLE_LOG.then(|| {
            fmt::Layer::default()
                .with_target(false)
                .with_writer(std::io::stderr)
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .with(ErrorLayer::default())
            .try_init()?;

        tracing::info!(
            app = A::APP_ID,
            version,
            environment = ?path_context.environment(),
            base = %path_context.base_path().display(),
            log = %log_file_path.display(),
            "application initialized"
        );

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    /// Returns the `AppContext`; the builder has nothing else to configure.
    pub fn build_simple(self) -> AppContext {
        self.context
    }
}
