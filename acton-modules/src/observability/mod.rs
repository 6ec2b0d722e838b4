//! Observability (structured logging)
//!
//! The library only emits `tracing` events; binaries decide how to render them
//! by calling [`init`] once at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging stack
///
/// Sets up:
/// - Environment-based log level filtering (`RUST_LOG`)
/// - Pretty formatting in debug builds, JSON formatting in release builds
///
/// `verbose` raises the fallback filter when `RUST_LOG` is not set.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
///
/// # Example
///
/// ```rust,no_run
/// use acton_modules::observability;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// observability::init(false)?;
/// tracing::info!("Registry ready");
/// # Ok(())
/// # }
/// ```
pub fn init(verbose: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    }
}

/// Filter used when `RUST_LOG` is unset
const fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug,acton_modules=trace"
    } else if cfg!(debug_assertions) {
        "warn,acton_modules=info"
    } else {
        "warn"
    }
}
