/// Galaxy3D Bridge - process-wide access to the native engine bindings
///
/// This module holds the global [`Bindings`] instance used by facade types
/// created through their `singleton()` constructors, plus the logger. It uses
/// thread-safe static storage with RwLock for safe concurrent access.
///
/// The bindings are installed once and live until process exit: resolved
/// members and singleton handles stay valid while the engine runs, so there
/// is no teardown.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;
use crate::binding::{Bindings, NativeEngine};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};

// ===== INTERNAL STATE =====

/// Global bridge state storage
static BRIDGE_STATE: OnceLock<BridgeState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Minimum severity forwarded to the logger
static LOG_LEVEL: AtomicU8 = AtomicU8::new(severity_to_u8(LogSeverity::Info));

struct BridgeState {
    bindings: RwLock<Option<Arc<Bindings>>>,
}

impl BridgeState {
    fn new() -> Self {
        Self {
            bindings: RwLock::new(None),
        }
    }
}

const fn severity_to_u8(severity: LogSeverity) -> u8 {
    match severity {
        LogSeverity::Trace => 0,
        LogSeverity::Debug => 1,
        LogSeverity::Info => 2,
        LogSeverity::Warn => 3,
        LogSeverity::Error => 4,
    }
}

fn severity_from_u8(value: u8) -> LogSeverity {
    match value {
        0 => LogSeverity::Trace,
        1 => LogSeverity::Debug,
        2 => LogSeverity::Info,
        3 => LogSeverity::Warn,
        _ => LogSeverity::Error,
    }
}

// ===== PUBLIC API =====

/// Process-wide bridge manager
///
/// # Example
///
/// ```ignore
/// use galaxy_3d_bridge::galaxy3d::{Bridge, Config, classes::DisplayServer};
/// use galaxy_3d_bridge_native::galaxy3d::FfiEngine;
///
/// let engine = FfiEngine::load("libgalaxy3d_engine.so")?;
/// Bridge::install(engine, Config::default())?;
///
/// let display = DisplayServer::singleton()?;
/// let screens = display.get_screen_count()?;
/// # Ok::<(), galaxy_3d_bridge::galaxy3d::Error>(())
/// ```
pub struct Bridge;

impl Bridge {
    /// Log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        crate::bridge_error!("galaxy3d::Bridge", "{}", error);
        error
    }

    /// Initialize the bridge state
    ///
    /// Idempotent. Called implicitly by `install()`.
    pub fn initialize() -> Result<()> {
        BRIDGE_STATE.get_or_init(BridgeState::new);
        Ok(())
    }

    /// Bind to `engine` and make the bindings globally available
    ///
    /// # Errors
    ///
    /// Returns an error if bindings are already installed or the lock is
    /// poisoned.
    pub fn install<E: NativeEngine + 'static>(engine: E, config: Config) -> Result<Arc<Bindings>> {
        Self::install_bindings(Bindings::new(engine, config))
    }

    /// Make an already built [`Bindings`] globally available
    pub fn install_bindings(bindings: Bindings) -> Result<Arc<Bindings>> {
        Self::initialize()?;
        let state = BRIDGE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Bridge state missing after initialize()".to_string())
            ))?;

        let mut lock = state.bindings.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Bindings lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("Native engine bindings already installed".to_string())
            ));
        }

        Self::set_log_level(bindings.config().log_level);

        let bindings = Arc::new(bindings);
        *lock = Some(Arc::clone(&bindings));

        crate::bridge_info!("galaxy3d::Bridge", "Native engine bindings installed");

        Ok(bindings)
    }

    /// Get the installed bindings
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been installed yet.
    pub fn bindings() -> Result<Arc<Bindings>> {
        let state = BRIDGE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Bridge not initialized. Call Bridge::install() first.".to_string())
            ))?;

        let lock = state.bindings.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Bindings lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("No native engine installed. Call Bridge::install() first.".to_string())
            ))
    }

    /// Whether bindings have been installed
    pub fn is_installed() -> bool {
        BRIDGE_STATE
            .get()
            .and_then(|state| state.bindings.read().ok().map(|lock| lock.is_some()))
            .unwrap_or(false)
    }

    /// Drop the installed bindings (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        if let Some(state) = BRIDGE_STATE.get() {
            if let Ok(mut bindings) = state.bindings.write() {
                *bindings = None;
            }
        }
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Set the minimum severity forwarded to the logger
    pub fn set_log_level(level: LogSeverity) {
        LOG_LEVEL.store(severity_to_u8(level), Ordering::Relaxed);
    }

    /// Current minimum severity
    pub fn log_level() -> LogSeverity {
        severity_from_u8(LOG_LEVEL.load(Ordering::Relaxed))
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like bridge_info!, bridge_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch_log(severity, source, message, None, None);
    }

    /// Internal logging method with file:line information (for ERROR logs)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch_log(severity, source, message, Some(file), Some(line));
    }

    fn dispatch_log(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if severity < Self::log_level() {
            return;
        }
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
