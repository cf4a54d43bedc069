/// Bridge configuration

use crate::log::LogSeverity;

/// Configuration of a [`Bindings`](crate::binding::Bindings) instance
#[derive(Debug, Clone)]
pub struct Config {
    /// Degrade display operations to documented dummy values when the
    /// display singleton is missing (headless engine). When `false`,
    /// `Error::SingletonUnavailable` propagates to the caller.
    pub headless_fallback: bool,
    /// Minimum severity forwarded to the installed logger.
    ///
    /// Applied when the bindings are installed through `Bridge::install` or
    /// `Bridge::install_bindings`. A `Bindings` used without installing leaves
    /// the global level untouched; use `Bridge::set_log_level` for those.
    pub log_level: LogSeverity,
    /// Log a warning when an owned handle is dropped without being freed
    pub warn_on_leaked_handles: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headless_fallback: true,
            log_level: if cfg!(debug_assertions) { LogSeverity::Debug } else { LogSeverity::Info },
            warn_on_leaked_handles: true,
        }
    }
}

impl Config {
    pub fn with_headless_fallback(mut self, enabled: bool) -> Self {
        self.headless_fallback = enabled;
        self
    }

    pub fn with_log_level(mut self, level: LogSeverity) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_leak_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_leaked_handles = enabled;
        self
    }
}
