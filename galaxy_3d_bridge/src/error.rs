//! Error types for the Galaxy3D native bridge
//!
//! This module defines the error types surfaced by the binding layer:
//! symbol resolution, handle validation, native dispatch, singleton lookup
//! and the operation-specific outcomes decoded by facade methods.

use std::fmt;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Native-reported failure of a single invocation
///
/// Wraps the status code returned by the native collaborator. Facade methods
/// decode it into operation-specific outcomes (`OutOfRange`, `Unsupported`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchError {
    /// Raw status code reported by the native side (never `status::OK`)
    pub native_code: i32,
}

impl DispatchError {
    /// Wrap a native status code
    pub const fn new(native_code: i32) -> Self {
        Self { native_code }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native call failed with status {}", self.native_code)
    }
}

impl std::error::Error for DispatchError {}

/// Galaxy3D bridge errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The native class has no member with that name
    UnknownMember {
        class: String,
        member: String,
    },

    /// The member exists, but not with the requested compatibility tag
    IncompatibleAbi {
        class: String,
        member: String,
        compat_tag: u64,
        /// Tags the engine build does offer for this member
        available: Vec<u64>,
    },

    /// Null handle used where a receiver is required
    InvalidHandle(String),

    /// Native call returned an error status
    Dispatch(DispatchError),

    /// Native singleton not present (e.g. display service in headless mode)
    SingletonUnavailable(String),

    /// Native side rejected an index or parameter as out of range
    OutOfRange(String),

    /// Operation not supported by this engine build or platform
    Unsupported(String),

    /// Native result did not have the kind the facade expects
    TypeMismatch {
        expected: String,
        got: String,
    },

    /// Initialization failed (bridge, native library, subsystems)
    InitializationFailed(String),

    /// Backend-specific error
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownMember { class, member } => {
                write!(f, "Unknown member: {}::{}", class, member)
            }
            Error::IncompatibleAbi { class, member, compat_tag, available } => write!(
                f,
                "Incompatible ABI: {}::{} has no entry point for compat tag {} (available: {:?})",
                class, member, compat_tag, available
            ),
            Error::InvalidHandle(msg) => write!(f, "Invalid handle: {}", msg),
            Error::Dispatch(err) => write!(f, "Dispatch error: {}", err),
            Error::SingletonUnavailable(name) => write!(f, "Singleton unavailable: {}", name),
            Error::OutOfRange(msg) => write!(f, "Out of range: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            Error::TypeMismatch { expected, got } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, got)
            }
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Dispatch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DispatchError> for Error {
    fn from(err: DispatchError) -> Self {
        Error::Dispatch(err)
    }
}

// ===== ERROR MACROS =====

/// Log an error and build an `Error::BackendError` from the same message
///
/// # Example
///
/// ```ignore
/// let err = bridge_err!("galaxy3d::native", "Symbol '{}' missing", name);
/// ```
#[macro_export]
macro_rules! bridge_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::bridge_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an error and return early with `Err(Error::BackendError)`
///
/// # Example
///
/// ```ignore
/// if version != ABI_VERSION {
///     bridge_bail!("galaxy3d::native", "ABI version {} not supported", version);
/// }
/// ```
#[macro_export]
macro_rules! bridge_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::bridge_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
