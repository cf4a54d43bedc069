//! Engine class facades
//!
//! Typed wrappers over single native operations. Each method resolves its
//! fixed `MemberKey` through the binding cache, picks its receiver (engine
//! singleton or caller handle), fills in documented defaults, dispatches and
//! decodes the result.
//!
//! Ownership is part of each signature: operations that create a native
//! resource return an [`OwnedHandle`](crate::binding::OwnedHandle) that must be
//! passed to the matching free operation; operations that look something up
//! return a borrowed [`Handle`](crate::binding::Handle) that must never be freed.

pub mod display_server;
pub mod rendering_server;
pub mod rendering_device;

pub use display_server::{DisplayServer, WindowMode, Feature, MAIN_WINDOW_ID, SCREEN_OF_MAIN_WINDOW};
pub use rendering_server::RenderingServer;
pub use rendering_device::{RenderingDevice, LocalRenderingDevice};

use std::fmt;
use crate::binding::{status, OwnedHandle};
use crate::error::{DispatchError, Error};

/// Map the native statuses every facade shares onto typed errors.
///
/// `context` describes the operation and its arguments for the message.
pub(crate) fn decode_status(err: Error, context: impl FnOnce() -> String) -> Error {
    match err {
        Error::Dispatch(DispatchError { native_code: status::PARAMETER_RANGE }) => Error::OutOfRange(context()),
        Error::Dispatch(DispatchError { native_code: status::UNAVAILABLE }) => Error::Unsupported(context()),
        other => other,
    }
}

/// A free operation that did not go through.
///
/// Carries the resource back to the caller, who still owns it and may retry
/// the free. Converting into [`Error`] drops the handle, which logs a leak
/// warning.
#[derive(Debug)]
pub struct FreeError {
    error: Error,
    rid: OwnedHandle,
}

impl FreeError {
    pub(crate) fn new(error: Error, rid: OwnedHandle) -> Self {
        Self { error, rid }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Take the still-owned resource back
    pub fn into_rid(self) -> OwnedHandle {
        self.rid
    }
}

impl fmt::Display for FreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (resource {} not freed)", self.error, self.rid.handle())
    }
}

impl std::error::Error for FreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<FreeError> for Error {
    fn from(err: FreeError) -> Self {
        err.error
    }
}
