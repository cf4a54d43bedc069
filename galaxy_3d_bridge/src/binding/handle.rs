/// Opaque references to native-side objects and resources.
///
/// A [`Handle`] is a plain pointer-sized token: freely copyable, shareable
/// across threads, and non-owning. Handles returned by "create" operations are
/// wrapped in an [`OwnedHandle`] instead, which the caller must pass to the
/// paired free operation exactly once.

use std::fmt;
use std::num::NonZeroU64;
use crate::error::{Error, Result};

// ===== HANDLE =====

/// Non-owning reference to a native object or resource id
///
/// `Handle::NULL` (zero) is the canonical "none" value and is never passed as
/// a receiver to the native side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Handle(u64);

impl Handle {
    /// The null sentinel
    pub const NULL: Handle = Handle(0);

    /// Wrap a raw token received from the native side
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw token as passed across the boundary
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    /// `true` iff this is not the null sentinel.
    ///
    /// Purely local: no native call is made to check liveness.
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Use this handle as the receiver (`self`) of a native call
    ///
    /// # Errors
    ///
    /// `Error::InvalidHandle` if the handle is null.
    pub fn as_receiver(self) -> Result<Receiver> {
        NonZeroU64::new(self.0)
            .map(Receiver)
            .ok_or_else(|| Error::InvalidHandle("null handle cannot be used as a call receiver".to_string()))
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Handle({:#x})", self.0)
        } else {
            write!(f, "Handle(NULL)")
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Free-function form of [`Handle::is_valid`]
pub const fn is_valid(handle: Handle) -> bool {
    handle.is_valid()
}

/// Free-function form of [`Handle::as_receiver`]
pub fn as_receiver(handle: Handle) -> Result<Receiver> {
    handle.as_receiver()
}

// ===== RECEIVER =====

/// A handle proven non-null, usable as the `self` argument of a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Receiver(NonZeroU64);

impl Receiver {
    /// The handle this receiver wraps
    pub const fn handle(self) -> Handle {
        Handle(self.0.get())
    }
}

impl From<Receiver> for Handle {
    fn from(receiver: Receiver) -> Self {
        receiver.handle()
    }
}

// ===== OWNED HANDLE =====

/// Handle the caller owns and must free exactly once
///
/// Returned by "create" facade operations. It is neither `Copy` nor `Clone`,
/// and the paired free operation takes it by value, so a well-typed caller
/// cannot issue a second free for the same resource. Dropping it without
/// freeing leaks the native resource; the bridge never frees automatically,
/// it only logs a warning.
#[must_use = "owned native handles must be passed to their free operation"]
pub struct OwnedHandle {
    handle: Handle,
    warn_on_leak: bool,
}

impl OwnedHandle {
    /// Take ownership of a handle returned by a "create" operation
    pub(crate) fn adopt(handle: Handle, warn_on_leak: bool) -> Self {
        Self { handle, warn_on_leak }
    }

    /// Borrow as a plain handle (for passing to other operations)
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// `true` iff the native side returned a non-null handle
    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    /// Give up ownership and return the raw handle.
    ///
    /// Used by free operations right before the native release. Also the
    /// escape hatch for handing ownership over to native code.
    pub fn into_handle(self) -> Handle {
        let handle = self.handle;
        std::mem::forget(self);
        handle
    }
}

impl fmt::Debug for OwnedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OwnedHandle").field(&self.handle).finish()
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        if self.warn_on_leak && self.handle.is_valid() {
            crate::bridge_warn!(
                "galaxy3d::Handle",
                "Owned handle {} dropped without being freed (native resource leaked)",
                self.handle
            );
        }
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
