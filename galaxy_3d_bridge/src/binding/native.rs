/// Native collaborator interface.
///
/// The bridge talks to the engine through two small capabilities:
/// - [`Resolver`]: name + compat tag → opaque token, singleton lookup
/// - [`Invoker`]: token + receiver + arguments → value, handle release
///
/// Everything above this module depends only on these traits, so the binding
/// layer runs against an in-process fake as well as a loaded native library.

use crate::binding::handle::{Handle, Receiver};
use crate::binding::member::{BindingShape, BindingToken};
use crate::binding::value::{Arg, Value};

/// Native status codes shared with the engine
pub mod status {
    pub const OK: i32 = 0;
    pub const FAILED: i32 = 1;
    pub const UNAVAILABLE: i32 = 2;
    pub const UNCONFIGURED: i32 = 3;
    pub const PARAMETER_RANGE: i32 = 5;
    pub const OUT_OF_MEMORY: i32 = 6;
    pub const ALREADY_IN_USE: i32 = 22;
    pub const INVALID_PARAMETER: i32 = 31;
    pub const DOES_NOT_EXIST: i32 = 33;
}

/// Outcome of a native resolution request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Member found at the requested compat tag
    Found {
        token: BindingToken,
        shape: BindingShape,
    },
    /// Class has no member with that name
    UnknownMember,
    /// Member exists, only at other compat tags
    IncompatibleAbi {
        available: Vec<u64>,
    },
}

/// Name-based lookup side of the native engine
pub trait Resolver: Send + Sync {
    /// Resolve `class::member` at `compat_tag`.
    ///
    /// Assumed expensive (string lookups across the engine registry);
    /// callers cache the result.
    fn resolve(&self, class: &str, member: &str, compat_tag: u64) -> Resolution;

    /// Handle of the engine-created singleton named `name`, if it exists
    fn lookup_singleton(&self, name: &str) -> Option<Handle>;
}

/// Call side of the native engine
pub trait Invoker: Send + Sync {
    /// Perform one call.
    ///
    /// `argv` always has the arity the token was resolved with; borrowed
    /// buffers inside it are only valid until this returns.
    /// `Err` carries the native status code.
    fn invoke(
        &self,
        token: BindingToken,
        receiver: Option<Receiver>,
        argv: &[Arg<'_>],
    ) -> std::result::Result<Value, i32>;

    /// Release an owned native object.
    ///
    /// Behaviour on an already released handle is undefined; the bridge
    /// never calls this twice for the same owned handle.
    fn release(&self, handle: Handle);
}

/// Full native engine collaborator
pub trait NativeEngine: Resolver + Invoker {}

impl<T: Resolver + Invoker> NativeEngine for T {}
