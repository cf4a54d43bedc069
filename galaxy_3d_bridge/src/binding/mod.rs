//! Native interop binding layer
//!
//! Resolves native members by `class + member + compat tag`, caches the
//! resolution for the life of the process, and dispatches type-erased calls
//! against opaque native handles.

pub mod handle;
pub mod member;
pub mod value;
pub mod frame;
pub mod native;
pub mod symbol_resolver;
pub mod binding_cache;
pub mod dispatcher;
pub mod singleton;
mod bindings;

pub use handle::{Handle, OwnedHandle, Receiver, is_valid, as_receiver};
pub use member::{MemberKey, MethodFlags, BindingShape, BindingToken, ResolvedBinding};
pub use value::{Arg, Value, ValueKind, FromValue};
pub use frame::ArgumentFrame;
pub use native::{status, Resolution, Resolver, Invoker, NativeEngine};
pub use symbol_resolver::SymbolResolver;
pub use binding_cache::{BindingCache, CacheStats};
pub use dispatcher::CallDispatcher;
pub use singleton::SingletonRegistry;
pub use bindings::Bindings;

// Mock native engine for tests (no engine library required)
#[cfg(test)]
pub mod mock_native_engine;
