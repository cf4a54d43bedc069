/// Bindings: one native engine plus its binding cache and singleton slots.
///
/// This is the single owner of the process-wide resolution state. Facade
/// methods go through [`Bindings::call`], which composes the pieces:
/// cache lookup (resolving on first use), dispatch, typed decode.

use std::sync::Arc;
use crate::binding::binding_cache::BindingCache;
use crate::binding::dispatcher::CallDispatcher;
use crate::binding::frame::ArgumentFrame;
use crate::binding::handle::{Handle, OwnedHandle, Receiver};
use crate::binding::member::{MemberKey, MethodFlags, ResolvedBinding};
use crate::binding::native::{Invoker, NativeEngine, Resolver};
use crate::binding::singleton::SingletonRegistry;
use crate::binding::symbol_resolver::SymbolResolver;
use crate::binding::value::{Arg, FromValue, Value};
use crate::config::Config;
use crate::error::Result;

pub struct Bindings {
    resolver: Arc<dyn Resolver>,
    invoker: Arc<dyn Invoker>,
    symbols: SymbolResolver,
    cache: BindingCache,
    dispatcher: CallDispatcher,
    singletons: SingletonRegistry,
    config: Config,
}

impl Bindings {
    /// Bind to `engine` with the given configuration
    pub fn new<E: NativeEngine + 'static>(engine: E, config: Config) -> Self {
        Self::from_shared(Arc::new(engine), config)
    }

    /// Bind to an engine that is also shared elsewhere
    pub fn from_shared<E: NativeEngine + 'static>(engine: Arc<E>, config: Config) -> Self {
        let resolver: Arc<dyn Resolver> = engine.clone();
        let invoker: Arc<dyn Invoker> = engine;
        Self {
            symbols: SymbolResolver::new(Arc::clone(&resolver)),
            dispatcher: CallDispatcher::new(Arc::clone(&invoker)),
            resolver,
            invoker,
            cache: BindingCache::new(),
            singletons: SingletonRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &BindingCache {
        &self.cache
    }

    pub fn singletons(&self) -> &SingletonRegistry {
        &self.singletons
    }

    /// Resolved binding for `key` (cached after the first success)
    pub fn binding(&self, key: &MemberKey) -> Result<Arc<ResolvedBinding>> {
        self.cache.get_or_resolve(key, &self.symbols)
    }

    /// Handle of the engine singleton `name`
    pub fn singleton(&self, name: &str) -> Result<Handle> {
        self.singletons.get_singleton(name, self.resolver.as_ref())
    }

    /// Singleton handle ready to be used as a call receiver
    pub fn singleton_receiver(&self, name: &str) -> Result<Receiver> {
        self.singleton(name)?.as_receiver()
    }

    /// Resolve (or fetch) `key` and invoke it, returning the untyped result
    ///
    /// # Errors
    ///
    /// Resolution errors, or `Error::Dispatch` with the native status code.
    ///
    /// # Panics
    ///
    /// If the engine reports the member as returning an owned handle; those
    /// go through [`Bindings::call_owned`].
    pub fn call_raw(&self, key: &MemberKey, receiver: Option<Receiver>, args: &[Arg<'_>]) -> Result<Value> {
        let binding = self.binding(key)?;
        self.call_resolved(&binding, receiver, args)
    }

    /// Invoke a binding obtained from [`Bindings::binding`]
    ///
    /// # Panics
    ///
    /// Same contract as [`Bindings::call_raw`].
    pub fn call_resolved(&self, binding: &ResolvedBinding, receiver: Option<Receiver>, args: &[Arg<'_>]) -> Result<Value> {
        assert!(
            !binding.shape().flags.contains(MethodFlags::RETURNS_OWNED),
            "{} returns an owned handle and must be called through call_owned",
            binding.key()
        );
        self.invoke_binding(binding, receiver, args)
    }

    fn invoke_binding(&self, binding: &ResolvedBinding, receiver: Option<Receiver>, args: &[Arg<'_>]) -> Result<Value> {
        let value = self.dispatcher.invoke(binding, receiver, ArgumentFrame::new(args))?;
        Ok(value)
    }

    /// Resolve (or fetch) `key`, invoke it and decode the typed result
    pub fn call<R: FromValue>(&self, key: &MemberKey, receiver: Option<Receiver>, args: &[Arg<'_>]) -> Result<R> {
        R::from_value(self.call_raw(key, receiver, args)?)
    }

    /// Invoke a "create" operation whose handle the caller must free
    ///
    /// # Panics
    ///
    /// If the engine does not report the member as returning an owned handle.
    pub fn call_owned(&self, key: &MemberKey, receiver: Option<Receiver>, args: &[Arg<'_>]) -> Result<OwnedHandle> {
        let binding = self.binding(key)?;
        assert!(
            binding.shape().flags.contains(MethodFlags::RETURNS_OWNED),
            "{} returns a borrowed value and cannot be adopted as an owned handle",
            binding.key()
        );
        let handle = Handle::from_value(self.invoke_binding(&binding, receiver, args)?)?;
        Ok(OwnedHandle::adopt(handle, self.config.warn_on_leaked_handles))
    }

    /// Release an owned native object through the engine's release call.
    ///
    /// Consumes the handle, so it cannot be released twice. Null handles are
    /// dropped without a native call.
    pub fn release(&self, owned: OwnedHandle) {
        let handle = owned.into_handle();
        if handle.is_valid() {
            crate::bridge_trace!("galaxy3d::Bindings", "Releasing native object {}", handle);
            self.invoker.release(handle);
        }
    }
}

#[cfg(test)]
#[path = "bindings_tests.rs"]
mod tests;
