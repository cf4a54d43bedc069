/// Call dispatcher: one type-erased native invocation.
///
/// The dispatcher checks the frame against the binding's recorded shape and
/// forwards it to the [`Invoker`]. It does no caching, logging or retries.
///
/// Shape violations (wrong arity, wrong argument kind, missing receiver for
/// an instance member) are defects in the calling facade, not runtime
/// conditions, and panic.

use std::sync::Arc;
use crate::binding::frame::ArgumentFrame;
use crate::binding::handle::Receiver;
use crate::binding::member::ResolvedBinding;
use crate::binding::native::Invoker;
use crate::binding::value::{Arg, Value, ValueKind};
use crate::error::DispatchError;

pub struct CallDispatcher {
    invoker: Arc<dyn Invoker>,
}

impl CallDispatcher {
    pub fn new(invoker: Arc<dyn Invoker>) -> Self {
        Self { invoker }
    }

    /// Invoke `binding` on `receiver` with `frame`.
    ///
    /// Native business errors come back as `DispatchError` carrying the
    /// native status code.
    ///
    /// # Panics
    ///
    /// If the frame length differs from the binding's arity, an argument
    /// kind differs from the declared kind (`Nil` slots accept anything),
    /// or an instance member is called without a receiver.
    pub fn invoke(
        &self,
        binding: &ResolvedBinding,
        receiver: Option<Receiver>,
        frame: ArgumentFrame<'_, '_>,
    ) -> Result<Value, DispatchError> {
        let shape = binding.shape();

        assert_eq!(
            frame.len(),
            shape.arity(),
            "argument frame for {} has {} arguments, binding expects {}",
            binding.key(),
            frame.len(),
            shape.arity()
        );

        for (index, (arg, expected)) in frame.as_slice().iter().zip(&shape.arg_kinds).enumerate() {
            assert!(
                accepts(*expected, arg),
                "argument {} of {} is {}, binding expects {}",
                index,
                binding.key(),
                arg.kind(),
                expected
            );
        }

        assert!(
            receiver.is_some() || !shape.requires_receiver(),
            "{} is an instance member and was dispatched without a receiver",
            binding.key()
        );

        self.invoker
            .invoke(binding.token(), receiver, frame.as_slice())
            .map_err(DispatchError::new)
    }
}

/// `Nil` in a signature is the engine's variant slot
fn accepts(expected: ValueKind, arg: &Arg<'_>) -> bool {
    expected == ValueKind::Nil || expected == arg.kind()
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
