/// Per-call argument frame.
///
/// A frame is a borrowed, fixed-length view over arguments that the facade
/// builds on its own stack. It lives for exactly one dispatch.
///
/// # Example
///
/// ```ignore
/// let args = [Arg::from(screen)];
/// dispatcher.invoke(&binding, receiver, ArgumentFrame::new(&args))?;
/// ```

use crate::binding::value::{Arg, ValueKind};

#[derive(Debug, Clone, Copy)]
pub struct ArgumentFrame<'f, 'a> {
    args: &'f [Arg<'a>],
}

impl<'f, 'a> ArgumentFrame<'f, 'a> {
    pub fn new(args: &'f [Arg<'a>]) -> Self {
        Self { args }
    }

    /// Frame for zero-argument calls
    pub fn empty() -> Self {
        Self { args: &[] }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn as_slice(&self) -> &'f [Arg<'a>] {
        self.args
    }

    pub fn kinds(&self) -> Vec<ValueKind> {
        self.args.iter().map(Arg::kind).collect()
    }
}
