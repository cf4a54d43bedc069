/// Member identity and resolved binding types.

use std::borrow::Cow;
use std::fmt;
use std::num::NonZeroU64;
use bitflags::bitflags;
use crate::binding::value::ValueKind;

// ===== MEMBER KEY =====

/// Identifies one native operation: `(class, member, compat_tag)`.
///
/// Two keys with the same class and member but different compat tags are
/// different ABI shapes of the same logical operation. They resolve and
/// cache independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberKey {
    class: Cow<'static, str>,
    member: Cow<'static, str>,
    compat_tag: u64,
}

impl MemberKey {
    /// Key for a statically known member (usable in `const` items)
    pub const fn new(class: &'static str, member: &'static str, compat_tag: u64) -> Self {
        Self {
            class: Cow::Borrowed(class),
            member: Cow::Borrowed(member),
            compat_tag,
        }
    }

    /// Key built from runtime names (e.g. a scripting host)
    pub fn dynamic(class: impl Into<String>, member: impl Into<String>, compat_tag: u64) -> Self {
        Self {
            class: Cow::Owned(class.into()),
            member: Cow::Owned(member.into()),
            compat_tag,
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn compat_tag(&self) -> u64 {
        self.compat_tag
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}#{}", self.class, self.member, self.compat_tag)
    }
}

// ===== SHAPE =====

bitflags! {
    /// Method properties reported by the native registry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodFlags: u32 {
        /// Does not mutate the receiver
        const CONST = 1 << 0;
        /// Called without a receiver
        const STATIC = 1 << 1;
        /// Returned handle is owned by the caller and must be freed
        const RETURNS_OWNED = 1 << 2;
    }
}

/// Call shape of a resolved member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingShape {
    pub arg_kinds: Vec<ValueKind>,
    pub return_kind: ValueKind,
    pub flags: MethodFlags,
}

impl BindingShape {
    pub fn new(arg_kinds: impl Into<Vec<ValueKind>>, return_kind: ValueKind, flags: MethodFlags) -> Self {
        Self {
            arg_kinds: arg_kinds.into(),
            return_kind,
            flags,
        }
    }

    pub fn arity(&self) -> usize {
        self.arg_kinds.len()
    }

    pub fn requires_receiver(&self) -> bool {
        !self.flags.contains(MethodFlags::STATIC)
    }
}

// ===== RESOLVED BINDING =====

/// Opaque native call target handed out by the resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingToken(NonZeroU64);

impl BindingToken {
    /// `None` for zero, which the native side uses for "not found"
    pub const fn from_raw(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    pub const fn to_raw(self) -> u64 {
        self.0.get()
    }
}

/// A member resolved to a callable native target.
///
/// Created once per [`MemberKey`] on first use, immutable afterwards and
/// kept for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    key: MemberKey,
    token: BindingToken,
    shape: BindingShape,
}

impl ResolvedBinding {
    pub fn new(key: MemberKey, token: BindingToken, shape: BindingShape) -> Self {
        Self { key, token, shape }
    }

    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    pub fn token(&self) -> BindingToken {
        self.token
    }

    pub fn shape(&self) -> &BindingShape {
        &self.shape
    }

    pub fn arity(&self) -> usize {
        self.shape.arity()
    }
}
