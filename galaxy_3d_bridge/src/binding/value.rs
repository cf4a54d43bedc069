/// Values crossing the native boundary.
///
/// Arguments are borrowed ([`Arg`]): strings, byte buffers and handle arrays
/// are passed as views into caller-owned memory that only has to outlive the
/// call. Results are owned ([`Value`]): whatever the native side returns is
/// copied into managed memory before the call returns.

use std::fmt;
use glam::{IVec2, Vec2};
use crate::binding::handle::{Handle, OwnedHandle};
use crate::error::{Error, Result};

// ===== KIND =====

/// Shape of one argument or return slot in a native signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Int,
    Float,
    String,
    Bytes,
    Handle,
    HandleArray,
    Vector2i,
    Vector2,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ===== ARGUMENTS =====

/// Borrowed argument value, marshaled into the native ABI for one call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    Bytes(&'a [u8]),
    Handle(Handle),
    Handles(&'a [Handle]),
    Vector2i(IVec2),
    Vector2(Vec2),
}

impl<'a> Arg<'a> {
    pub fn kind(&self) -> ValueKind {
        match self {
            Arg::Nil => ValueKind::Nil,
            Arg::Bool(_) => ValueKind::Bool,
            Arg::Int(_) => ValueKind::Int,
            Arg::Float(_) => ValueKind::Float,
            Arg::Str(_) => ValueKind::String,
            Arg::Bytes(_) => ValueKind::Bytes,
            Arg::Handle(_) => ValueKind::Handle,
            Arg::Handles(_) => ValueKind::HandleArray,
            Arg::Vector2i(_) => ValueKind::Vector2i,
            Arg::Vector2(_) => ValueKind::Vector2,
        }
    }

    /// Copy the argument into an owned value (used by in-process collaborators)
    pub fn to_value(&self) -> Value {
        match *self {
            Arg::Nil => Value::Nil,
            Arg::Bool(b) => Value::Bool(b),
            Arg::Int(i) => Value::Int(i),
            Arg::Float(x) => Value::Float(x),
            Arg::Str(s) => Value::String(s.to_owned()),
            Arg::Bytes(b) => Value::Bytes(b.to_vec()),
            Arg::Handle(h) => Value::Handle(h),
            Arg::Handles(hs) => Value::HandleArray(hs.to_vec()),
            Arg::Vector2i(v) => Value::Vector2i(v),
            Arg::Vector2(v) => Value::Vector2(v),
        }
    }
}

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl From<i32> for Arg<'_> {
    fn from(value: i32) -> Self {
        Arg::Int(value as i64)
    }
}

impl From<u32> for Arg<'_> {
    fn from(value: u32) -> Self {
        Arg::Int(value as i64)
    }
}

impl From<i64> for Arg<'_> {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<f32> for Arg<'_> {
    fn from(value: f32) -> Self {
        Arg::Float(value as f64)
    }
}

impl From<f64> for Arg<'_> {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Arg::Str(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Arg::Bytes(value)
    }
}

impl From<Handle> for Arg<'_> {
    fn from(value: Handle) -> Self {
        Arg::Handle(value)
    }
}

impl<'a> From<&'a OwnedHandle> for Arg<'a> {
    fn from(value: &'a OwnedHandle) -> Self {
        Arg::Handle(value.handle())
    }
}

impl<'a> From<&'a [Handle]> for Arg<'a> {
    fn from(value: &'a [Handle]) -> Self {
        Arg::Handles(value)
    }
}

impl From<IVec2> for Arg<'_> {
    fn from(value: IVec2) -> Self {
        Arg::Vector2i(value)
    }
}

impl From<Vec2> for Arg<'_> {
    fn from(value: Vec2) -> Self {
        Arg::Vector2(value)
    }
}

// ===== RESULTS =====

/// Owned value returned by a native call
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Handle(Handle),
    HandleArray(Vec<Handle>),
    Vector2i(IVec2),
    Vector2(Vec2),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Handle(_) => ValueKind::Handle,
            Value::HandleArray(_) => ValueKind::HandleArray,
            Value::Vector2i(_) => ValueKind::Vector2i,
            Value::Vector2(_) => ValueKind::Vector2,
        }
    }

    /// Borrow this value as an argument
    pub fn as_arg(&self) -> Arg<'_> {
        match self {
            Value::Nil => Arg::Nil,
            Value::Bool(b) => Arg::Bool(*b),
            Value::Int(i) => Arg::Int(*i),
            Value::Float(x) => Arg::Float(*x),
            Value::String(s) => Arg::Str(s),
            Value::Bytes(b) => Arg::Bytes(b),
            Value::Handle(h) => Arg::Handle(*h),
            Value::HandleArray(hs) => Arg::Handles(hs),
            Value::Vector2i(v) => Arg::Vector2i(*v),
            Value::Vector2(v) => Arg::Vector2(*v),
        }
    }

    fn mismatch(self, expected: ValueKind) -> Error {
        Error::TypeMismatch {
            expected: expected.to_string(),
            got: self.kind().to_string(),
        }
    }
}

/// Decode a typed result from a native [`Value`]
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! impl_from_value {
    ($ty:ty, $kind:ident, $pat:pat => $out:expr) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self> {
                match value {
                    $pat => Ok($out),
                    other => Err(other.mismatch(ValueKind::$kind)),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, Value::Bool(b) => b);
impl_from_value!(i64, Int, Value::Int(i) => i);
impl_from_value!(f64, Float, Value::Float(x) => x);
impl_from_value!(String, String, Value::String(s) => s);
impl_from_value!(Vec<u8>, Bytes, Value::Bytes(b) => b);
impl_from_value!(Handle, Handle, Value::Handle(h) => h);
impl_from_value!(Vec<Handle>, HandleArray, Value::HandleArray(hs) => hs);
impl_from_value!(IVec2, Vector2i, Value::Vector2i(v) => v);
impl_from_value!(Vec2, Vector2, Value::Vector2(v) => v);
impl_from_value!((), Nil, Value::Nil => ());

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| Error::OutOfRange(format!("{} does not fit in i32", wide)))
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|x| x as f32)
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
