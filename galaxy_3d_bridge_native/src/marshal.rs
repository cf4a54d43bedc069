/// Conversion between bridge values and the raw C ABI representation.

use glam::{IVec2, Vec2};
use galaxy_3d_bridge::galaxy3d::binding::{
    status, Arg, BindingShape, BindingToken, Handle, MethodFlags, Value, ValueKind,
};
use crate::abi::{tag, NativeApi, RawArg, RawShape, MAX_ARGS};

// ===== KINDS =====

pub fn kind_to_tag(kind: ValueKind) -> u32 {
    match kind {
        ValueKind::Nil => tag::NIL,
        ValueKind::Bool => tag::BOOL,
        ValueKind::Int => tag::INT,
        ValueKind::Float => tag::FLOAT,
        ValueKind::String => tag::STRING,
        ValueKind::Bytes => tag::BYTES,
        ValueKind::Handle => tag::HANDLE,
        ValueKind::HandleArray => tag::HANDLE_ARRAY,
        ValueKind::Vector2i => tag::VECTOR2I,
        ValueKind::Vector2 => tag::VECTOR2,
    }
}

pub fn kind_from_tag(raw: u32) -> Option<ValueKind> {
    Some(match raw {
        tag::NIL => ValueKind::Nil,
        tag::BOOL => ValueKind::Bool,
        tag::INT => ValueKind::Int,
        tag::FLOAT => ValueKind::Float,
        tag::STRING => ValueKind::String,
        tag::BYTES => ValueKind::Bytes,
        tag::HANDLE => ValueKind::Handle,
        tag::HANDLE_ARRAY => ValueKind::HandleArray,
        tag::VECTOR2I => ValueKind::Vector2i,
        tag::VECTOR2 => ValueKind::Vector2,
        _ => return None,
    })
}

/// Decode a resolved shape. `None` if the engine reported a zero token, an
/// arity above `MAX_ARGS` or an unknown kind tag.
pub fn shape_from_raw(raw: &RawShape) -> Option<(BindingToken, BindingShape)> {
    let token = BindingToken::from_raw(raw.token)?;
    let arg_count = raw.arg_count as usize;
    if arg_count > MAX_ARGS {
        return None;
    }
    let arg_kinds = raw.arg_kinds[..arg_count]
        .iter()
        .map(|kind| kind_from_tag(*kind))
        .collect::<Option<Vec<_>>>()?;
    let return_kind = kind_from_tag(raw.return_kind)?;
    let flags = MethodFlags::from_bits_truncate(raw.flags);
    Some((token, BindingShape::new(arg_kinds, return_kind, flags)))
}

// ===== ARGUMENTS =====

fn pack_pair(x: u32, y: u32) -> u64 {
    (x as u64) | ((y as u64) << 32)
}

fn unpack_pair(word: u64) -> (u32, u32) {
    (word as u32, (word >> 32) as u32)
}

/// Encode one argument. Pointers in the result borrow from `arg`.
pub fn arg_to_raw(arg: &Arg<'_>) -> RawArg {
    let (tag, a, b) = match *arg {
        Arg::Nil => (tag::NIL, 0, 0),
        Arg::Bool(value) => (tag::BOOL, value as u64, 0),
        Arg::Int(value) => (tag::INT, value as u64, 0),
        Arg::Float(value) => (tag::FLOAT, value.to_bits(), 0),
        Arg::Str(value) => (tag::STRING, value.as_ptr() as u64, value.len() as u64),
        Arg::Bytes(value) => (tag::BYTES, value.as_ptr() as u64, value.len() as u64),
        Arg::Handle(handle) => (tag::HANDLE, handle.to_raw(), 0),
        // Handle is a transparent u64
        Arg::Handles(handles) => (tag::HANDLE_ARRAY, handles.as_ptr() as u64, handles.len() as u64),
        Arg::Vector2i(v) => (tag::VECTOR2I, pack_pair(v.x as u32, v.y as u32), 0),
        Arg::Vector2(v) => (tag::VECTOR2, pack_pair(v.x.to_bits(), v.y.to_bits()), 0),
    };
    RawArg { tag, reserved: 0, a, b }
}

// ===== RESULTS =====

/// Copy `len` bytes at `ptr` into managed memory (null/empty gives empty)
///
/// # Safety
///
/// `ptr` must be valid for `len` bytes when non-null.
unsafe fn copy_bytes(ptr: u64, len: u64) -> Vec<u8> {
    if ptr == 0 || len == 0 {
        return Vec::new();
    }
    std::slice::from_raw_parts(ptr as *const u8, len as usize).to_vec()
}

/// Decode a returned value, copying any engine-owned buffer and handing it
/// back through `free_buffer`.
///
/// `Err(status::INVALID_PARAMETER)` for an unknown tag or a string that is
/// not valid UTF-8. Returned buffers are freed in either case.
///
/// # Safety
///
/// `raw` must come from a successful `invoke` of `api`: buffer pointers must
/// be valid for their stated length and owned by the engine.
pub unsafe fn value_from_raw(raw: &RawArg, api: &NativeApi) -> Result<Value, i32> {
    let value = match raw.tag {
        tag::NIL => Value::Nil,
        tag::BOOL => Value::Bool(raw.a != 0),
        tag::INT => Value::Int(raw.a as i64),
        tag::FLOAT => Value::Float(f64::from_bits(raw.a)),
        tag::STRING => {
            let bytes = copy_bytes(raw.a, raw.b);
            free_returned(api, raw.a, raw.b);
            let text = String::from_utf8(bytes).map_err(|_| status::INVALID_PARAMETER)?;
            Value::String(text)
        }
        tag::BYTES => {
            let bytes = copy_bytes(raw.a, raw.b);
            free_returned(api, raw.a, raw.b);
            Value::Bytes(bytes)
        }
        tag::HANDLE => Value::Handle(Handle::from_raw(raw.a)),
        tag::HANDLE_ARRAY => {
            let handles = if raw.a == 0 || raw.b == 0 {
                Vec::new()
            } else {
                std::slice::from_raw_parts(raw.a as *const u64, raw.b as usize)
                    .iter()
                    .map(|raw| Handle::from_raw(*raw))
                    .collect()
            };
            free_returned(api, raw.a, raw.b * std::mem::size_of::<u64>() as u64);
            Value::HandleArray(handles)
        }
        tag::VECTOR2I => {
            let (x, y) = unpack_pair(raw.a);
            Value::Vector2i(IVec2::new(x as i32, y as i32))
        }
        tag::VECTOR2 => {
            let (x, y) = unpack_pair(raw.a);
            Value::Vector2(Vec2::new(f32::from_bits(x), f32::from_bits(y)))
        }
        _ => return Err(status::INVALID_PARAMETER),
    };
    Ok(value)
}

unsafe fn free_returned(api: &NativeApi, ptr: u64, len: u64) {
    if ptr != 0 {
        (api.free_buffer)(ptr as *mut u8, len as usize);
    }
}

#[cfg(test)]
#[path = "marshal_tests.rs"]
mod tests;
