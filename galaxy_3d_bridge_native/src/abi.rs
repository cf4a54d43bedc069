/// C ABI shared with the native engine library.
///
/// The engine exports one entry point, [`ENTRY_SYMBOL`], returning a pointer
/// to a static [`NativeApi`] function table. Everything else goes through
/// that table.
///
/// Values cross the boundary as [`RawArg`]: a tag plus two 64-bit payload
/// words. Buffers in arguments are borrowed from the caller for the duration
/// of one call. Buffers in return values are allocated by the engine and
/// handed back through `free_buffer` once copied.

use bytemuck::{Pod, Zeroable};

/// Version of this table layout. Bumped on any incompatible change.
pub const ABI_VERSION: u32 = 1;

/// Exported symbol returning `*const NativeApi`
pub const ENTRY_SYMBOL: &[u8] = b"galaxy3d_bridge_api\0";

/// Maximum arity a native member may declare
pub const MAX_ARGS: usize = 16;

/// Capacity of the compat tag list filled on `resolve::INCOMPATIBLE`
pub const MAX_AVAILABLE_TAGS: usize = 32;

/// `RawArg::tag` values
pub mod tag {
    pub const NIL: u32 = 0;
    pub const BOOL: u32 = 1;
    pub const INT: u32 = 2;
    pub const FLOAT: u32 = 3;
    /// `a` = UTF-8 pointer, `b` = byte length (not NUL-terminated)
    pub const STRING: u32 = 4;
    /// `a` = pointer, `b` = byte length
    pub const BYTES: u32 = 5;
    pub const HANDLE: u32 = 6;
    /// `a` = pointer to `u64` handles, `b` = element count
    pub const HANDLE_ARRAY: u32 = 7;
    /// `a` = x (low 32 bits) and y (high 32 bits), two's complement
    pub const VECTOR2I: u32 = 8;
    /// `a` = x (low 32 bits) and y (high 32 bits), IEEE-754 bits
    pub const VECTOR2: u32 = 9;
}

/// Return codes of `NativeApi::resolve`
pub mod resolve {
    pub const FOUND: i32 = 0;
    pub const UNKNOWN_MEMBER: i32 = 1;
    /// Member exists at other compat tags, listed in `out_available`
    pub const INCOMPATIBLE: i32 = 2;
}

/// Tagged value crossing the boundary
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct RawArg {
    pub tag: u32,
    pub reserved: u32,
    pub a: u64,
    pub b: u64,
}

/// Call shape reported by `resolve`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct RawShape {
    /// Opaque call target, never 0 when found
    pub token: u64,
    /// `MethodFlags` bits
    pub flags: u32,
    /// `tag` of the return slot
    pub return_kind: u32,
    /// Number of valid entries in `arg_kinds`
    pub arg_count: u32,
    pub reserved: u32,
    pub arg_kinds: [u32; MAX_ARGS],
}

impl Default for RawShape {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Function table exported by the engine
#[repr(C)]
#[derive(Clone, Copy)]
pub struct NativeApi {
    pub abi_version: u32,

    /// Resolve `class::member` at `compat_tag`, filling `out_shape` on
    /// `FOUND` or up to `available_capacity` tags on `INCOMPATIBLE`.
    pub resolve: unsafe extern "C" fn(
        class: *const u8,
        class_len: usize,
        member: *const u8,
        member_len: usize,
        compat_tag: u64,
        out_shape: *mut RawShape,
        out_available: *mut u64,
        available_capacity: u32,
        out_available_len: *mut u32,
    ) -> i32,

    /// Handle of a named engine singleton, 0 if absent
    pub get_singleton: unsafe extern "C" fn(name: *const u8, name_len: usize) -> u64,

    /// Invoke `token`. `receiver` is 0 for static members. Returns a status
    /// code; `out_ret` is only read on `status::OK`.
    pub invoke: unsafe extern "C" fn(
        token: u64,
        receiver: u64,
        argv: *const RawArg,
        argc: u32,
        out_ret: *mut RawArg,
    ) -> i32,

    /// Release an owned engine object
    pub release: unsafe extern "C" fn(handle: u64),

    /// Return a buffer from a returned value (`len` in bytes)
    pub free_buffer: unsafe extern "C" fn(ptr: *mut u8, len: usize),
}

/// Signature of [`ENTRY_SYMBOL`]
pub type EntryPoint = unsafe extern "C" fn() -> *const NativeApi;
