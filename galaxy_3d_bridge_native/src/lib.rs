/*!
# Galaxy 3D Bridge - Native Library Backend

Connects `galaxy_3d_bridge` to an engine built as a native library exposing
the bridge C ABI (see [`abi`]).

The library exports a single entry point returning a function table;
`FfiEngine` wraps that table and implements the bridge's `Resolver` and
`Invoker` traits, so it can be handed straight to `Bridge::install`.
*/

pub mod abi;
mod marshal;
mod library;
mod ffi_engine;
mod stats;

pub use marshal::{arg_to_raw, kind_from_tag, kind_to_tag, shape_from_raw, value_from_raw};

// Main galaxy3d namespace module
pub mod galaxy3d {
    pub use crate::ffi_engine::FfiEngine;
    pub use crate::library::NativeLibrary;
    pub use crate::stats::{CallStats, print_call_stats_report};
}
