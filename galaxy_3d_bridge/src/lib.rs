/*!
# Galaxy 3D Bridge

Native interop binding layer exposing the Galaxy3D engine object model
(display service, rendering device, scene-graph resources) to Rust.

Every engine operation is reached the same way: its member is resolved by
class name, member name and a compatibility tag, the resolution is cached for
the life of the process, and the call goes through a type-erased dispatcher
against an opaque native handle.

## Architecture

- **Handle**: opaque native reference; `OwnedHandle` for resources the caller must free
- **SymbolResolver**: `MemberKey` → `ResolvedBinding` via the engine registry
- **BindingCache**: lazy, per-key memoized resolutions
- **CallDispatcher**: marshals an `ArgumentFrame`, invokes, returns a `Value`
- **SingletonRegistry**: lazily resolved engine singletons
- **classes**: typed facades (`DisplayServer`, `RenderingServer`, `RenderingDevice`)

The engine itself is an external collaborator implementing `Resolver` and
`Invoker`; see the `galaxy_3d_bridge_native` crate for the C-ABI backend.
*/

// Internal modules
mod error;
mod bridge;
mod config;
pub mod log;
pub mod binding;
pub mod classes;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result, DispatchError};

    // Bridge singleton and configuration
    pub use crate::bridge::Bridge;
    pub use crate::config::Config;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Binding layer
    pub mod binding {
        pub use crate::binding::*;
    }

    // Engine class facades
    pub mod classes {
        pub use crate::classes::*;
    }
}

// Re-export math library at crate root
pub use glam;
