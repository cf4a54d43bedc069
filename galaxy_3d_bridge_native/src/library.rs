/// Loading of the native engine library.
///
/// The library stays loaded for as long as the [`NativeLibrary`] lives; the
/// function table it exports is only valid while it is loaded.

use std::ffi::OsStr;
use libloading::{Library, Symbol};
use galaxy_3d_bridge::galaxy3d::{Error, Result};
use crate::abi::{EntryPoint, NativeApi, ABI_VERSION, ENTRY_SYMBOL};

pub struct NativeLibrary {
    api: *const NativeApi,
    _library: Library,
}

// The function table is immutable static data of the loaded library
unsafe impl Send for NativeLibrary {}
unsafe impl Sync for NativeLibrary {}

impl NativeLibrary {
    /// Load the engine library at `path` and fetch its function table
    ///
    /// # Errors
    ///
    /// `Error::InitializationFailed` if the library cannot be loaded, does not
    /// export the entry point, or was built against another ABI version.
    pub fn load<P: AsRef<OsStr>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Loading runs the library's initialisers
        let library = unsafe { Library::new(path) }.map_err(|err| {
            Error::InitializationFailed(format!("Failed to load native engine library {:?}: {}", path, err))
        })?;

        let api = unsafe {
            let entry: Symbol<EntryPoint> = library.get(ENTRY_SYMBOL).map_err(|err| {
                Error::InitializationFailed(format!("{:?} does not export the bridge entry point: {}", path, err))
            })?;
            entry()
        };

        if api.is_null() {
            return Err(Error::InitializationFailed(format!(
                "{:?} returned a null bridge function table",
                path
            )));
        }

        check_abi_version(unsafe { &*api })?;

        galaxy_3d_bridge::bridge_info!("galaxy3d::native", "Loaded native engine library {:?}", path);

        Ok(Self { api, _library: library })
    }

    pub fn api(&self) -> &NativeApi {
        // Non-null and valid while the library is loaded (checked in load)
        unsafe { &*self.api }
    }
}

/// Reject tables built against another layout
pub fn check_abi_version(api: &NativeApi) -> Result<()> {
    if api.abi_version != ABI_VERSION {
        return Err(Error::InitializationFailed(format!(
            "Native engine bridge ABI version {} is not supported (expected {})",
            api.abi_version, ABI_VERSION
        )));
    }
    Ok(())
}
