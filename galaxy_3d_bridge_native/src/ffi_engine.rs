/// Native engine collaborator over the C ABI function table.

use std::ffi::OsStr;
use galaxy_3d_bridge::galaxy3d::binding::{
    status, Arg, BindingToken, Handle, Invoker, Receiver, Resolution, Resolver, Value,
};
use galaxy_3d_bridge::galaxy3d::Result;
use galaxy_3d_bridge::{bridge_error, bridge_warn};
use crate::abi::{resolve, NativeApi, RawArg, RawShape, MAX_AVAILABLE_TAGS};
use crate::library::{check_abi_version, NativeLibrary};
use crate::marshal::{arg_to_raw, shape_from_raw, value_from_raw};
use crate::stats::{CallStats, CallStatsTracker};

enum ApiSource {
    Library(NativeLibrary),
    Static(&'static NativeApi),
}

/// [`Resolver`] + [`Invoker`] backed by a native engine library
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_bridge::galaxy3d::{Bridge, Config};
/// use galaxy_3d_bridge_native::galaxy3d::FfiEngine;
///
/// let engine = FfiEngine::load("libgalaxy3d_engine.so")?;
/// Bridge::install(engine, Config::default())?;
/// # Ok::<(), galaxy_3d_bridge::galaxy3d::Error>(())
/// ```
pub struct FfiEngine {
    source: ApiSource,
    stats: CallStatsTracker,
}

impl FfiEngine {
    /// Load the engine library at `path`
    pub fn load<P: AsRef<OsStr>>(path: P) -> Result<Self> {
        Ok(Self {
            source: ApiSource::Library(NativeLibrary::load(path)?),
            stats: CallStatsTracker::default(),
        })
    }

    /// Use a function table linked into the current process
    ///
    /// # Safety
    ///
    /// Every function pointer in `api` must follow the contract documented
    /// in [`crate::abi`] for the lifetime of the process.
    pub unsafe fn from_api(api: &'static NativeApi) -> Result<Self> {
        check_abi_version(api)?;
        Ok(Self {
            source: ApiSource::Static(api),
            stats: CallStatsTracker::default(),
        })
    }

    fn api(&self) -> &NativeApi {
        match &self.source {
            ApiSource::Library(library) => library.api(),
            ApiSource::Static(api) => *api,
        }
    }

    /// Native traffic so far
    pub fn stats(&self) -> CallStats {
        self.stats.snapshot()
    }
}

impl Resolver for FfiEngine {
    fn resolve(&self, class: &str, member: &str, compat_tag: u64) -> Resolution {
        let mut shape = RawShape::default();
        let mut available = [0u64; MAX_AVAILABLE_TAGS];
        let mut available_len = 0u32;

        let code = unsafe {
            (self.api().resolve)(
                class.as_ptr(),
                class.len(),
                member.as_ptr(),
                member.len(),
                compat_tag,
                &mut shape,
                available.as_mut_ptr(),
                MAX_AVAILABLE_TAGS as u32,
                &mut available_len,
            )
        };

        let resolution = match code {
            resolve::FOUND => match shape_from_raw(&shape) {
                Some((token, shape)) => Resolution::Found { token, shape },
                None => {
                    bridge_error!(
                        "galaxy3d::native",
                        "Engine returned a malformed shape for {}::{} (token {}, {} args)",
                        class,
                        member,
                        shape.token,
                        shape.arg_count
                    );
                    Resolution::UnknownMember
                }
            },
            resolve::INCOMPATIBLE => {
                let len = (available_len as usize).min(MAX_AVAILABLE_TAGS);
                Resolution::IncompatibleAbi { available: available[..len].to_vec() }
            }
            resolve::UNKNOWN_MEMBER => Resolution::UnknownMember,
            other => {
                bridge_warn!("galaxy3d::native", "Unexpected resolve code {} for {}::{}", other, class, member);
                Resolution::UnknownMember
            }
        };

        self.stats.record_resolution(matches!(resolution, Resolution::Found { .. }));
        resolution
    }

    fn lookup_singleton(&self, name: &str) -> Option<Handle> {
        self.stats.record_singleton_lookup();
        let raw = unsafe { (self.api().get_singleton)(name.as_ptr(), name.len()) };
        Some(Handle::from_raw(raw)).filter(|handle| handle.is_valid())
    }
}

impl Invoker for FfiEngine {
    fn invoke(
        &self,
        token: BindingToken,
        receiver: Option<Receiver>,
        argv: &[Arg<'_>],
    ) -> std::result::Result<Value, i32> {
        // Raw args borrow from `argv`, which outlives the call
        let raw_args: Vec<RawArg> = argv.iter().map(arg_to_raw).collect();
        let receiver = receiver.map_or(0, |receiver| receiver.handle().to_raw());
        let mut ret = RawArg::default();

        let code = unsafe {
            (self.api().invoke)(
                token.to_raw(),
                receiver,
                raw_args.as_ptr(),
                raw_args.len() as u32,
                &mut ret,
            )
        };
        self.stats.record_invocation(code == status::OK);

        if code != status::OK {
            return Err(code);
        }
        unsafe { value_from_raw(&ret, self.api()) }.map_err(|code| {
            bridge_error!("galaxy3d::native", "Engine returned a value with unknown tag {}", ret.tag);
            code
        })
    }

    fn release(&self, handle: Handle) {
        self.stats.record_release();
        unsafe { (self.api().release)(handle.to_raw()) };
    }
}
