/// RenderingServer facade: low-level mesh and texture resources.
///
/// The rendering service always exists in a running engine, so unlike the
/// display service a missing singleton is a hard failure.

use std::sync::Arc;
use crate::binding::{Arg, Bindings, FromValue, Handle, MemberKey, OwnedHandle, Receiver};
use crate::bridge::Bridge;
use crate::classes::{decode_status, FreeError};
use crate::classes::rendering_device::{LocalRenderingDevice, RenderingDevice};
use crate::error::Result;

pub(crate) mod members {
    use crate::binding::MemberKey;

    pub const MESH_CREATE: MemberKey = MemberKey::new("RenderingServer", "mesh_create", 529_393_457);
    pub const MESH_GET_SURFACE_COUNT: MemberKey = MemberKey::new("RenderingServer", "mesh_get_surface_count", 2_198_884_583);
    pub const MESH_CLEAR: MemberKey = MemberKey::new("RenderingServer", "mesh_clear", 2_722_037_293);
    pub const TEXTURE_2D_PLACEHOLDER_CREATE: MemberKey = MemberKey::new("RenderingServer", "texture_2d_placeholder_create", 529_393_457);
    pub const FREE_RID: MemberKey = MemberKey::new("RenderingServer", "free_rid", 2_722_037_293);
    pub const GET_RENDERING_DEVICE: MemberKey = MemberKey::new("RenderingServer", "get_rendering_device", 1_405_107_940);
    pub const CREATE_LOCAL_RENDERING_DEVICE: MemberKey = MemberKey::new("RenderingServer", "create_local_rendering_device", 1_405_107_940);
}

pub struct RenderingServer {
    bindings: Arc<Bindings>,
    receiver: Receiver,
}

impl RenderingServer {
    pub const SINGLETON_NAME: &'static str = "RenderingServer";

    /// Rendering service of the globally installed engine
    pub fn singleton() -> Result<Self> {
        Self::from_bindings(Bridge::bindings()?)
    }

    /// Rendering service of a specific engine binding
    ///
    /// # Errors
    ///
    /// `Error::SingletonUnavailable` if the engine has no rendering service.
    pub fn from_bindings(bindings: Arc<Bindings>) -> Result<Self> {
        let receiver = bindings.singleton_receiver(Self::SINGLETON_NAME)?;
        Ok(Self { bindings, receiver })
    }

    fn call<R: FromValue>(&self, key: &MemberKey, args: &[Arg<'_>]) -> Result<R> {
        self.bindings.call(key, Some(self.receiver), args)
    }

    /// Create an empty mesh. Free it with [`RenderingServer::free_rid`].
    pub fn mesh_create(&self) -> Result<OwnedHandle> {
        self.bindings.call_owned(&members::MESH_CREATE, Some(self.receiver), &[])
    }

    /// Number of surfaces in `mesh`
    pub fn mesh_get_surface_count(&self, mesh: Handle) -> Result<i32> {
        self.call(&members::MESH_GET_SURFACE_COUNT, &[Arg::from(mesh)])
    }

    /// Remove every surface from `mesh`
    pub fn mesh_clear(&self, mesh: Handle) -> Result<()> {
        self.call(&members::MESH_CLEAR, &[Arg::from(mesh)])
    }

    /// Create a placeholder 2D texture. Free it with [`RenderingServer::free_rid`].
    pub fn texture_2d_placeholder_create(&self) -> Result<OwnedHandle> {
        self.bindings.call_owned(&members::TEXTURE_2D_PLACEHOLDER_CREATE, Some(self.receiver), &[])
    }

    /// Free a resource created by this service.
    ///
    /// Takes the handle by value: once freed it cannot be used again. A null
    /// handle is accepted and ignored.
    ///
    /// # Errors
    ///
    /// [`FreeError`] if the free could not be resolved or the engine
    /// rejected it. The error hands `rid` back, still owned.
    pub fn free_rid(&self, rid: OwnedHandle) -> std::result::Result<(), FreeError> {
        if !rid.is_valid() {
            return Ok(());
        }
        let binding = match self.bindings.binding(&members::FREE_RID) {
            Ok(binding) => binding,
            Err(err) => return Err(FreeError::new(err, rid)),
        };
        let handle = rid.handle();
        match self.bindings.call_resolved(&binding, Some(self.receiver), &[Arg::from(handle)]) {
            Ok(_) => {
                rid.into_handle();
                Ok(())
            }
            Err(err) => Err(FreeError::new(decode_status(err, || format!("free of resource {}", handle)), rid)),
        }
    }

    /// The engine's main rendering device, if the active renderer has one.
    ///
    /// The device is borrowed from the engine; it must not be freed.
    pub fn get_rendering_device(&self) -> Result<Option<RenderingDevice>> {
        let handle: Handle = self.call(&members::GET_RENDERING_DEVICE, &[])?;
        if !handle.is_valid() {
            return Ok(None);
        }
        RenderingDevice::from_handle(Arc::clone(&self.bindings), handle).map(Some)
    }

    /// Create a standalone rendering device owned by the caller.
    ///
    /// `None` when the active renderer cannot create local devices. Release
    /// it with [`LocalRenderingDevice::free`].
    pub fn create_local_rendering_device(&self) -> Result<Option<LocalRenderingDevice>> {
        let owned = self.bindings.call_owned(&members::CREATE_LOCAL_RENDERING_DEVICE, Some(self.receiver), &[])?;
        if !owned.is_valid() {
            // null owned handles drop silently
            return Ok(None);
        }
        LocalRenderingDevice::adopt(Arc::clone(&self.bindings), owned).map(Some)
    }
}

#[cfg(test)]
#[path = "rendering_server_tests.rs"]
mod tests;
