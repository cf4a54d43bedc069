/// RenderingDevice facade: GPU buffers and textures on one device.
///
/// Devices are plain engine objects reached through a handle, not
/// singletons. The main device is borrowed from the engine
/// ([`RenderingDevice`]); local devices are owned by the caller
/// ([`LocalRenderingDevice`]) and released through the engine's release call.

use std::ops::Deref;
use std::sync::Arc;
use crate::binding::{Arg, Bindings, FromValue, Handle, MemberKey, OwnedHandle, Receiver};
use crate::classes::{decode_status, FreeError};
use crate::error::Result;

pub(crate) mod members {
    use crate::binding::MemberKey;

    pub const GET_DEVICE_NAME: MemberKey = MemberKey::new("RenderingDevice", "get_device_name", 201_670_096);
    pub const STORAGE_BUFFER_CREATE: MemberKey = MemberKey::new("RenderingDevice", "storage_buffer_create", 1_609_052_553);
    pub const BUFFER_GET_DATA: MemberKey = MemberKey::new("RenderingDevice", "buffer_get_data", 3_101_830_688);
    pub const TEXTURE_IS_VALID: MemberKey = MemberKey::new("RenderingDevice", "texture_is_valid", 3_521_089_500);
    pub const FREE_RID: MemberKey = MemberKey::new("RenderingDevice", "free_rid", 2_722_037_293);
}

// ===== BORROWED DEVICE =====

#[derive(Clone)]
pub struct RenderingDevice {
    bindings: Arc<Bindings>,
    receiver: Receiver,
}

impl RenderingDevice {
    /// Wrap a device handle obtained from the engine
    ///
    /// # Errors
    ///
    /// `Error::InvalidHandle` if `handle` is null.
    pub fn from_handle(bindings: Arc<Bindings>, handle: Handle) -> Result<Self> {
        let receiver = handle.as_receiver()?;
        Ok(Self { bindings, receiver })
    }

    pub fn handle(&self) -> Handle {
        self.receiver.handle()
    }

    fn call<R: FromValue>(&self, key: &MemberKey, args: &[Arg<'_>]) -> Result<R> {
        self.bindings.call(key, Some(self.receiver), args)
    }

    /// Adapter name reported by the driver
    pub fn get_device_name(&self) -> Result<String> {
        self.call(&members::GET_DEVICE_NAME, &[])
    }

    /// Create a storage buffer of `size` bytes, optionally filled from
    /// `data` (default: empty, buffer left uninitialised).
    ///
    /// Free it with [`RenderingDevice::free_rid`].
    pub fn storage_buffer_create(&self, size: u32, data: Option<&[u8]>) -> Result<OwnedHandle> {
        let data = data.unwrap_or(&[]);
        self.bindings
            .call_owned(&members::STORAGE_BUFFER_CREATE, Some(self.receiver), &[Arg::from(size), Arg::from(data)])
            .map_err(|err| decode_status(err, || format!("storage buffer of {} bytes with {} initial bytes", size, data.len())))
    }

    /// Read back `size` bytes of `buffer` starting at `offset`.
    ///
    /// Defaults: offset `0`, size `0` meaning "to the end of the buffer".
    ///
    /// # Errors
    ///
    /// `Error::OutOfRange` if the region is outside the buffer.
    pub fn buffer_get_data(&self, buffer: Handle, offset: Option<u32>, size: Option<u32>) -> Result<Vec<u8>> {
        let offset = offset.unwrap_or(0);
        let size = size.unwrap_or(0);
        self.call(&members::BUFFER_GET_DATA, &[Arg::from(buffer), Arg::from(offset), Arg::from(size)])
            .map_err(|err| decode_status(err, || format!("buffer {} region offset {} size {}", buffer, offset, size)))
    }

    /// Whether `texture` names a live texture on this device
    pub fn texture_is_valid(&self, texture: Handle) -> Result<bool> {
        self.call(&members::TEXTURE_IS_VALID, &[Arg::from(texture)])
    }

    /// Free a resource created on this device. A null handle is ignored.
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
}

impl std::fmt::Debug for RenderingDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RenderingDevice").field(&self.handle()).finish()
    }
}

// ===== OWNED DEVICE =====

/// Rendering device created by the caller.
///
/// Derefs to [`RenderingDevice`] for all device operations. Must be released
/// with [`LocalRenderingDevice::free`]; dropping it leaks the device.
#[must_use = "local rendering devices must be released with free()"]
#[derive(Debug)]
pub struct LocalRenderingDevice {
    device: RenderingDevice,
    owned: OwnedHandle,
}

impl LocalRenderingDevice {
    pub(crate) fn adopt(bindings: Arc<Bindings>, owned: OwnedHandle) -> Result<Self> {
        let device = RenderingDevice::from_handle(bindings, owned.handle())?;
        Ok(Self { device, owned })
    }

    /// Release the device through the engine's object release call
    pub fn free(self) {
        let Self { device, owned } = self;
        device.bindings.release(owned);
    }
}

impl Deref for LocalRenderingDevice {
    type Target = RenderingDevice;

    fn deref(&self) -> &RenderingDevice {
        &self.device
    }
}

#[cfg(test)]
#[path = "rendering_device_tests.rs"]
mod tests;
