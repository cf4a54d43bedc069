/// Mock native engine for unit tests (no engine library required)
///
/// Implements `Resolver` and `Invoker` in-process. Members are registered
/// with a shape and a handler closure; every resolution, singleton lookup,
/// call and release is counted so tests can observe how often the bridge
/// reaches the native side.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use glam::IVec2;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, Key, KeyData, SlotMap};
use crate::binding::handle::{Handle, Receiver};
use crate::binding::member::{BindingShape, BindingToken, MemberKey, MethodFlags};
use crate::binding::native::{status, Invoker, Resolution, Resolver};
use crate::binding::value::{Arg, Value, ValueKind};
use crate::classes::{display_server, rendering_device, rendering_server};

/// Handler invoked for a registered member
pub type MockHandler =
    Arc<dyn Fn(&MockNativeEngine, Option<Receiver>, &[Arg<'_>]) -> Result<Value, i32> + Send + Sync>;

pub const DISPLAY_SERVER_HANDLE: Handle = Handle::from_raw(0x4453_0000_0001);
pub const RENDERING_SERVER_HANDLE: Handle = Handle::from_raw(0x5253_0000_0001);

// ============================================================================
// Mock Resources
// ============================================================================

new_key_type! {
    /// Slot of a mock native resource or object
    pub struct MockResourceKey;
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockResource {
    Mesh { surfaces: i32 },
    Texture,
    Buffer(Vec<u8>),
    Device { name: String },
}

fn handle_of(key: MockResourceKey) -> Handle {
    Handle::from_raw(key.data().as_ffi())
}

fn key_of(handle: Handle) -> MockResourceKey {
    KeyData::from_ffi(handle.to_raw()).into()
}

// ============================================================================
// Mock Engine
// ============================================================================

struct MockMember {
    compat_tag: u64,
    token: BindingToken,
    shape: BindingShape,
}

pub struct MockNativeEngine {
    members: Mutex<FxHashMap<(String, String), Vec<MockMember>>>,
    handlers: Mutex<FxHashMap<u64, MockHandler>>,
    next_token: AtomicU64,
    hidden: Mutex<FxHashSet<(String, String)>>,
    resolve_counts: Mutex<FxHashMap<MemberKey, usize>>,
    resolve_delay: Option<Duration>,
    singletons: Mutex<FxHashMap<String, Handle>>,
    singleton_lookups: AtomicUsize,
    invocations: AtomicUsize,
    resources: Mutex<SlotMap<MockResourceKey, MockResource>>,
    released: Mutex<Vec<Handle>>,
    main_device: Mutex<Handle>,
    screens: Vec<IVec2>,
    window_title: Mutex<String>,
    clipboard: Mutex<String>,
    clipboard_supported: AtomicBool,
}

impl MockNativeEngine {
    /// Engine with no members and no singletons
    pub fn new() -> Self {
        Self {
            members: Mutex::new(FxHashMap::default()),
            handlers: Mutex::new(FxHashMap::default()),
            next_token: AtomicU64::new(1),
            hidden: Mutex::new(FxHashSet::default()),
            resolve_counts: Mutex::new(FxHashMap::default()),
            resolve_delay: None,
            singletons: Mutex::new(FxHashMap::default()),
            singleton_lookups: AtomicUsize::new(0),
            invocations: AtomicUsize::new(0),
            resources: Mutex::new(SlotMap::with_key()),
            released: Mutex::new(Vec::new()),
            main_device: Mutex::new(Handle::NULL),
            screens: vec![IVec2::new(1920, 1080), IVec2::new(2560, 1440)],
            window_title: Mutex::new(String::new()),
            clipboard: Mutex::new(String::new()),
            clipboard_supported: AtomicBool::new(true),
        }
    }

    /// Engine exposing DisplayServer, RenderingServer and RenderingDevice
    pub fn with_standard_classes() -> Self {
        let engine = Self::headless();
        engine.register_singleton(display_server::DisplayServer::SINGLETON_NAME, DISPLAY_SERVER_HANDLE);
        engine
    }

    /// Engine started without a display: no DisplayServer singleton, though
    /// its members still resolve
    pub fn headless() -> Self {
        let engine = Self::new();
        register_display_server(&engine);
        register_rendering_server(&engine);
        register_rendering_device(&engine);
        engine.register_singleton(rendering_server::RenderingServer::SINGLETON_NAME, RENDERING_SERVER_HANDLE);
        let device = engine.insert_resource(MockResource::Device { name: "Mock Device".to_string() });
        *engine.main_device.lock().unwrap() = device;
        engine
    }

    /// Sleep inside every resolution (widens race windows in concurrency tests)
    pub fn with_resolve_delay(mut self, delay: Duration) -> Self {
        self.resolve_delay = Some(delay);
        self
    }

    // ===== REGISTRATION =====

    /// Register `key` with `shape`, dispatching to `handler`
    pub fn register<F>(&self, key: &MemberKey, shape: BindingShape, handler: F) -> BindingToken
    where
        F: Fn(&MockNativeEngine, Option<Receiver>, &[Arg<'_>]) -> Result<Value, i32> + Send + Sync + 'static,
    {
        let raw = self.next_token.fetch_add(1, Ordering::Relaxed);
        let token = BindingToken::from_raw(raw).unwrap();
        self.handlers.lock().unwrap().insert(raw, Arc::new(handler));
        self.members
            .lock()
            .unwrap()
            .entry((key.class().to_string(), key.member().to_string()))
            .or_default()
            .push(MockMember {
                compat_tag: key.compat_tag(),
                token,
                shape,
            });
        token
    }

    /// Register `key` as an instance method returning a constant
    pub fn register_constant(&self, key: &MemberKey, arg_kinds: &[ValueKind], value: Value) -> BindingToken {
        let shape = BindingShape::new(arg_kinds.to_vec(), value.kind(), MethodFlags::CONST);
        self.register(key, shape, move |_, _, _| Ok(value.clone()))
    }

    /// Register `key` as an instance method returning an owned handle
    pub fn register_owned_constant(&self, key: &MemberKey, handle: Handle) -> BindingToken {
        let shape = BindingShape::new(vec![], ValueKind::Handle, MethodFlags::RETURNS_OWNED);
        self.register(key, shape, move |_, _, _| Ok(Value::Handle(handle)))
    }

    /// Make `key` resolve as an unknown member until [`Self::unhide_member`]
    pub fn hide_member(&self, key: &MemberKey) {
        self.hidden.lock().unwrap().insert((key.class().to_string(), key.member().to_string()));
    }

    pub fn unhide_member(&self, key: &MemberKey) {
        self.hidden.lock().unwrap().remove(&(key.class().to_string(), key.member().to_string()));
    }

    pub fn register_singleton(&self, name: &str, handle: Handle) {
        self.singletons.lock().unwrap().insert(name.to_string(), handle);
    }

    pub fn remove_singleton(&self, name: &str) {
        self.singletons.lock().unwrap().remove(name);
    }

    pub fn set_clipboard_supported(&self, supported: bool) {
        self.clipboard_supported.store(supported, Ordering::Relaxed);
    }

    /// Make `get_rendering_device` report no main device
    pub fn detach_main_device(&self) {
        *self.main_device.lock().unwrap() = Handle::NULL;
    }

    // ===== OBSERVATION =====

    /// Times `key` was resolved through the native registry
    pub fn resolve_count(&self, key: &MemberKey) -> usize {
        self.resolve_counts.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total_resolve_count(&self) -> usize {
        self.resolve_counts.lock().unwrap().values().sum()
    }

    pub fn singleton_lookup_count(&self) -> usize {
        self.singleton_lookups.load(Ordering::Relaxed)
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::Relaxed)
    }

    /// Handles passed to `release`, in order
    pub fn released(&self) -> Vec<Handle> {
        self.released.lock().unwrap().clone()
    }

    pub fn window_title(&self) -> String {
        self.window_title.lock().unwrap().clone()
    }

    pub fn main_device(&self) -> Handle {
        *self.main_device.lock().unwrap()
    }

    // ===== RESOURCES =====

    pub fn insert_resource(&self, resource: MockResource) -> Handle {
        handle_of(self.resources.lock().unwrap().insert(resource))
    }

    pub fn resource(&self, handle: Handle) -> Option<MockResource> {
        if !handle.is_valid() {
            return None;
        }
        self.resources.lock().unwrap().get(key_of(handle)).cloned()
    }

    pub fn live_resource_count(&self) -> usize {
        self.resources.lock().unwrap().len()
    }

    fn remove_resource(&self, handle: Handle) -> Option<MockResource> {
        if !handle.is_valid() {
            return None;
        }
        self.resources.lock().unwrap().remove(key_of(handle))
    }

    fn with_resource<R>(&self, handle: Handle, f: impl FnOnce(&mut MockResource) -> R) -> Option<R> {
        if !handle.is_valid() {
            return None;
        }
        self.resources.lock().unwrap().get_mut(key_of(handle)).map(f)
    }
}

impl Default for MockNativeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Resolver for MockNativeEngine {
    fn resolve(&self, class: &str, member: &str, compat_tag: u64) -> Resolution {
        *self
            .resolve_counts
            .lock()
            .unwrap()
            .entry(MemberKey::dynamic(class, member, compat_tag))
            .or_default() += 1;

        if let Some(delay) = self.resolve_delay {
            std::thread::sleep(delay);
        }

        let name = (class.to_string(), member.to_string());
        if self.hidden.lock().unwrap().contains(&name) {
            return Resolution::UnknownMember;
        }
        let members = self.members.lock().unwrap();
        let Some(variants) = members.get(&name) else {
            return Resolution::UnknownMember;
        };
        match variants.iter().find(|variant| variant.compat_tag == compat_tag) {
            Some(variant) => Resolution::Found {
                token: variant.token,
                shape: variant.shape.clone(),
            },
            None => Resolution::IncompatibleAbi {
                available: variants.iter().map(|variant| variant.compat_tag).collect(),
            },
        }
    }

    fn lookup_singleton(&self, name: &str) -> Option<Handle> {
        self.singleton_lookups.fetch_add(1, Ordering::Relaxed);
        self.singletons.lock().unwrap().get(name).copied()
    }
}

impl Invoker for MockNativeEngine {
    fn invoke(&self, token: BindingToken, receiver: Option<Receiver>, argv: &[Arg<'_>]) -> Result<Value, i32> {
        self.invocations.fetch_add(1, Ordering::Relaxed);
        let handler = self
            .handlers
            .lock()
            .unwrap()
            .get(&token.to_raw())
            .cloned()
            .unwrap_or_else(|| panic!("mock engine: unknown token {}", token.to_raw()));
        handler(self, receiver, argv)
    }

    fn release(&self, handle: Handle) {
        if self.remove_resource(handle).is_none() {
            panic!("mock engine: release of {:?} which is not a live object (double release?)", handle);
        }
        self.released.lock().unwrap().push(handle);
    }
}

// ============================================================================
// Argument helpers
// ============================================================================

fn int_arg(argv: &[Arg<'_>], index: usize) -> Result<i64, i32> {
    match argv.get(index) {
        Some(Arg::Int(value)) => Ok(*value),
        _ => Err(status::INVALID_PARAMETER),
    }
}

fn str_arg<'a>(argv: &[Arg<'a>], index: usize) -> Result<&'a str, i32> {
    match argv.get(index) {
        Some(Arg::Str(value)) => Ok(value),
        _ => Err(status::INVALID_PARAMETER),
    }
}

fn bytes_arg<'a>(argv: &[Arg<'a>], index: usize) -> Result<&'a [u8], i32> {
    match argv.get(index) {
        Some(Arg::Bytes(value)) => Ok(value),
        _ => Err(status::INVALID_PARAMETER),
    }
}

fn handle_arg(argv: &[Arg<'_>], index: usize) -> Result<Handle, i32> {
    match argv.get(index) {
        Some(Arg::Handle(value)) => Ok(*value),
        _ => Err(status::INVALID_PARAMETER),
    }
}

fn expect_receiver(receiver: Option<Receiver>, expected: Handle) -> Result<(), i32> {
    match receiver {
        Some(receiver) if receiver.handle() == expected => Ok(()),
        _ => Err(status::INVALID_PARAMETER),
    }
}

fn expect_device(engine: &MockNativeEngine, receiver: Option<Receiver>) -> Result<(), i32> {
    let handle = receiver.map(Receiver::handle).ok_or(status::INVALID_PARAMETER)?;
    match engine.resource(handle) {
        Some(MockResource::Device { .. }) => Ok(()),
        _ => Err(status::INVALID_PARAMETER),
    }
}

fn shape(args: &[ValueKind], ret: ValueKind, flags: MethodFlags) -> BindingShape {
    BindingShape::new(args.to_vec(), ret, flags)
}

// ============================================================================
// Standard classes
// ============================================================================

fn register_display_server(engine: &MockNativeEngine) {
    use display_server::members::*;
    use ValueKind as K;

    let screen = |engine: &MockNativeEngine, argv: &[Arg<'_>]| -> Result<usize, i32> {
        let index = int_arg(argv, 0)?;
        let index = if index == display_server::SCREEN_OF_MAIN_WINDOW as i64 { 0 } else { index };
        usize::try_from(index)
            .ok()
            .filter(|index| *index < engine.screens.len())
            .ok_or(status::PARAMETER_RANGE)
    };

    engine.register(&GET_SCREEN_COUNT, shape(&[], K::Int, MethodFlags::CONST), |engine, receiver, _| {
        expect_receiver(receiver, DISPLAY_SERVER_HANDLE)?;
        Ok(Value::Int(engine.screens.len() as i64))
    });
    engine.register(&SCREEN_GET_SIZE, shape(&[K::Int], K::Vector2i, MethodFlags::CONST), move |engine, receiver, argv| {
        expect_receiver(receiver, DISPLAY_SERVER_HANDLE)?;
        Ok(Value::Vector2i(engine.screens[screen(engine, argv)?]))
    });
    engine.register(&SCREEN_GET_DPI, shape(&[K::Int], K::Int, MethodFlags::CONST), move |engine, receiver, argv| {
        expect_receiver(receiver, DISPLAY_SERVER_HANDLE)?;
        let dpi = if screen(engine, argv)? == 0 { 96 } else { 144 };
        Ok(Value::Int(dpi))
    });
    engine.register(&WINDOW_SET_TITLE, shape(&[K::String, K::Int], K::Nil, MethodFlags::empty()), |engine, receiver, argv| {
        expect_receiver(receiver, DISPLAY_SERVER_HANDLE)?;
        let title = str_arg(argv, 0)?;
        if int_arg(argv, 1)? != display_server::MAIN_WINDOW_ID as i64 {
            return Err(status::PARAMETER_RANGE);
        }
        *engine.window_title.lock().unwrap() = title.to_string();
        Ok(Value::Nil)
    });
    engine.register(&WINDOW_GET_MODE, shape(&[K::Int], K::Int, MethodFlags::CONST), |_, receiver, argv| {
        expect_receiver(receiver, DISPLAY_SERVER_HANDLE)?;
        if int_arg(argv, 0)? != display_server::MAIN_WINDOW_ID as i64 {
            return Err(status::PARAMETER_RANGE);
        }
        Ok(Value::Int(display_server::WindowMode::Maximized as i64))
    });
    engine.register(&HAS_FEATURE, shape(&[K::Int], K::Bool, MethodFlags::CONST), |_, receiver, argv| {
        expect_receiver(receiver, DISPLAY_SERVER_HANDLE)?;
        let supported = [
            display_server::Feature::Mouse as i64,
            display_server::Feature::Clipboard as i64,
            display_server::Feature::Hidpi as i64,
        ];
        Ok(Value::Bool(supported.contains(&int_arg(argv, 0)?)))
    });
    engine.register(&CLIPBOARD_GET, shape(&[], K::String, MethodFlags::CONST), |engine, receiver, _| {
        expect_receiver(receiver, DISPLAY_SERVER_HANDLE)?;
        if !engine.clipboard_supported.load(Ordering::Relaxed) {
            return Err(status::UNAVAILABLE);
        }
        Ok(Value::String(engine.clipboard.lock().unwrap().clone()))
    });
    engine.register(&CLIPBOARD_SET, shape(&[K::String], K::Nil, MethodFlags::empty()), |engine, receiver, argv| {
        expect_receiver(receiver, DISPLAY_SERVER_HANDLE)?;
        if !engine.clipboard_supported.load(Ordering::Relaxed) {
            return Err(status::UNAVAILABLE);
        }
        *engine.clipboard.lock().unwrap() = str_arg(argv, 0)?.to_string();
        Ok(Value::Nil)
    });
}

fn register_rendering_server(engine: &MockNativeEngine) {
    use rendering_server::members::*;
    use ValueKind as K;

    engine.register(&MESH_CREATE, shape(&[], K::Handle, MethodFlags::RETURNS_OWNED), |engine, receiver, _| {
        expect_receiver(receiver, RENDERING_SERVER_HANDLE)?;
        Ok(Value::Handle(engine.insert_resource(MockResource::Mesh { surfaces: 1 })))
    });
    engine.register(&MESH_GET_SURFACE_COUNT, shape(&[K::Handle], K::Int, MethodFlags::CONST), |engine, receiver, argv| {
        expect_receiver(receiver, RENDERING_SERVER_HANDLE)?;
        match engine.resource(handle_arg(argv, 0)?) {
            Some(MockResource::Mesh { surfaces }) => Ok(Value::Int(surfaces as i64)),
            _ => Err(status::INVALID_PARAMETER),
        }
    });
    engine.register(&MESH_CLEAR, shape(&[K::Handle], K::Nil, MethodFlags::empty()), |engine, receiver, argv| {
        expect_receiver(receiver, RENDERING_SERVER_HANDLE)?;
        engine
            .with_resource(handle_arg(argv, 0)?, |resource| match resource {
                MockResource::Mesh { surfaces } => {
                    *surfaces = 0;
                    Ok(Value::Nil)
                }
                _ => Err(status::INVALID_PARAMETER),
            })
            .unwrap_or(Err(status::INVALID_PARAMETER))
    });
    engine.register(&TEXTURE_2D_PLACEHOLDER_CREATE, shape(&[], K::Handle, MethodFlags::RETURNS_OWNED), |engine, receiver, _| {
        expect_receiver(receiver, RENDERING_SERVER_HANDLE)?;
        Ok(Value::Handle(engine.insert_resource(MockResource::Texture)))
    });
    engine.register(&FREE_RID, shape(&[K::Handle], K::Nil, MethodFlags::empty()), |engine, receiver, argv| {
        expect_receiver(receiver, RENDERING_SERVER_HANDLE)?;
        match engine.remove_resource(handle_arg(argv, 0)?) {
            Some(MockResource::Mesh { .. } | MockResource::Texture) => Ok(Value::Nil),
            _ => Err(status::INVALID_PARAMETER),
        }
    });
    engine.register(&GET_RENDERING_DEVICE, shape(&[], K::Handle, MethodFlags::CONST), |engine, receiver, _| {
        expect_receiver(receiver, RENDERING_SERVER_HANDLE)?;
        Ok(Value::Handle(engine.main_device()))
    });
    engine.register(&CREATE_LOCAL_RENDERING_DEVICE, shape(&[], K::Handle, MethodFlags::RETURNS_OWNED), |engine, receiver, _| {
        expect_receiver(receiver, RENDERING_SERVER_HANDLE)?;
        if !engine.main_device().is_valid() {
            return Ok(Value::Handle(Handle::NULL));
        }
        let device = engine.insert_resource(MockResource::Device { name: "Mock Local Device".to_string() });
        Ok(Value::Handle(device))
    });
}

fn register_rendering_device(engine: &MockNativeEngine) {
    use rendering_device::members::*;
    use ValueKind as K;

    engine.register(&GET_DEVICE_NAME, shape(&[], K::String, MethodFlags::CONST), |engine, receiver, _| {
        expect_device(engine, receiver)?;
        match receiver.and_then(|receiver| engine.resource(receiver.handle())) {
            Some(MockResource::Device { name }) => Ok(Value::String(name)),
            _ => Err(status::INVALID_PARAMETER),
        }
    });
    engine.register(&STORAGE_BUFFER_CREATE, shape(&[K::Int, K::Bytes], K::Handle, MethodFlags::RETURNS_OWNED), |engine, receiver, argv| {
        expect_device(engine, receiver)?;
        let size = usize::try_from(int_arg(argv, 0)?).map_err(|_| status::PARAMETER_RANGE)?;
        let data = bytes_arg(argv, 1)?;
        let contents = if data.is_empty() {
            vec![0; size]
        } else if data.len() == size {
            data.to_vec()
        } else {
            return Err(status::PARAMETER_RANGE);
        };
        Ok(Value::Handle(engine.insert_resource(MockResource::Buffer(contents))))
    });
    engine.register(&BUFFER_GET_DATA, shape(&[K::Handle, K::Int, K::Int], K::Bytes, MethodFlags::CONST), |engine, receiver, argv| {
        expect_device(engine, receiver)?;
        let Some(MockResource::Buffer(contents)) = engine.resource(handle_arg(argv, 0)?) else {
            return Err(status::INVALID_PARAMETER);
        };
        let offset = usize::try_from(int_arg(argv, 1)?).map_err(|_| status::PARAMETER_RANGE)?;
        let size = usize::try_from(int_arg(argv, 2)?).map_err(|_| status::PARAMETER_RANGE)?;
        if offset > contents.len() {
            return Err(status::PARAMETER_RANGE);
        }
        let end = if size == 0 { contents.len() } else { offset + size };
        if end > contents.len() {
            return Err(status::PARAMETER_RANGE);
        }
        Ok(Value::Bytes(contents[offset..end].to_vec()))
    });
    engine.register(&TEXTURE_IS_VALID, shape(&[K::Handle], K::Bool, MethodFlags::CONST), |engine, receiver, argv| {
        expect_device(engine, receiver)?;
        Ok(Value::Bool(matches!(engine.resource(handle_arg(argv, 0)?), Some(MockResource::Texture))))
    });
    engine.register(&FREE_RID, shape(&[K::Handle], K::Nil, MethodFlags::empty()), |engine, receiver, argv| {
        expect_device(engine, receiver)?;
        match engine.remove_resource(handle_arg(argv, 0)?) {
            Some(MockResource::Buffer(_) | MockResource::Texture) => Ok(Value::Nil),
            _ => Err(status::INVALID_PARAMETER),
        }
    });
}
