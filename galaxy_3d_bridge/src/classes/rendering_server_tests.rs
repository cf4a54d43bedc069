/// Tests for the RenderingServer facade

use super::*;
use crate::binding::mock_native_engine::{MockNativeEngine, MockResource};
use crate::config::Config;
use crate::error::Error;

fn setup() -> (Arc<MockNativeEngine>, RenderingServer) {
    let engine = Arc::new(MockNativeEngine::with_standard_classes());
    let config = Config::default().with_leak_warnings(false);
    let bindings = Arc::new(Bindings::from_shared(Arc::clone(&engine), config));
    let server = RenderingServer::from_bindings(bindings).unwrap();
    (engine, server)
}

#[test]
fn test_missing_singleton_is_hard_failure() {
    let engine = Arc::new(MockNativeEngine::new());
    let bindings = Arc::new(Bindings::from_shared(engine, Config::default()));

    let err = RenderingServer::from_bindings(bindings).err().unwrap();
    assert_eq!(err, Error::SingletonUnavailable("RenderingServer".to_string()));
}

#[test]
fn test_mesh_lifecycle() {
    let (engine, server) = setup();
    let live_before = engine.live_resource_count();

    let mesh = server.mesh_create().unwrap();
    assert!(mesh.is_valid());
    assert_eq!(server.mesh_get_surface_count(mesh.handle()).unwrap(), 1);

    server.mesh_clear(mesh.handle()).unwrap();
    assert_eq!(server.mesh_get_surface_count(mesh.handle()).unwrap(), 0);

    server.free_rid(mesh).unwrap();
    assert_eq!(engine.live_resource_count(), live_before);
}

#[test]
fn test_create_operations_return_distinct_owned_handles() {
    let (engine, server) = setup();

    let first = server.texture_2d_placeholder_create().unwrap();
    let second = server.texture_2d_placeholder_create().unwrap();
    assert_ne!(first.handle(), second.handle());
    assert_eq!(engine.resource(first.handle()), Some(MockResource::Texture));

    server.free_rid(first).unwrap();
    server.free_rid(second).unwrap();
}

#[test]
fn test_free_rid_of_unknown_resource_reports_status() {
    let (engine, server) = setup();
    let mesh = server.mesh_create().unwrap();
    let stale = mesh.handle();
    server.free_rid(mesh).unwrap();

    assert!(matches!(server.mesh_get_surface_count(stale), Err(Error::Dispatch(_))));
    assert!(engine.resource(stale).is_none());
}

#[test]
fn test_main_rendering_device_is_borrowed() {
    let (engine, server) = setup();

    let device = server.get_rendering_device().unwrap().unwrap();
    assert_eq!(device.handle(), engine.main_device());
    assert_eq!(device.get_device_name().unwrap(), "Mock Device");

    // Borrowed: nothing is released when the wrapper goes away
    drop(device);
    assert!(engine.released().is_empty());
    assert!(engine.resource(engine.main_device()).is_some());
}

#[test]
fn test_no_rendering_device() {
    let (engine, server) = setup();
    engine.detach_main_device();

    assert!(server.get_rendering_device().unwrap().is_none());
    assert!(server.create_local_rendering_device().unwrap().is_none());
}

#[test]
fn test_local_rendering_device_is_released_once() {
    let (engine, server) = setup();

    let local = server.create_local_rendering_device().unwrap().unwrap();
    let handle = local.handle();
    assert_ne!(handle, engine.main_device());
    assert_eq!(local.get_device_name().unwrap(), "Mock Local Device");

    local.free();

    assert_eq!(engine.released(), vec![handle]);
    assert!(engine.resource(handle).is_none());
}

#[test]
fn test_calls_resolve_each_member_once() {
    let (engine, server) = setup();

    for _ in 0..4 {
        let mesh = server.mesh_create().unwrap();
        server.free_rid(mesh).unwrap();
    }

    assert_eq!(engine.resolve_count(&members::MESH_CREATE), 1);
    assert_eq!(engine.resolve_count(&members::FREE_RID), 1);
    assert_eq!(engine.invocation_count(), 8);
}

#[test]
fn test_unresolved_free_returns_the_handle_for_retry() {
    let (engine, server) = setup();
    engine.hide_member(&members::FREE_RID);
    let mesh = server.mesh_create().unwrap();
    let raw = mesh.handle();

    let err = server.free_rid(mesh).unwrap_err();
    assert_eq!(
        *err.error(),
        Error::UnknownMember { class: "RenderingServer".to_string(), member: "free_rid".to_string() }
    );
    assert!(engine.resource(raw).is_some());

    // resolution failures are not cached, so the retry succeeds
    engine.unhide_member(&members::FREE_RID);
    let mesh = err.into_rid();
    assert_eq!(mesh.handle(), raw);
    server.free_rid(mesh).unwrap();

    assert!(engine.resource(raw).is_none());
    assert_eq!(engine.resolve_count(&members::FREE_RID), 2);
}

#[test]
fn test_rejected_free_keeps_ownership() {
    let (engine, server) = setup();
    let mesh = server.mesh_create().unwrap();
    let stale = mesh.handle();
    server.free_rid(mesh).unwrap();

    let err = server.free_rid(OwnedHandle::adopt(stale, false)).unwrap_err();
    assert!(matches!(err.error(), Error::Dispatch(_)));
    assert_eq!(err.into_rid().handle(), stale);
}

#[test]
fn test_free_error_converts_into_bridge_error() {
    let (engine, server) = setup();
    engine.hide_member(&members::FREE_RID);
    let mesh = server.mesh_create().unwrap();

    let free = |rid| -> Result<()> {
        server.free_rid(rid)?;
        Ok(())
    };
    assert!(matches!(free(mesh), Err(Error::UnknownMember { .. })));
}
