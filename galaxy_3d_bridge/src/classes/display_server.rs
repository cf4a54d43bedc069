/// DisplayServer facade: screens, windows, clipboard.
///
/// The display service is an engine singleton. Engines started without a
/// display (headless) do not create it; with `Config::headless_fallback`
/// enabled every method then returns the documented dummy value instead of
/// failing, mirroring the engine's own headless behaviour.

use std::sync::Arc;
use glam::IVec2;
use crate::binding::{Arg, Bindings, MemberKey, Receiver};
use crate::bridge::Bridge;
use crate::classes::decode_status;
use crate::error::{Error, Result};

/// Window id of the main window
pub const MAIN_WINDOW_ID: i32 = 0;

/// Screen index meaning "the screen the main window is on"
pub const SCREEN_OF_MAIN_WINDOW: i32 = -1;

pub(crate) mod members {
    use crate::binding::MemberKey;

    pub const GET_SCREEN_COUNT: MemberKey = MemberKey::new("DisplayServer", "get_screen_count", 3_744_713_108);
    pub const SCREEN_GET_SIZE: MemberKey = MemberKey::new("DisplayServer", "screen_get_size", 1_629_526_904);
    pub const SCREEN_GET_DPI: MemberKey = MemberKey::new("DisplayServer", "screen_get_dpi", 181_039_630);
    pub const WINDOW_SET_TITLE: MemberKey = MemberKey::new("DisplayServer", "window_set_title", 441_246_282);
    pub const WINDOW_GET_MODE: MemberKey = MemberKey::new("DisplayServer", "window_get_mode", 2_185_728_461);
    pub const HAS_FEATURE: MemberKey = MemberKey::new("DisplayServer", "has_feature", 334_065_950);
    pub const CLIPBOARD_GET: MemberKey = MemberKey::new("DisplayServer", "clipboard_get", 201_670_096);
    pub const CLIPBOARD_SET: MemberKey = MemberKey::new("DisplayServer", "clipboard_set", 83_702_148);
}

// ===== ENUMS =====

/// Window display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowMode {
    Windowed = 0,
    Minimized = 1,
    Maximized = 2,
    Fullscreen = 3,
    ExclusiveFullscreen = 4,
}

impl TryFrom<i64> for WindowMode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Ok(match value {
            0 => WindowMode::Windowed,
            1 => WindowMode::Minimized,
            2 => WindowMode::Maximized,
            3 => WindowMode::Fullscreen,
            4 => WindowMode::ExclusiveFullscreen,
            other => return Err(Error::OutOfRange(format!("unknown WindowMode value {}", other))),
        })
    }
}

/// Optional display service capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    GlobalMenu = 0,
    Subwindows = 1,
    Touchscreen = 2,
    Mouse = 3,
    Clipboard = 5,
    VirtualKeyboard = 6,
    Hidpi = 8,
    Icon = 9,
    ClipboardPrimary = 18,
}

// ===== FACADE =====

pub struct DisplayServer {
    bindings: Arc<Bindings>,
    receiver: Option<Receiver>,
}

impl DisplayServer {
    pub const SINGLETON_NAME: &'static str = "DisplayServer";

    /// Display service of the globally installed engine
    pub fn singleton() -> Result<Self> {
        Self::from_bindings(Bridge::bindings()?)
    }

    /// Display service of a specific engine binding
    ///
    /// # Errors
    ///
    /// `Error::SingletonUnavailable` when the engine has no display service
    /// and headless fallback is disabled.
    ///
    /// The headless decision is taken here, once. A facade built before the
    /// engine's display service starts stays headless; build a new one to
    /// pick the service up.
    pub fn from_bindings(bindings: Arc<Bindings>) -> Result<Self> {
        match bindings.singleton_receiver(Self::SINGLETON_NAME) {
            Ok(receiver) => Ok(Self { bindings, receiver: Some(receiver) }),
            Err(Error::SingletonUnavailable(name)) if bindings.config().headless_fallback => {
                crate::bridge_warn!(
                    "galaxy3d::DisplayServer",
                    "'{}' not available, display calls return headless defaults",
                    name
                );
                Ok(Self { bindings, receiver: None })
            }
            Err(err) => Err(err),
        }
    }

    /// `true` when no display service existed when this facade was built
    pub fn is_headless(&self) -> bool {
        self.receiver.is_none()
    }

    fn call<R: crate::binding::FromValue>(&self, receiver: Receiver, key: &MemberKey, args: &[Arg<'_>]) -> Result<R> {
        self.bindings.call(key, Some(receiver), args)
    }

    /// Number of connected screens. Headless: `0`.
    pub fn get_screen_count(&self) -> Result<i32> {
        let Some(receiver) = self.receiver else { return Ok(0) };
        self.call(receiver, &members::GET_SCREEN_COUNT, &[])
    }

    /// Size of `screen` in pixels (default: screen of the main window).
    /// Headless: `IVec2::ZERO`.
    ///
    /// # Errors
    ///
    /// `Error::OutOfRange` for a screen index the engine does not know.
    pub fn screen_get_size(&self, screen: Option<i32>) -> Result<IVec2> {
        let screen = screen.unwrap_or(SCREEN_OF_MAIN_WINDOW);
        let Some(receiver) = self.receiver else { return Ok(IVec2::ZERO) };
        self.call(receiver, &members::SCREEN_GET_SIZE, &[Arg::from(screen)])
            .map_err(|err| decode_status(err, || format!("screen index {}", screen)))
    }

    /// Dots per inch of `screen` (default: screen of the main window).
    /// Headless: `96`.
    pub fn screen_get_dpi(&self, screen: Option<i32>) -> Result<i32> {
        let screen = screen.unwrap_or(SCREEN_OF_MAIN_WINDOW);
        let Some(receiver) = self.receiver else { return Ok(96) };
        self.call(receiver, &members::SCREEN_GET_DPI, &[Arg::from(screen)])
            .map_err(|err| decode_status(err, || format!("screen index {}", screen)))
    }

    /// Set the title of `window_id` (default: main window). Headless: no-op.
    pub fn window_set_title(&self, title: &str, window_id: Option<i32>) -> Result<()> {
        let window_id = window_id.unwrap_or(MAIN_WINDOW_ID);
        let Some(receiver) = self.receiver else { return Ok(()) };
        self.call(receiver, &members::WINDOW_SET_TITLE, &[Arg::from(title), Arg::from(window_id)])
            .map_err(|err| decode_status(err, || format!("window id {}", window_id)))
    }

    /// Mode of `window_id` (default: main window). Headless: `Windowed`.
    pub fn window_get_mode(&self, window_id: Option<i32>) -> Result<WindowMode> {
        let window_id = window_id.unwrap_or(MAIN_WINDOW_ID);
        let Some(receiver) = self.receiver else { return Ok(WindowMode::Windowed) };
        let raw: i64 = self
            .call(receiver, &members::WINDOW_GET_MODE, &[Arg::from(window_id)])
            .map_err(|err| decode_status(err, || format!("window id {}", window_id)))?;
        WindowMode::try_from(raw)
    }

    /// Whether the display service supports `feature`. Headless: `false`.
    pub fn has_feature(&self, feature: Feature) -> Result<bool> {
        let Some(receiver) = self.receiver else { return Ok(false) };
        self.call(receiver, &members::HAS_FEATURE, &[Arg::Int(feature as i64)])
    }

    /// Clipboard contents. Headless: empty string.
    ///
    /// # Errors
    ///
    /// `Error::Unsupported` on platforms without clipboard access.
    pub fn clipboard_get(&self) -> Result<String> {
        let Some(receiver) = self.receiver else { return Ok(String::new()) };
        self.call(receiver, &members::CLIPBOARD_GET, &[])
            .map_err(|err| decode_status(err, || "clipboard access".to_string()))
    }

    /// Replace the clipboard contents. Headless: no-op.
    pub fn clipboard_set(&self, text: &str) -> Result<()> {
        let Some(receiver) = self.receiver else { return Ok(()) };
        self.call(receiver, &members::CLIPBOARD_SET, &[Arg::from(text)])
            .map_err(|err| decode_status(err, || "clipboard access".to_string()))
    }
}

#[cfg(test)]
#[path = "display_server_tests.rs"]
mod tests;
