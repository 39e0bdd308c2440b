// SPDX-License-Identifier: GPL-3.0-only

pub mod headless;

use smithay::{
    backend::input::{ButtonState, KeyState},
    input::keyboard::ModifiersState,
    utils::{Logical, Rectangle, Size},
};

use crate::input::keybindings::BindingKind;
use crate::shell::grab::GrabKind;

/// Opaque window handle owned by the compositor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub u64);

/// Opaque screen handle owned by the compositor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenHandle(pub u64);

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window@{:#x}", self.0)
    }
}

impl std::fmt::Display for ScreenHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "screen@{:#x}", self.0)
    }
}

/// How the compositor stacks a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingMode {
    /// Geometry is owned by the layout, drawn below floating windows
    Tiled,
    /// Geometry is owned by the client, drawn above tiled windows
    Stacked,
}

/// Events delivered by the compositor, one at a time, on the event loop thread
#[derive(Debug, Clone)]
pub enum HostEvent {
    NewScreen(ScreenHandle),
    ScreenDestroyed(ScreenHandle),
    ScreenGeometry {
        screen: ScreenHandle,
        geometry: Rectangle<i32, Logical>,
    },
    NewWindow(WindowHandle),
    WindowDestroyed(WindowHandle),
    WindowEntered(WindowHandle),
    Key {
        modifiers: ModifiersState,
        keysym: u32,
        state: KeyState,
        time: u32,
    },
    Button {
        modifiers: ModifiersState,
        button: u32,
        state: ButtonState,
        time: u32,
    },
}

/// The narrow command interface the window manager drives the compositor through.
///
/// Every method is a fire-and-forget request; the compositor reports back only
/// through [`HostEvent`]s.
pub trait Compositor {
    fn set_geometry(&mut self, window: WindowHandle, geometry: Rectangle<i32, Logical>);
    fn set_border(&mut self, window: WindowHandle, color: u32, width: u32);
    fn set_stacking(&mut self, window: WindowHandle, mode: StackingMode);
    fn set_min_size(&mut self, window: WindowHandle, size: Size<i32, Logical>);
    fn show(&mut self, window: WindowHandle);
    fn close(&mut self, window: WindowHandle);

    /// Hand keyboard focus to `window`, or to nobody
    fn focus(&mut self, window: Option<WindowHandle>);

    fn begin_interactive(&mut self, window: WindowHandle, kind: GrabKind);
    fn end_interactive(&mut self, window: WindowHandle, kind: GrabKind);

    /// Ask the compositor to intercept this combination instead of forwarding it
    fn add_binding(&mut self, kind: BindingKind, modifiers: ModifiersState, code: u32);

    fn set_motion_throttle(&mut self, hz: u32);

    /// Launch a detached program. The child is never waited on by the caller.
    fn spawn(&mut self, command: &[String]) {
        crate::spawn::spawn_detached(command);
    }
}
