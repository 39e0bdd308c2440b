// SPDX-License-Identifier: GPL-3.0-only

use smithay::{
    input::keyboard::ModifiersState,
    utils::{Logical, Rectangle, Size},
};
use tracing::trace;

use super::{Compositor, StackingMode, WindowHandle};
use crate::input::keybindings::BindingKind;
use crate::shell::grab::GrabKind;

/// A request issued to the compositor
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    SetGeometry(WindowHandle, Rectangle<i32, Logical>),
    SetBorder(WindowHandle, u32, u32),
    SetStacking(WindowHandle, StackingMode),
    SetMinSize(WindowHandle, Size<i32, Logical>),
    Show(WindowHandle),
    Close(WindowHandle),
    Focus(Option<WindowHandle>),
    BeginInteractive(WindowHandle, GrabKind),
    EndInteractive(WindowHandle, GrabKind),
    AddBinding(BindingKind, u32),
    SetMotionThrottle(u32),
    Spawn(Vec<String>),
}

/// Compositor stand-in that records every request instead of acting on it.
///
/// Useful for dry runs of a binding table and for exercising the window
/// manager without a display.
#[derive(Debug, Default)]
pub struct Headless {
    pub requests: Vec<Request>,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the recorded requests
    pub fn take(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    /// Last geometry pushed for `window`
    pub fn geometry_of(&self, window: WindowHandle) -> Option<Rectangle<i32, Logical>> {
        self.requests.iter().rev().find_map(|request| match request {
            Request::SetGeometry(w, geometry) if *w == window => Some(*geometry),
            _ => None,
        })
    }

    /// Window that most recently received keyboard focus
    pub fn focused(&self) -> Option<WindowHandle> {
        self.requests.iter().rev().find_map(|request| match request {
            Request::Focus(window) => Some(*window),
            _ => None,
        })?
    }

    fn record(&mut self, request: Request) {
        trace!(?request, "headless request");
        self.requests.push(request);
    }
}

impl Compositor for Headless {
    fn set_geometry(&mut self, window: WindowHandle, geometry: Rectangle<i32, Logical>) {
        self.record(Request::SetGeometry(window, geometry));
    }

    fn set_border(&mut self, window: WindowHandle, color: u32, width: u32) {
        self.record(Request::SetBorder(window, color, width));
    }

    fn set_stacking(&mut self, window: WindowHandle, mode: StackingMode) {
        self.record(Request::SetStacking(window, mode));
    }

    fn set_min_size(&mut self, window: WindowHandle, size: Size<i32, Logical>) {
        self.record(Request::SetMinSize(window, size));
    }

    fn show(&mut self, window: WindowHandle) {
        self.record(Request::Show(window));
    }

    fn close(&mut self, window: WindowHandle) {
        self.record(Request::Close(window));
    }

    fn focus(&mut self, window: Option<WindowHandle>) {
        self.record(Request::Focus(window));
    }

    fn begin_interactive(&mut self, window: WindowHandle, kind: GrabKind) {
        self.record(Request::BeginInteractive(window, kind));
    }

    fn end_interactive(&mut self, window: WindowHandle, kind: GrabKind) {
        self.record(Request::EndInteractive(window, kind));
    }

    fn add_binding(&mut self, kind: BindingKind, _modifiers: ModifiersState, code: u32) {
        self.record(Request::AddBinding(kind, code));
    }

    fn set_motion_throttle(&mut self, hz: u32) {
        self.record(Request::SetMotionThrottle(hz));
    }

    fn spawn(&mut self, command: &[String]) {
        self.record(Request::Spawn(command.to_vec()));
    }
}
