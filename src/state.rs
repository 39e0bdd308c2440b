// SPDX-License-Identifier: GPL-3.0-only

use smithay::utils::{Logical, Rectangle};
use tracing::{debug, info, trace, warn};

use crate::backend::{Compositor, HostEvent, ScreenHandle, StackingMode, WindowHandle};
use crate::config::Config;
use crate::error::Result;
use crate::input::keybindings::Bindings;
use crate::shell::{grab::Grab, ClientId, ScreenId, Shell};

/// The window manager state, owned by the event loop and handed to every
/// callback in turn
#[derive(Debug)]
pub struct State<C: Compositor> {
    pub backend: C,
    pub shell: Shell,
    pub grab: Grab,
    pub config: Config,
    pub bindings: Bindings,
    pub should_stop: bool,
}

impl<C: Compositor> State<C> {
    pub fn new(backend: C, config: Config) -> Self {
        let bindings = Bindings::new(&config);
        Self::with_bindings(backend, config, bindings)
    }

    pub fn with_bindings(backend: C, config: Config, bindings: Bindings) -> Self {
        Self {
            backend,
            shell: Shell::new(config.layout_params()),
            grab: Grab::Idle,
            config,
            bindings,
            should_stop: false,
        }
    }

    /// Tell the compositor which input to intercept and how often to report motion
    pub fn setup(&mut self) {
        for binding in self.bindings.iter() {
            self.backend
                .add_binding(binding.kind, binding.modifiers, binding.code);
        }
        self.backend.set_motion_throttle(self.config.motion_throttle_hz);
        info!("Registered {} bindings", self.bindings.iter().count());
    }

    /// Process one compositor event to completion
    pub fn handle_event(&mut self, event: HostEvent) -> Result<()> {
        trace!(?event, "Host event");
        match event {
            HostEvent::NewScreen(screen) => self.new_screen(screen)?,
            HostEvent::ScreenDestroyed(screen) => self.screen_destroyed(screen),
            HostEvent::ScreenGeometry { screen, geometry } => {
                self.screen_geometry_changed(screen, geometry)
            }
            HostEvent::NewWindow(window) => self.new_window(window)?,
            HostEvent::WindowDestroyed(window) => self.window_destroyed(window),
            HostEvent::WindowEntered(window) => self.window_entered(window),
            HostEvent::Key {
                modifiers,
                keysym,
                state,
                time,
            } => self.process_key(modifiers, keysym, state, time),
            HostEvent::Button {
                modifiers,
                button,
                state,
                time,
            } => self.process_button(modifiers, button, state, time),
        }

        debug_assert!(
            self.shell.validate_consistency(),
            "registry inconsistent after event"
        );
        Ok(())
    }

    pub fn new_screen(&mut self, handle: ScreenHandle) -> Result<()> {
        let id = self.shell.register_screen(handle)?;
        // clients created before any screen existed land here
        self.arrange(Some(id));
        Ok(())
    }

    pub fn screen_destroyed(&mut self, handle: ScreenHandle) {
        let Some(removed) = self.shell.unregister_screen(handle) else {
            warn!("Destroy for unknown {}", handle);
            return;
        };
        if !removed.rehomed.is_empty() {
            self.arrange(removed.successor);
        }
    }

    pub fn screen_geometry_changed(
        &mut self,
        handle: ScreenHandle,
        geometry: Rectangle<i32, Logical>,
    ) {
        let Some(id) = self.shell.set_screen_geometry(handle, geometry) else {
            warn!("Geometry for unknown {}", handle);
            return;
        };
        self.arrange(Some(id));
    }

    pub fn new_window(&mut self, window: WindowHandle) -> Result<()> {
        let id = self.shell.register_client(window)?;
        let floating = self.shell.is_floating(id);

        self.backend.set_min_size(window, self.config.min_window_size);
        self.backend.set_stacking(window, stacking_mode(floating));
        self.backend.show(window);

        self.focus(Some(id), true);
        let screen = self.shell.client(id).and_then(|c| c.screen);
        self.arrange(screen);
        Ok(())
    }

    pub fn window_destroyed(&mut self, window: WindowHandle) {
        let Some(removed) = self.shell.unregister_client(window) else {
            warn!("Destroy for unknown {}", window);
            return;
        };

        self.grab.forget(removed.id);

        if removed.was_focused {
            let next = self.shell.fallback_focus(removed.client.screen);
            debug!("Focus falls back to {:?}", next);
            self.focus(next, true);
        }

        self.arrange(removed.client.screen);
    }

    /// Pointer entered a window: focus follows, unless a gesture is running
    pub fn window_entered(&mut self, window: WindowHandle) {
        if self.grab.is_active() {
            trace!("Ignoring enter of {} during grab", window);
            return;
        }
        let Some(id) = self.shell.client_for_window(window) else {
            warn!("Enter for unknown {}", window);
            return;
        };
        if self.shell.focused() != Some(id) {
            self.focus(Some(id), false);
        }
    }

    /// Move keyboard focus and the active border to `client`
    pub fn focus(&mut self, client: Option<ClientId>, raise: bool) {
        let client = client.filter(|id| self.shell.client(*id).is_some());

        if let Some(previous) = self.shell.focused().and_then(|id| self.shell.client(id)) {
            self.backend.set_border(
                previous.window,
                self.config.border_color_normal,
                self.config.border_width,
            );
        }

        let window = client.and_then(|id| self.shell.client(id)).map(|c| c.window);
        if let (Some(id), Some(window)) = (client, window) {
            self.backend.set_border(
                window,
                self.config.border_color_active,
                self.config.border_width,
            );
            if raise && self.shell.is_floating(id) {
                self.shell.raise(id);
            }
        }

        self.backend.focus(window);
        self.shell.set_focused(client);
        debug!("Focused {:?}", client);
    }

    /// Switch a client between tiled and floating, keeping the compositor's
    /// stacking mode in step. Returns whether it changed sequence.
    pub fn set_floating(&mut self, id: ClientId, floating: bool, raise: bool) -> bool {
        if !self.shell.set_floating(id, floating, raise) {
            return false;
        }

        if let Some(client) = self.shell.client(id) {
            self.backend
                .set_stacking(client.window, stacking_mode(floating));
            // start floating where the layout last put it
            match client.geometry {
                Some(geometry) if floating => self.backend.set_geometry(client.window, geometry),
                _ => {}
            }
        }
        true
    }

    /// Recompute and push the geometry of every tiled client on `screen`
    pub fn arrange(&mut self, screen: Option<ScreenId>) {
        let Some(screen_id) = screen else {
            return;
        };
        let tiled = self.shell.tiled_on(screen);
        let Some(screen) = self.shell.screen_mut(screen_id) else {
            return;
        };
        let area = screen.geometry;
        let positions = screen.tiling.tile(area, &tiled);

        for (id, geometry) in positions {
            if let Some(client) = self.shell.client_mut(id) {
                client.geometry = Some(geometry);
                self.backend.set_geometry(client.window, geometry);
            }
        }
    }
}

fn stacking_mode(floating: bool) -> StackingMode {
    if floating {
        StackingMode::Stacked
    } else {
        StackingMode::Tiled
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::headless::{Headless, Request};
    use pretty_assertions::assert_eq;
    use smithay::utils::{Point, Size};

    pub(crate) fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Logical> {
        Rectangle::new(Point::from((x, y)), Size::from((w, h)))
    }

    /// State with one 1920x1080 screen
    pub(crate) fn state() -> State<Headless> {
        let mut state = State::new(Headless::new(), Config::default());
        state.handle_event(HostEvent::NewScreen(ScreenHandle(1))).unwrap();
        state
            .handle_event(HostEvent::ScreenGeometry {
                screen: ScreenHandle(1),
                geometry: rect(0, 0, 1920, 1080),
            })
            .unwrap();
        state.backend.take();
        state
    }

    pub(crate) fn open(state: &mut State<Headless>, window: u64) -> ClientId {
        state
            .handle_event(HostEvent::NewWindow(WindowHandle(window)))
            .unwrap();
        state.shell.client_for_window(WindowHandle(window)).unwrap()
    }

    pub(crate) fn close(state: &mut State<Headless>, window: u64) {
        state
            .handle_event(HostEvent::WindowDestroyed(WindowHandle(window)))
            .unwrap();
    }

    #[test]
    fn new_window_is_shown_focused_and_tiled() {
        let mut state = state();
        let id = open(&mut state, 1);
        let w = WindowHandle(1);

        assert_eq!(
            state.backend.take(),
            vec![
                Request::SetMinSize(w, Size::from((20, 20))),
                Request::SetStacking(w, StackingMode::Tiled),
                Request::Show(w),
                Request::SetBorder(w, 0xff6699cc, 1),
                Request::Focus(Some(w)),
                Request::SetGeometry(w, rect(1, 1, 1918, 1078)),
            ]
        );
        assert_eq!(state.shell.focused(), Some(id));
        assert_eq!(
            state.shell.client(id).unwrap().geometry,
            Some(rect(1, 1, 1918, 1078))
        );
    }

    #[test]
    fn three_windows_scenario() {
        let mut state = state();
        open(&mut state, 1);
        open(&mut state, 2);
        open(&mut state, 3);

        // newest window is the master
        assert_eq!(
            state.backend.geometry_of(WindowHandle(3)),
            Some(rect(1, 1, 1151, 1078))
        );
        assert_eq!(
            state.backend.geometry_of(WindowHandle(2)),
            Some(rect(1154, 1, 765, 538))
        );
        assert_eq!(
            state.backend.geometry_of(WindowHandle(1)),
            Some(rect(1154, 541, 765, 538))
        );
    }

    #[test]
    fn focus_moves_active_border() {
        let mut state = state();
        open(&mut state, 1);
        open(&mut state, 2);
        state.backend.take();

        let first = state.shell.client_for_window(WindowHandle(1));
        state.focus(first, false);
        assert_eq!(
            state.backend.take(),
            vec![
                Request::SetBorder(WindowHandle(2), 0xff444444, 1),
                Request::SetBorder(WindowHandle(1), 0xff6699cc, 1),
                Request::Focus(Some(WindowHandle(1))),
            ]
        );
    }

    #[test]
    fn destroying_focused_prefers_floating_fallback() {
        let mut state = state();
        let tiled = open(&mut state, 1);
        state.shell.toggle_floating_default();
        let floating = open(&mut state, 2);
        state.shell.toggle_floating_default();
        let doomed = open(&mut state, 3);
        assert_eq!(state.shell.focused(), Some(doomed));

        close(&mut state, 3);
        assert_eq!(state.shell.focused(), Some(floating));
        assert_eq!(state.backend.focused(), Some(WindowHandle(2)));

        close(&mut state, 2);
        assert_eq!(state.shell.focused(), Some(tiled));

        close(&mut state, 1);
        assert_eq!(state.shell.focused(), None);
        assert_eq!(state.backend.focused(), None);
    }

    #[test]
    fn destroying_unfocused_keeps_focus() {
        let mut state = state();
        open(&mut state, 1);
        let b = open(&mut state, 2);
        close(&mut state, 1);
        assert_eq!(state.shell.focused(), Some(b));
        assert_eq!(
            state.backend.geometry_of(WindowHandle(2)),
            Some(rect(1, 1, 1918, 1078))
        );
    }

    #[test]
    fn unknown_handles_are_ignored() {
        let mut state = state();
        state
            .handle_event(HostEvent::WindowDestroyed(WindowHandle(99)))
            .unwrap();
        state
            .handle_event(HostEvent::ScreenDestroyed(ScreenHandle(99)))
            .unwrap();
        state
            .handle_event(HostEvent::WindowEntered(WindowHandle(99)))
            .unwrap();
        assert!(state.backend.take().is_empty());
    }

    #[test]
    fn enter_of_unknown_window_keeps_focus() {
        let mut state = state();
        let a = open(&mut state, 1);
        state.backend.take();

        state
            .handle_event(HostEvent::WindowEntered(WindowHandle(42)))
            .unwrap();
        assert_eq!(state.shell.focused(), Some(a));
        assert!(state.backend.take().is_empty());
    }

    #[test]
    fn pointer_enter_focuses_without_raise() {
        let mut state = state();
        state.shell.toggle_floating_default();
        let a = open(&mut state, 1);
        let b = open(&mut state, 2);
        let screen = state.shell.selected_screen();
        assert_eq!(state.shell.floating_on(screen), vec![b, a]);

        state
            .handle_event(HostEvent::WindowEntered(WindowHandle(1)))
            .unwrap();
        assert_eq!(state.shell.focused(), Some(a));
        assert_eq!(state.shell.floating_on(screen), vec![b, a]);
    }

    #[test]
    fn floating_windows_are_not_tiled() {
        let mut state = state();
        let a = open(&mut state, 1);
        open(&mut state, 2);

        state.set_floating(a, true, true);
        state.arrange(state.shell.selected_screen());
        assert_eq!(
            state.backend.geometry_of(WindowHandle(2)),
            Some(rect(1, 1, 1918, 1078))
        );
        assert!(state
            .backend
            .requests
            .contains(&Request::SetStacking(WindowHandle(1), StackingMode::Stacked)));
    }

    #[test]
    fn geometry_change_retiles() {
        let mut state = state();
        open(&mut state, 1);
        state
            .handle_event(HostEvent::ScreenGeometry {
                screen: ScreenHandle(1),
                geometry: rect(0, 30, 1280, 690),
            })
            .unwrap();
        assert_eq!(
            state.backend.geometry_of(WindowHandle(1)),
            Some(rect(1, 31, 1278, 688))
        );
    }

    #[test]
    fn screen_teardown_moves_clients() {
        let mut state = state();
        let a = open(&mut state, 1);
        state
            .handle_event(HostEvent::NewScreen(ScreenHandle(2)))
            .unwrap();
        state
            .handle_event(HostEvent::ScreenGeometry {
                screen: ScreenHandle(2),
                geometry: rect(1920, 0, 1280, 1024),
            })
            .unwrap();

        state
            .handle_event(HostEvent::ScreenDestroyed(ScreenHandle(1)))
            .unwrap();
        let second = state.shell.screen_for_handle(ScreenHandle(2));
        assert_eq!(state.shell.selected_screen(), second);
        assert_eq!(state.shell.client(a).unwrap().screen, second);
        assert_eq!(
            state.backend.geometry_of(WindowHandle(1)),
            Some(rect(1921, 1, 1278, 1022))
        );
    }

    #[test]
    fn setup_registers_bindings() {
        let mut state = State::new(Headless::new(), Config::default());
        state.setup();
        let requests = state.backend.take();
        let bindings = requests
            .iter()
            .filter(|r| matches!(r, Request::AddBinding(..)))
            .count();
        assert_eq!(bindings, state.bindings.iter().count());
        assert_eq!(requests.last(), Some(&Request::SetMotionThrottle(60)));
    }
}
