// SPDX-License-Identifier: GPL-3.0-only

pub mod keybindings;

use smithay::{
    backend::input::{ButtonState, KeyState},
    input::keyboard::ModifiersState,
};
use tracing::{debug, info, trace};

use self::keybindings::{Action, BindingKind};
use crate::backend::Compositor;
use crate::shell::{focus::Direction, grab::GrabKind};
use crate::state::State;

impl<C: Compositor> State<C> {
    pub fn process_key(
        &mut self,
        modifiers: ModifiersState,
        keysym: u32,
        state: KeyState,
        time: u32,
    ) {
        trace!(keysym, ?state, "Key");
        self.dispatch(
            BindingKind::Key,
            modifiers,
            keysym,
            state == KeyState::Pressed,
            time,
        );
    }

    pub fn process_button(
        &mut self,
        modifiers: ModifiersState,
        button: u32,
        state: ButtonState,
        time: u32,
    ) {
        trace!(button, ?state, "Button");
        self.dispatch(
            BindingKind::Button,
            modifiers,
            button,
            state == ButtonState::Pressed,
            time,
        );
    }

    /// Run the action bound to an input event, if any
    pub fn dispatch(
        &mut self,
        kind: BindingKind,
        modifiers: ModifiersState,
        code: u32,
        pressed: bool,
        time: u32,
    ) {
        let Some(binding) = self.bindings.check(kind, &modifiers, code) else {
            return;
        };
        let action = binding.action.clone();
        self.handle_action(action, pressed, time);
    }

    /// Carry out an action.
    ///
    /// Only gestures care about releases: press starts them, release ends
    /// them. Every other action fires on press alone.
    pub fn handle_action(&mut self, action: Action, pressed: bool, time: u32) {
        use Action::*;

        match (action, pressed) {
            (Move, true) => self.begin_grab(GrabKind::Move),
            (Move, false) => self.end_grab(GrabKind::Move),
            (Resize, true) => self.begin_grab(GrabKind::Resize),
            (Resize, false) => self.end_grab(GrabKind::Resize),
            (_, false) => {}

            (FocusNext, true) => self.focus_step(Direction::Next),
            (FocusPrev, true) => self.focus_step(Direction::Prev),
            (MasterNext, true) => self.rotate_master(Direction::Next),
            (MasterPrev, true) => self.rotate_master(Direction::Prev),
            (ToggleFloating, true) => self.toggle_floating(),
            (ToggleFloatingDefault, true) => {
                self.shell.toggle_floating_default();
            }
            (CloseWindow, true) => self.close_focused(),
            (ResizeMaster(delta), true) => self.resize_master(delta),
            (Spawn(command), true) => {
                info!("Spawning {:?} at {}", command, time);
                self.backend.spawn(&command);
            }
            (Quit, true) => {
                info!("Quit requested");
                self.should_stop = true;
            }
        }
    }

    fn focus_step(&mut self, direction: Direction) {
        match self.shell.focus_target(direction) {
            Some(target) => self.focus(Some(target), false),
            None => debug!("Nothing to focus"),
        }
    }

    fn rotate_master(&mut self, direction: Direction) {
        let Some(master) = self.shell.rotate_master(direction) else {
            debug!("Not enough tiled clients to rotate");
            return;
        };
        self.focus(Some(master), true);
        self.arrange(self.shell.active_screen());
    }

    fn toggle_floating(&mut self) {
        let Some(id) = self.shell.focused() else {
            return;
        };
        let floating = !self.shell.is_floating(id);
        self.set_floating(id, floating, true);
        self.arrange(self.shell.active_screen());
    }

    fn close_focused(&mut self) {
        if let Some(client) = self.shell.focused().and_then(|id| self.shell.client(id)) {
            self.backend.close(client.window);
        }
    }

    fn resize_master(&mut self, delta: i32) {
        let Some(screen_id) = self.shell.active_screen() else {
            return;
        };
        if let Some(screen) = self.shell.screen_mut(screen_id) {
            let area = screen.geometry;
            screen.tiling.resize_master(area, delta);
        }
        self.arrange(Some(screen_id));
    }

    /// Start moving or resizing the focused client. A tiled client is made
    /// floating first, without a raise so it does not jump.
    fn begin_grab(&mut self, kind: GrabKind) {
        let Some(id) = self.shell.focused() else {
            debug!("No focused client to {:?}", kind);
            return;
        };
        if self.grab.is_active() {
            return;
        }

        if !self.shell.is_floating(id) {
            self.set_floating(id, true, false);
            self.arrange(self.shell.active_screen());
        }

        if self.grab.begin(id, kind) {
            if let Some(client) = self.shell.client(id) {
                debug!("Starting {:?} of {}", kind, id);
                self.backend.begin_interactive(client.window, kind);
            }
        }
    }

    fn end_grab(&mut self, kind: GrabKind) {
        let Some(id) = self.grab.end(kind) else {
            return;
        };
        if let Some(client) = self.shell.client(id) {
            debug!("Finished {:?} of {}", kind, id);
            self.backend.end_interactive(client.window, kind);
        }
    }
}
