// SPDX-License-Identifier: GPL-3.0-only

use smithay::input::keyboard::{keysyms as xkb, ModifiersState};
use tracing::debug;

use crate::config::Config;

/// Linux input event codes of the pointer buttons we bind
pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;

/// Actions that can be triggered by bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // focus
    FocusNext,
    FocusPrev,
    MasterNext,
    MasterPrev,

    // window state
    ToggleFloating,
    ToggleFloatingDefault,
    CloseWindow,

    // layout control, signed pixel delta
    ResizeMaster(i32),

    // interactive gestures, started on press and finished on release
    Move,
    Resize,

    // applications
    Spawn(Vec<String>),

    // system
    Quit,
}

/// Input device class a binding listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Key,
    Button,
}

/// A binding definition
#[derive(Debug, Clone)]
pub struct Binding {
    pub kind: BindingKind,
    pub modifiers: ModifiersState,
    /// Keysym for keys, event code for buttons
    pub code: u32,
    pub action: Action,
}

impl Binding {
    pub fn key(modifiers: ModifiersState, keysym: u32, action: Action) -> Self {
        Self {
            kind: BindingKind::Key,
            modifiers,
            code: keysym,
            action,
        }
    }

    pub fn button(modifiers: ModifiersState, button: u32, action: Action) -> Self {
        Self {
            kind: BindingKind::Button,
            modifiers,
            code: button,
            action,
        }
    }

    /// Check if this binding matches the given event
    pub fn matches(&self, kind: BindingKind, modifiers: &ModifiersState, code: u32) -> bool {
        // check for exact modifier match
        let mod_match = self.modifiers.ctrl == modifiers.ctrl
            && self.modifiers.alt == modifiers.alt
            && self.modifiers.shift == modifiers.shift
            && self.modifiers.logo == modifiers.logo;

        self.kind == kind && mod_match && self.code == code
    }
}

/// The static binding table
#[derive(Debug, Clone)]
pub struct Bindings {
    bindings: Vec<Binding>,
}

impl Bindings {
    /// Build the default table around the configured modifier and commands
    pub fn new(config: &Config) -> Self {
        let modkey = config.modkey;
        let shifted = ModifiersState {
            shift: true,
            ..modkey
        };

        let bindings = vec![
            // applications
            Binding::key(modkey, xkb::KEY_Return, Action::Spawn(config.terminal.clone())),
            Binding::key(modkey, xkb::KEY_d, Action::Spawn(config.launcher.clone())),
            // focus
            Binding::key(modkey, xkb::KEY_j, Action::FocusNext),
            Binding::key(modkey, xkb::KEY_k, Action::FocusPrev),
            Binding::key(shifted, xkb::KEY_j, Action::MasterNext),
            Binding::key(shifted, xkb::KEY_k, Action::MasterPrev),
            // window state
            Binding::key(modkey, xkb::KEY_space, Action::ToggleFloating),
            Binding::key(shifted, xkb::KEY_space, Action::ToggleFloatingDefault),
            Binding::key(modkey, xkb::KEY_q, Action::CloseWindow),
            // layout control
            Binding::key(
                modkey,
                xkb::KEY_h,
                Action::ResizeMaster(-config.master_resize_step),
            ),
            Binding::key(
                modkey,
                xkb::KEY_l,
                Action::ResizeMaster(config.master_resize_step),
            ),
            // gestures
            Binding::button(modkey, BTN_LEFT, Action::Move),
            Binding::button(modkey, BTN_RIGHT, Action::Resize),
            // system
            Binding::key(shifted, xkb::KEY_e, Action::Quit),
        ];

        debug!("Initialized {} bindings", bindings.len());
        Self { bindings }
    }

    pub fn from_bindings(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Find the binding matching an event, if any
    pub fn check(
        &self,
        kind: BindingKind,
        modifiers: &ModifiersState,
        code: u32,
    ) -> Option<&Binding> {
        let binding = self
            .bindings
            .iter()
            .find(|binding| binding.matches(kind, modifiers, code))?;
        tracing::trace!("Binding matched: {:?}", binding.action);
        Some(binding)
    }
}
