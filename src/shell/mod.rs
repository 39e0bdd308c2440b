// SPDX-License-Identifier: GPL-3.0-only

pub mod focus;
pub mod grab;
pub mod tiling;

use indexmap::IndexMap;
use smithay::utils::{Logical, Point, Rectangle, Size};
use std::collections::HashMap;
use tracing::{debug, error, info};

use self::tiling::{LayoutParams, TilingLayout};
use crate::backend::{ScreenHandle, WindowHandle};
use crate::error::{Error, Result};

/// Stable identifier of a managed window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u32);

/// Stable identifier of a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub u32);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClientId({})", self.0)
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ScreenId({})", self.0)
    }
}

/// A display output
#[derive(Debug)]
pub struct Screen {
    pub handle: ScreenHandle,

    /// Usable area reported by the compositor, zero until it reports one
    pub geometry: Rectangle<i32, Logical>,

    /// Per-screen tiling state
    pub tiling: TilingLayout,
}

/// A managed window
#[derive(Debug, Clone)]
pub struct Client {
    pub window: WindowHandle,
    /// `None` while no screen exists
    pub screen: Option<ScreenId>,
    pub floating: bool,
    pub fullscreen: bool,
    pub workspace: u32,
    /// Last geometry pushed by the layout
    pub geometry: Option<Rectangle<i32, Logical>>,
}

/// What is left of a client after it was unregistered
#[derive(Debug)]
pub struct RemovedClient {
    pub id: ClientId,
    pub client: Client,
    pub was_focused: bool,
}

/// Outcome of a screen going away
#[derive(Debug)]
pub struct RemovedScreen {
    pub id: ScreenId,
    /// Screen that took over the selection and the orphaned clients
    pub successor: Option<ScreenId>,
    pub rehomed: Vec<ClientId>,
}

/// The registry of screens and clients.
///
/// Every live client sits in exactly one of the tiled and floating sequences.
/// Both are ordered, most recently inserted (or raised) first, and shared by
/// all screens; per-screen views filter them by the client's screen.
#[derive(Debug)]
pub struct Shell {
    screens: IndexMap<ScreenId, Screen>,
    clients: IndexMap<ClientId, Client>,

    tiled: Vec<ClientId>,
    floating: Vec<ClientId>,

    screen_handles: HashMap<ScreenHandle, ScreenId>,
    window_handles: HashMap<WindowHandle, ClientId>,

    selected_screen: Option<ScreenId>,
    focused: Option<ClientId>,

    /// Place new clients in the floating sequence
    floating_default: bool,

    layout_params: LayoutParams,
    next_client_id: u32,
    next_screen_id: u32,
}

impl Shell {
    pub fn new(layout_params: LayoutParams) -> Self {
        Self {
            screens: IndexMap::new(),
            clients: IndexMap::new(),
            tiled: Vec::new(),
            floating: Vec::new(),
            screen_handles: HashMap::new(),
            window_handles: HashMap::new(),
            selected_screen: None,
            focused: None,
            floating_default: false,
            layout_params,
            next_client_id: 1,
            next_screen_id: 1,
        }
    }

    /// Track a new screen. The first screen becomes the selected one and
    /// adopts any client created while no screen existed.
    pub fn register_screen(&mut self, handle: ScreenHandle) -> Result<ScreenId> {
        if let Some(id) = self.screen_handles.get(&handle) {
            return Ok(*id);
        }

        let id = ScreenId(self.next_screen_id);
        self.next_screen_id = self
            .next_screen_id
            .checked_add(1)
            .ok_or(Error::Allocation("screen"))?;

        self.screens.shift_insert(
            0,
            id,
            Screen {
                handle,
                geometry: Rectangle::new(Point::from((0, 0)), Size::from((0, 0))),
                tiling: TilingLayout::new(self.layout_params),
            },
        );
        self.screen_handles.insert(handle, id);

        if self.selected_screen.is_none() {
            self.selected_screen = Some(id);
            self.rehome_clients(None, Some(id));
        }

        info!("New screen {} as {}", handle, id);
        Ok(id)
    }

    /// Forget a screen, moving the selection and its clients elsewhere
    pub fn unregister_screen(&mut self, handle: ScreenHandle) -> Option<RemovedScreen> {
        let id = self.screen_handles.remove(&handle)?;
        self.screens.shift_remove(&id);

        if self.selected_screen == Some(id) {
            self.selected_screen = self.screens.keys().next().copied();
        }
        let successor = self.selected_screen;
        let rehomed = self.rehome_clients(Some(id), successor);

        info!(
            "Screen {} destroyed, {} clients moved to {:?}",
            id,
            rehomed.len(),
            successor
        );
        Some(RemovedScreen {
            id,
            successor,
            rehomed,
        })
    }

    fn rehome_clients(&mut self, from: Option<ScreenId>, to: Option<ScreenId>) -> Vec<ClientId> {
        let mut moved = Vec::new();
        for (id, client) in self.clients.iter_mut() {
            if client.screen == from {
                client.screen = to;
                moved.push(*id);
            }
        }
        moved
    }

    /// Record the usable area of a screen
    pub fn set_screen_geometry(
        &mut self,
        handle: ScreenHandle,
        geometry: Rectangle<i32, Logical>,
    ) -> Option<ScreenId> {
        let id = *self.screen_handles.get(&handle)?;
        let screen = self.screens.get_mut(&id)?;
        screen.geometry = geometry;
        debug!("{} usable geometry is now {:?}", id, geometry);
        Some(id)
    }

    /// Track a new window on the selected screen
    pub fn register_client(&mut self, window: WindowHandle) -> Result<ClientId> {
        if let Some(id) = self.window_handles.get(&window) {
            return Ok(*id);
        }

        let id = ClientId(self.next_client_id);
        self.next_client_id = self
            .next_client_id
            .checked_add(1)
            .ok_or(Error::Allocation("client"))?;

        let floating = self.floating_default;
        self.clients.insert(
            id,
            Client {
                window,
                screen: self.selected_screen,
                floating,
                fullscreen: false,
                workspace: 0,
                geometry: None,
            },
        );
        self.window_handles.insert(window, id);
        if floating {
            self.floating.insert(0, id);
        } else {
            self.tiled.insert(0, id);
        }

        info!(
            "New window {} as {} ({}) on {:?}",
            window,
            id,
            if floating { "floating" } else { "tiled" },
            self.selected_screen
        );
        Ok(id)
    }

    /// Stop tracking a window. Focus is cleared if it was held by the window;
    /// picking a successor is left to the caller.
    pub fn unregister_client(&mut self, window: WindowHandle) -> Option<RemovedClient> {
        let id = self.window_handles.remove(&window)?;
        let client = self.clients.shift_remove(&id)?;

        self.tiled.retain(|c| *c != id);
        self.floating.retain(|c| *c != id);

        let was_focused = self.focused == Some(id);
        if was_focused {
            self.focused = None;
        }

        info!("Window {} ({}) destroyed", window, id);
        Some(RemovedClient {
            id,
            client,
            was_focused,
        })
    }

    /// Move a client between the tiled and floating sequences.
    ///
    /// A client that already floats is raised instead when `raise` is set.
    /// Returns whether the client changed sequence.
    pub fn set_floating(&mut self, id: ClientId, floating: bool, raise: bool) -> bool {
        let Some(client) = self.clients.get_mut(&id) else {
            return false;
        };

        if client.floating == floating {
            if floating && raise {
                self.raise(id);
            }
            return false;
        }

        client.floating = floating;
        if floating {
            self.tiled.retain(|c| *c != id);
            self.floating.insert(0, id);
        } else {
            self.floating.retain(|c| *c != id);
            self.tiled.insert(0, id);
        }

        debug!(
            "{} is now {}",
            id,
            if floating { "floating" } else { "tiled" }
        );
        true
    }

    /// Put a floating client on top of the floating order
    pub fn raise(&mut self, id: ClientId) {
        if let Some(pos) = self.floating.iter().position(|c| *c == id) {
            if pos > 0 {
                self.floating.remove(pos);
                self.floating.insert(0, id);
            }
        }
    }

    /// Flip where future clients are placed. Existing clients keep their state.
    pub fn toggle_floating_default(&mut self) -> bool {
        self.floating_default = !self.floating_default;
        info!(
            "New windows will be {}",
            if self.floating_default { "floating" } else { "tiled" }
        );
        self.floating_default
    }

    pub fn floating_default(&self) -> bool {
        self.floating_default
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    pub fn client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.get_mut(&id)
    }

    pub fn client_for_window(&self, window: WindowHandle) -> Option<ClientId> {
        self.window_handles.get(&window).copied()
    }

    pub fn clients(&self) -> impl Iterator<Item = (ClientId, &Client)> {
        self.clients.iter().map(|(id, c)| (*id, c))
    }

    pub fn screen(&self, id: ScreenId) -> Option<&Screen> {
        self.screens.get(&id)
    }

    pub fn screen_mut(&mut self, id: ScreenId) -> Option<&mut Screen> {
        self.screens.get_mut(&id)
    }

    pub fn screen_for_handle(&self, handle: ScreenHandle) -> Option<ScreenId> {
        self.screen_handles.get(&handle).copied()
    }

    pub fn screens(&self) -> impl Iterator<Item = ScreenId> + '_ {
        self.screens.keys().copied()
    }

    pub fn selected_screen(&self) -> Option<ScreenId> {
        self.selected_screen
    }

    pub fn focused(&self) -> Option<ClientId> {
        self.focused
    }

    /// Update the selection. Only live clients can be selected.
    pub(crate) fn set_focused(&mut self, id: Option<ClientId>) {
        self.focused = id.filter(|id| self.clients.contains_key(id));
        if let Some(screen) = self.focused.and_then(|id| self.clients[&id].screen) {
            self.selected_screen = Some(screen);
        }
    }

    pub fn is_floating(&self, id: ClientId) -> bool {
        self.clients.get(&id).is_some_and(|c| c.floating)
    }

    /// Tiled clients of a screen in tiling order, master first
    pub fn tiled_on(&self, screen: Option<ScreenId>) -> Vec<ClientId> {
        self.on_screen(&self.tiled, screen)
    }

    /// Floating clients of a screen, topmost first
    pub fn floating_on(&self, screen: Option<ScreenId>) -> Vec<ClientId> {
        self.on_screen(&self.floating, screen)
    }

    fn on_screen(&self, sequence: &[ClientId], screen: Option<ScreenId>) -> Vec<ClientId> {
        sequence
            .iter()
            .copied()
            .filter(|id| self.clients.get(id).is_some_and(|c| c.screen == screen))
            .collect()
    }

    /// Rewrite the order of a screen's tiled clients in place, leaving the
    /// slots of other screens' clients untouched
    pub(crate) fn reorder_tiled(&mut self, screen: Option<ScreenId>, order: &[ClientId]) {
        let slots: Vec<usize> = self
            .tiled
            .iter()
            .enumerate()
            .filter(|(_, id)| self.clients.get(*id).is_some_and(|c| c.screen == screen))
            .map(|(slot, _)| slot)
            .collect();
        debug_assert_eq!(slots.len(), order.len(), "reorder must keep the same clients");

        for (slot, id) in slots.into_iter().zip(order) {
            self.tiled[slot] = *id;
        }
    }

    /// Check every registry invariant, logging each violation
    pub fn validate_consistency(&self) -> bool {
        let mut consistent = true;

        for (id, client) in &self.clients {
            let in_tiled = self.tiled.iter().filter(|c| *c == id).count();
            let in_floating = self.floating.iter().filter(|c| *c == id).count();
            if in_tiled + in_floating != 1 {
                error!(
                    "{} is in {} tiled and {} floating slots",
                    id, in_tiled, in_floating
                );
                consistent = false;
            }
            if client.floating != (in_floating == 1) {
                error!("{} floating flag disagrees with its sequence", id);
                consistent = false;
            }
            if let Some(screen) = client.screen {
                if !self.screens.contains_key(&screen) {
                    error!("{} references dead {}", id, screen);
                    consistent = false;
                }
            }
            if self.window_handles.get(&client.window) != Some(id) {
                error!("{} is not reachable from {}", id, client.window);
                consistent = false;
            }
        }

        if self.tiled.len() + self.floating.len() != self.clients.len() {
            error!(
                "Sequences hold {} entries for {} clients",
                self.tiled.len() + self.floating.len(),
                self.clients.len()
            );
            consistent = false;
        }

        if let Some(focused) = self.focused {
            if !self.clients.contains_key(&focused) {
                error!("Focused {} is not alive", focused);
                consistent = false;
            }
        }

        match self.selected_screen {
            Some(screen) if !self.screens.contains_key(&screen) => {
                error!("Selected {} is not alive", screen);
                consistent = false;
            }
            None if !self.screens.is_empty() => {
                error!("No screen selected among {}", self.screens.len());
                consistent = false;
            }
            _ => {}
        }

        consistent
    }
}
