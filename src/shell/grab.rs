// SPDX-License-Identifier: GPL-3.0-only

use tracing::debug;

use super::ClientId;

/// What an interactive gesture does to its window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrabKind {
    Move,
    Resize,
}

/// The interactive move/resize gesture, if one is in progress.
///
/// At most one grab exists at a time. It never outlives its client: the
/// registry drops it when the client is destroyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Grab {
    #[default]
    Idle,
    Active { client: ClientId, kind: GrabKind },
}

impl Grab {
    pub fn is_active(&self) -> bool {
        matches!(self, Grab::Active { .. })
    }

    /// Client being manipulated, if any
    pub fn client(&self) -> Option<ClientId> {
        match self {
            Grab::Active { client, .. } => Some(*client),
            Grab::Idle => None,
        }
    }

    /// Start a gesture on `client`. Refused while another gesture runs.
    pub fn begin(&mut self, client: ClientId, kind: GrabKind) -> bool {
        if self.is_active() {
            debug!("Grab already active, ignoring {:?} on {}", kind, client);
            return false;
        }

        *self = Grab::Active { client, kind };
        true
    }

    /// Finish the gesture of the given kind.
    ///
    /// Returns the client the gesture was bound to. A release that does not
    /// match the running gesture leaves the grab untouched.
    pub fn end(&mut self, kind: GrabKind) -> Option<ClientId> {
        match *self {
            Grab::Active { client, kind: active } if active == kind => {
                *self = Grab::Idle;
                Some(client)
            }
            _ => None,
        }
    }

    /// Drop the gesture if it is bound to `client`
    pub fn forget(&mut self, client: ClientId) -> bool {
        if self.client() == Some(client) {
            debug!("Cancelling grab on destroyed {}", client);
            *self = Grab::Idle;
            true
        } else {
            false
        }
    }
}
