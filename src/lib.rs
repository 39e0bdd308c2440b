// SPDX-License-Identifier: GPL-3.0-only

//! Window management policy for a minimal master/stack tiling Wayland compositor.
//!
//! The compositor reports screens, windows and input through [`HostEvent`]s
//! and is driven back through the [`Compositor`] trait. Placement, focus,
//! floating and interactive move/resize decisions are made here.

pub mod backend;
pub mod config;
pub mod error;
pub mod input;
pub mod runtime;
pub mod shell;
pub mod spawn;
pub mod state;

pub use backend::{Compositor, HostEvent, ScreenHandle, StackingMode, WindowHandle};
pub use config::Config;
pub use error::Error;
pub use state::State;
