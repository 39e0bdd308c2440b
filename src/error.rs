// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Unrecoverable window manager failures.
///
/// Requests that make no sense in the current state (moving with nothing
/// focused, rotating a single window) are not errors; they are ignored.
#[derive(Debug, Error)]
pub enum Error {
    /// The event loop or one of its sources could not be set up
    #[error("initialization failed: {0}")]
    FatalInit(String),

    /// No handle left for a new record
    #[error("unable to allocate {0} record")]
    Allocation(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
