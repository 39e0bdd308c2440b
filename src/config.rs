// SPDX-License-Identifier: GPL-3.0-only

use smithay::{
    input::keyboard::ModifiersState,
    utils::{Logical, Size},
};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::shell::tiling::LayoutParams;

/// Largest accepted `SWT_GAPS`, in pixels
pub const MAX_GAPS: i32 = 500;
/// Largest accepted `SWT_BORDER_WIDTH`, in pixels
pub const MAX_BORDER_WIDTH: u32 = 100;

/// Static window manager settings, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub gaps: i32,
    pub border_width: u32,
    pub border_color_active: u32,
    pub border_color_normal: u32,
    /// Initial master width in percent of the usable screen width
    pub master_factor: u32,
    /// Pixels the master column changes by per resize binding
    pub master_resize_step: i32,
    pub motion_throttle_hz: u32,
    pub min_window_size: Size<i32, Logical>,
    pub terminal: Vec<String>,
    pub launcher: Vec<String>,
    pub modkey: ModifiersState,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gaps: 0,
            border_width: 1,
            border_color_active: 0xff6699cc,
            border_color_normal: 0xff444444,
            master_factor: 60,
            master_resize_step: 20,
            motion_throttle_hz: 60,
            min_window_size: Size::from((20, 20)),
            terminal: vec!["st-wl".to_string()],
            launcher: vec!["dmenu-wl_run".to_string()],
            modkey: ModifiersState {
                logo: true,
                ..Default::default()
            },
        }
    }
}

impl Config {
    /// Compiled-in defaults with overrides from `SWT_*` environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `SWT_*` name
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(gaps) = parse_var::<i32>(&lookup, "SWT_GAPS").filter(|g| *g >= 0) {
            config.gaps = gaps.min(MAX_GAPS);
        }
        if let Some(width) = parse_var::<u32>(&lookup, "SWT_BORDER_WIDTH") {
            config.border_width = width.min(MAX_BORDER_WIDTH);
        }
        if let Some(factor) = parse_var::<u32>(&lookup, "SWT_MASTER_FACTOR") {
            config.master_factor = factor.clamp(1, 99);
        }
        if let Some(terminal) = command_var(&lookup, "SWT_TERMINAL") {
            config.terminal = terminal;
        }
        if let Some(launcher) = command_var(&lookup, "SWT_LAUNCHER") {
            config.launcher = launcher;
        }
        if let Some(modkey) = lookup("SWT_MODKEY") {
            config.modkey = parse_modkey(&modkey);
        }

        debug!("Configuration: {:?}", config);
        config
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            gaps: self.gaps,
            border_width: self.border_width as i32,
            master_factor: self.master_factor,
        }
    }
}

fn parse_var<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let value = lookup(name)?;
    match value.trim().parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", name, value);
            None
        }
    }
}

fn command_var(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<Vec<String>> {
    let value = lookup(name)?;
    let command: Vec<String> = value.split_whitespace().map(str::to_string).collect();
    if command.is_empty() {
        warn!("Ignoring empty {}", name);
        return None;
    }
    Some(command)
}

/// Map a modifier name to a modifier set, defaulting to Super
pub fn parse_modkey(name: &str) -> ModifiersState {
    match name.to_lowercase().as_str() {
        "alt" => ModifiersState {
            alt: true,
            ..Default::default()
        },
        "super" | "logo" | "win" | "windows" => ModifiersState {
            logo: true,
            ..Default::default()
        },
        other => {
            warn!("Unknown modifier {:?}, using super", other);
            ModifiersState {
                logo: true,
                ..Default::default()
            }
        }
    }
}
