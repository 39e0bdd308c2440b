// SPDX-License-Identifier: GPL-3.0-only

use smithay::utils::{Logical, Point, Rectangle, Size};
use tracing::debug;

/// Narrowest a master column may get, and the narrowest the stack may be squeezed to
pub const MIN_MASTER_WIDTH: i32 = 20;

/// Static parameters of the master/stack layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Gap between windows and around the screen edge, in pixels
    pub gaps: i32,
    pub border_width: i32,
    /// Initial master width as a percentage of the usable width (1..=99)
    pub master_factor: u32,
}

impl LayoutParams {
    /// Margin between the screen edge and a window's content
    pub fn outer_margin(&self) -> i32 {
        self.gaps + self.border_width
    }

    /// Margin between the contents of two neighbouring windows.
    /// Both windows draw their own border into it.
    pub fn inner_margin(&self) -> i32 {
        self.gaps + 2 * self.border_width
    }
}

/// Master/stack tiling in the spirit of dwm: one master column on the left,
/// the remaining windows split evenly in a column on the right.
#[derive(Debug, Clone)]
pub struct TilingLayout {
    params: LayoutParams,

    /// Master column width in pixels. Derived from `master_factor` the first
    /// time it is needed, after that only changed by explicit resizes.
    master_width: Option<i32>,
}

impl TilingLayout {
    pub fn new(params: LayoutParams) -> Self {
        Self {
            params,
            master_width: None,
        }
    }

    pub fn params(&self) -> LayoutParams {
        self.params
    }

    /// Cached master width, if a layout pass or resize has computed it yet
    pub fn master_width(&self) -> Option<i32> {
        self.master_width
    }

    /// `area` shrunk by the outer margin on every side
    pub fn usable_area(&self, area: Rectangle<i32, Logical>) -> Rectangle<i32, Logical> {
        let outer = self.params.outer_margin();
        Rectangle::new(
            Point::from((area.loc.x + outer, area.loc.y + outer)),
            Size::from((area.size.w - 2 * outer, area.size.h - 2 * outer)),
        )
    }

    /// Bounds the master width may take for a usable width of `usable_width`
    pub fn master_bounds(&self, usable_width: i32) -> (i32, i32) {
        let max = usable_width - self.params.inner_margin() - MIN_MASTER_WIDTH;
        (MIN_MASTER_WIDTH, max.max(MIN_MASTER_WIDTH))
    }

    fn cached_master_width(&mut self, usable_width: i32) -> i32 {
        let factor = self.params.master_factor as i64;
        *self.master_width.get_or_insert_with(|| {
            // round to the nearest pixel
            ((usable_width as i64 * factor + 50) / 100) as i32
        })
    }

    /// Calculate the rectangle of every tiled window on a screen.
    ///
    /// `windows` is in tiling order, the first one is the master. Returns
    /// nothing when there is nothing to tile or the screen is too small to
    /// hold a single window.
    pub fn tile<T: Copy>(
        &mut self,
        area: Rectangle<i32, Logical>,
        windows: &[T],
    ) -> Vec<(T, Rectangle<i32, Logical>)> {
        if windows.is_empty() {
            return Vec::new();
        }

        let usable = self.usable_area(area);
        if usable.size.w <= 0 || usable.size.h <= 0 {
            debug!("Screen area {:?} too small to tile, skipping", area);
            return Vec::new();
        }

        let n = windows.len();
        if n == 1 {
            return vec![(windows[0], usable)];
        }

        let inner = self.params.inner_margin();
        let (min, max) = self.master_bounds(usable.size.w);
        let master_width = self.cached_master_width(usable.size.w).clamp(min, max);

        let mut positions = Vec::with_capacity(n);
        positions.push((
            windows[0],
            Rectangle::new(usable.loc, Size::from((master_width, usable.size.h))),
        ));

        let stack_count = (n - 1) as i32;
        let stack_x = usable.loc.x + master_width + inner;
        let stack_width = usable.size.w - master_width - inner;
        let stack_height = (usable.size.h - inner * (stack_count - 1)) / stack_count;

        for (i, window) in windows[1..].iter().enumerate() {
            let y = usable.loc.y + i as i32 * (stack_height + inner);
            positions.push((
                *window,
                Rectangle::new(
                    Point::from((stack_x, y)),
                    Size::from((stack_width, stack_height)),
                ),
            ));
        }

        debug!(
            "Tiled {} windows (master width {}) in area {:?}",
            n, master_width, usable
        );
        positions
    }

    /// Grow or shrink the master column by `delta` pixels.
    ///
    /// Leaving the allowed range wraps around to the opposite bound instead
    /// of stopping at the edge. Ignored while the screen has no usable
    /// width yet, so the cache is never seeded from a placeholder geometry.
    pub fn resize_master(&mut self, area: Rectangle<i32, Logical>, delta: i32) {
        let usable = self.usable_area(area);
        if usable.size.w <= 0 {
            debug!("Screen area {:?} too small to resize master, skipping", area);
            return;
        }
        let (min, max) = self.master_bounds(usable.size.w);
        let requested = self.cached_master_width(usable.size.w) + delta;

        let width = if requested < min {
            max
        } else if requested > max {
            min
        } else {
            requested
        };

        self.master_width = Some(width);
        debug!("Master width adjusted to {}", width);
    }
}
