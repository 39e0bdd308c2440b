// SPDX-License-Identifier: GPL-3.0-only

//! Focus traversal and master rotation.
//!
//! A screen's clients form one cycle for traversal: the floating clients in
//! their current order, followed by the tiled clients in tiling order.
//! Walking the cycle never reorders anything.

use super::{ClientId, ScreenId, Shell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

impl Shell {
    /// Screen whose clients traversal and master rotation act on
    pub fn active_screen(&self) -> Option<ScreenId> {
        match self.focused().and_then(|id| self.client(id)) {
            Some(client) => client.screen,
            None => self.selected_screen(),
        }
    }

    /// Client that should take over when focus is lost on `screen`:
    /// the topmost floating client, otherwise the master.
    pub fn fallback_focus(&self, screen: Option<ScreenId>) -> Option<ClientId> {
        let floating = self.floating_on(screen);
        let tiled = self.tiled_on(screen);
        floating.first().or(tiled.first()).copied()
    }

    /// Client one step away from the focused one.
    ///
    /// Stepping past the end of the focused client's partition continues at
    /// the near end of the other partition.
    pub fn focus_target(&self, direction: Direction) -> Option<ClientId> {
        let screen = self.active_screen();
        let Some(current) = self.focused() else {
            return self.fallback_focus(screen);
        };

        let floating = self.floating_on(screen);
        let tiled = self.tiled_on(screen);
        let (own, other) = if self.is_floating(current) {
            (&floating, &tiled)
        } else {
            (&tiled, &floating)
        };
        let pos = own.iter().position(|id| *id == current)?;

        match direction {
            Direction::Next => own
                .get(pos + 1)
                .or(other.first())
                .or(own.first())
                .copied(),
            Direction::Prev => pos
                .checked_sub(1)
                .and_then(|prev| own.get(prev))
                .or(other.last())
                .or(own.last())
                .copied(),
        }
    }

    /// Rotate the tiled clients of the active screen and return the new master.
    ///
    /// `Next` brings the last client to the front, `Prev` sends the master to
    /// the back. Fewer than two tiled clients leave the order alone.
    pub fn rotate_master(&mut self, direction: Direction) -> Option<ClientId> {
        let screen = self.active_screen();
        let mut order = self.tiled_on(screen);
        if order.len() < 2 {
            return None;
        }

        match direction {
            Direction::Next => order.rotate_right(1),
            Direction::Prev => order.rotate_left(1),
        }
        self.reorder_tiled(screen, &order);
        order.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ScreenHandle, WindowHandle};
    use crate::shell::tests::shell;
    use pretty_assertions::assert_eq;

    /// Screen with tiled clients `tiled` and floating clients `floating`,
    /// each listed in sequence order
    fn populated(tiled: usize, floating: usize) -> (Shell, Vec<ClientId>, Vec<ClientId>) {
        let mut shell = shell();
        shell.register_screen(ScreenHandle(1)).unwrap();

        let mut t = Vec::new();
        for w in 0..tiled {
            t.insert(0, shell.register_client(WindowHandle(w as u64)).unwrap());
        }
        shell.toggle_floating_default();
        let mut f = Vec::new();
        for w in 0..floating {
            f.insert(
                0,
                shell
                    .register_client(WindowHandle(100 + w as u64))
                    .unwrap(),
            );
        }
        (shell, t, f)
    }

    #[test]
    fn nothing_focused_prefers_floating() {
        let (shell, _, f) = populated(2, 2);
        assert_eq!(shell.focus_target(Direction::Next), Some(f[0]));
        assert_eq!(shell.focus_target(Direction::Prev), Some(f[0]));

        let (shell, t, _) = populated(2, 0);
        assert_eq!(shell.focus_target(Direction::Next), Some(t[0]));
    }

    #[test]
    fn empty_registry_has_no_target() {
        let mut shell = shell();
        assert_eq!(shell.focus_target(Direction::Next), None);
        shell.register_screen(ScreenHandle(1)).unwrap();
        assert_eq!(shell.focus_target(Direction::Prev), None);
    }

    #[test]
    fn next_walks_floating_then_tiled() {
        let (mut shell, t, f) = populated(2, 2);
        let cycle = [f[0], f[1], t[0], t[1], f[0]];

        shell.set_focused(Some(cycle[0]));
        for expected in &cycle[1..] {
            let target = shell.focus_target(Direction::Next);
            assert_eq!(target, Some(*expected));
            shell.set_focused(target);
        }
        // traversal is not a raise
        assert_eq!(shell.floating_on(shell.selected_screen()), f);
    }

    #[test]
    fn prev_walks_backwards_across_partitions() {
        let (mut shell, t, f) = populated(2, 2);
        let cycle = [t[0], f[1], f[0], t[1], t[0]];

        shell.set_focused(Some(cycle[0]));
        for expected in &cycle[1..] {
            let target = shell.focus_target(Direction::Prev);
            assert_eq!(target, Some(*expected));
            shell.set_focused(target);
        }
    }

    #[test]
    fn next_then_prev_round_trips() {
        for (tiled, floating) in [(3, 0), (0, 3), (1, 1), (2, 3), (1, 0)] {
            let (mut shell, t, f) = populated(tiled, floating);
            for start in t.iter().chain(f.iter()) {
                shell.set_focused(Some(*start));
                let next = shell.focus_target(Direction::Next);
                shell.set_focused(next);
                assert_eq!(
                    shell.focus_target(Direction::Prev),
                    Some(*start),
                    "round trip from {start} with {tiled} tiled and {floating} floating"
                );
            }
        }
    }

    #[test]
    fn fallback_prefers_topmost_floating() {
        let (mut shell, _, f) = populated(2, 2);
        let screen = shell.selected_screen();
        assert_eq!(shell.fallback_focus(screen), Some(f[0]));

        shell.set_floating(f[0], false, false);
        shell.set_floating(f[1], false, false);
        assert_eq!(shell.fallback_focus(screen), Some(f[1]));
    }

    #[test]
    fn master_next_brings_last_to_front() {
        let (mut shell, t, _) = populated(3, 0);
        let (a, b, c) = (t[0], t[1], t[2]);

        assert_eq!(shell.rotate_master(Direction::Next), Some(c));
        assert_eq!(shell.tiled_on(shell.selected_screen()), vec![c, a, b]);

        assert_eq!(shell.rotate_master(Direction::Prev), Some(a));
        assert_eq!(shell.tiled_on(shell.selected_screen()), vec![a, b, c]);
    }

    #[test]
    fn master_rotation_needs_two_clients() {
        let (mut shell, t, _) = populated(1, 2);
        assert_eq!(shell.rotate_master(Direction::Next), None);
        assert_eq!(shell.tiled_on(shell.selected_screen()), t);
    }

    #[test]
    fn traversal_stays_on_focused_screen() {
        let mut shell = shell();
        let s1 = shell.register_screen(ScreenHandle(1)).unwrap();
        let a = shell.register_client(WindowHandle(1)).unwrap();
        let b = shell.register_client(WindowHandle(2)).unwrap();
        let s2 = shell.register_screen(ScreenHandle(2)).unwrap();
        // the other screen's client lives in the same sequence
        let other = shell.register_client(WindowHandle(3)).unwrap();
        shell.client_mut(other).unwrap().screen = Some(s2);

        shell.set_focused(Some(b));
        assert_eq!(shell.focus_target(Direction::Next), Some(a));
        shell.set_focused(Some(a));
        assert_eq!(shell.focus_target(Direction::Next), Some(b));

        assert_eq!(shell.rotate_master(Direction::Next), Some(a));
        assert_eq!(shell.tiled_on(Some(s1)), vec![a, b]);
        assert_eq!(shell.tiled_on(Some(s2)), vec![other]);
    }
}
