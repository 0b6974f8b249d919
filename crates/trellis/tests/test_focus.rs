//! Integration tests for focus behavior.

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use trellis::{
        prelude::*,
        testing::{Block, ButtonGrid, init_tracing, scene},
    };

    /// A 3x2 grid of 10px buttons with 2px gaps, laid out and linked.
    fn grid_scene() -> Result<(Scene, ButtonGrid)> {
        init_tracing();
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let grid = ButtonGrid::build(&mut s, root, 3, 2, 10.0, 2.0)?;
        s.update_scene()?;
        Ok((s, grid))
    }

    fn multi_player_scene(players: usize) -> Result<(Scene, ButtonGrid)> {
        let mut s = Scene::new(SceneConfig {
            max_players: players,
            ..SceneConfig::default()
        })?;
        s.set_viewport_size(400.0, 300.0);
        let root = s.root_id();
        let grid = ButtonGrid::build(&mut s, root, 3, 2, 10.0, 2.0)?;
        s.update_scene()?;
        Ok((s, grid))
    }

    fn tab_cycle(s: &mut Scene, steps: usize, forward: bool) -> Result<Vec<WidgetId>> {
        let mut seen = Vec::new();
        for _ in 0..steps {
            let moved = if forward {
                s.next_control(0)?
            } else {
                s.prev_control(0)?
            };
            assert!(moved);
            if let Some(id) = s.focused_control(0) {
                seen.push(id);
            }
        }
        Ok(seen)
    }

    #[test]
    fn tab_visits_every_control_once() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        let seen = tab_cycle(&mut s, 6, true)?;
        assert_eq!(seen, grid.cells);
        // And wraps.
        assert!(s.next_control(0)?);
        assert_eq!(s.focused_control(0), Some(grid.cells[0]));
        Ok(())
    }

    #[test]
    fn tab_without_links() -> Result<()> {
        init_tracing();
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let grid = ButtonGrid::build(&mut s, root, 2, 2, 10.0, 2.0)?;
        // No update pass: chains are computed on the fly.
        let seen = tab_cycle(&mut s, 4, true)?;
        assert_eq!(seen, grid.cells);
        Ok(())
    }

    #[test]
    fn reverse_tab() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        let seen = tab_cycle(&mut s, 6, false)?;
        let mut expected = grid.cells.clone();
        expected.reverse();
        assert_eq!(seen, expected);
        Ok(())
    }

    #[test]
    fn tab_skips_ineligible_controls() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        assert!(s.set_enabled(grid.cells[1], false)?);
        assert!(s.set_hidden(grid.cells[3], true)?);
        s.set_accepts_input(grid.cells[4], 0, false)?;
        let seen = tab_cycle(&mut s, 3, true)?;
        assert_eq!(seen, vec![grid.cells[0], grid.cells[2], grid.cells[5]]);
        Ok(())
    }

    #[test]
    fn tab_index_orders_chain() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        s.set_tab_index(grid.cells[4], Some(0))?;
        s.set_tab_index(grid.cells[1], Some(0))?;
        s.update_scene()?;
        let order = s.tab_order(grid.panel, 0);
        assert_eq!(
            order,
            vec![
                grid.cells[1],
                grid.cells[4],
                grid.cells[0],
                grid.cells[2],
                grid.cells[3],
                grid.cells[5],
            ]
        );
        assert_eq!(s.focus_data(grid.panel, 0).first_target, Some(grid.cells[1]));
        assert_eq!(s.focus_data(grid.panel, 0).last_target, Some(grid.cells[5]));
        let seen = tab_cycle(&mut s, 6, true)?;
        assert_eq!(seen, order);
        Ok(())
    }

    #[test]
    fn focus_path_and_delegation() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        // Focusing a container hands focus to its first eligible child.
        assert!(s.set_focus(grid.panel, 0)?);
        let first = grid.cells[0];
        assert_eq!(s.focused_control(0), Some(first));
        assert_eq!(s.focus_path(0), vec![s.root_id(), grid.panel, first]);
        assert!(s.is_on_focus_path(grid.panel, 0));
        assert!(!s.is_focused(grid.panel, 0));
        assert_eq!(s.focus_data(grid.panel, 0).focused_child, Some(first));

        // Moving focus kills the old sibling.
        assert!(s.set_focus(grid.cells[4], 0)?);
        assert!(!s.is_on_focus_path(first, 0));
        assert_eq!(s.current_state(first, 0)?, Some(StateKind::Enabled));
        assert_eq!(s.current_state(grid.cells[4], 0)?, Some(StateKind::Focused));
        Ok(())
    }

    #[test]
    fn containers_remember_last_focused_child() -> Result<()> {
        init_tracing();
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let left = ButtonGrid::build(&mut s, root, 2, 1, 10.0, 2.0)?;
        let right = ButtonGrid::build(&mut s, root, 2, 1, 10.0, 2.0)?;
        s.update_scene()?;

        assert!(s.set_focus(left.cells[1], 0)?);
        assert!(s.set_focus(right.panel, 0)?);
        assert_eq!(s.focused_control(0), Some(right.cells[0]));
        assert!(!s.is_on_focus_path(left.panel, 0));

        assert!(s.set_focus(left.panel, 0)?);
        assert_eq!(s.focused_control(0), Some(left.cells[1]));
        Ok(())
    }

    #[test]
    fn kill_focus_moves_up() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        assert!(s.set_focus(grid.cells[2], 0)?);
        assert!(s.kill_focus(grid.cells[2], 0)?);
        assert_eq!(s.focused_control(0), Some(grid.panel));
        assert!(!s.kill_focus(grid.cells[2], 0)?);
        assert!(s.kill_focus(s.root_id(), 0)?);
        assert_eq!(s.focused_control(0), None);
        assert!(s.focus_path(0).is_empty());
        Ok(())
    }

    #[test]
    fn containers_without_controls_refuse_focus() -> Result<()> {
        init_tracing();
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let empty = s.add_child(root, Block::container("empty"))?;
        assert!(!s.can_accept_focus(empty, 0));
        assert!(!s.set_focus(empty, 0)?);
        assert!(!s.next_control(0)?);
        Ok(())
    }

    #[test]
    fn directional_navigation() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        let cell = |c, r| grid.cell(c, r).ok_or(Error::InvalidOperation("no cell".into()));
        assert_eq!(s.nav_target(cell(0, 0)?, Face::Right), Some(cell(1, 0)?));
        assert_eq!(s.nav_target(cell(0, 0)?, Face::Left), None);

        s.set_focus(cell(0, 0)?, 0)?;
        assert!(s.navigate(Face::Right, 0)?);
        assert_eq!(s.focused_control(0), Some(cell(1, 0)?));
        assert!(s.navigate(Face::Bottom, 0)?);
        assert_eq!(s.focused_control(0), Some(cell(1, 1)?));
        assert!(s.navigate(Face::Left, 0)?);
        assert_eq!(s.focused_control(0), Some(cell(0, 1)?));
        assert!(s.navigate(Face::Top, 0)?);
        assert_eq!(s.focused_control(0), Some(cell(0, 0)?));

        // Nothing beyond the edge of the grid.
        assert!(!s.navigate(Face::Left, 0)?);
        assert_eq!(s.focused_control(0), Some(cell(0, 0)?));
        Ok(())
    }

    #[test]
    fn navigation_skips_ineligible_targets() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        let cell = |c, r| grid.cell(c, r).ok_or(Error::InvalidOperation("no cell".into()));
        s.set_enabled(cell(1, 0)?, false)?;
        s.update_scene()?;
        // Links are rebuilt around the disabled cell: the nearest remaining
        // cell to the right is diagonally below.
        assert_eq!(s.nav_target(cell(0, 0)?, Face::Right), Some(cell(1, 1)?));

        // Stale links are followed past ineligible widgets.
        s.set_nav_target(cell(0, 0)?, Face::Right, Some(cell(1, 0)?))?;
        s.set_nav_target(cell(1, 0)?, Face::Right, Some(cell(2, 0)?))?;
        s.set_focus(cell(0, 0)?, 0)?;
        assert!(s.navigate(Face::Right, 0)?);
        assert_eq!(s.focused_control(0), Some(cell(2, 0)?));
        Ok(())
    }

    #[test]
    fn forced_and_null_links() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        let cell = |c, r| grid.cell(c, r).ok_or(Error::InvalidOperation("no cell".into()));
        s.set_nav_target(cell(0, 0)?, Face::Right, Some(cell(2, 1)?))?;
        s.set_nav_null_override(cell(0, 0)?, Face::Bottom, true)?;
        s.update_scene()?;

        s.set_focus(cell(0, 0)?, 0)?;
        assert!(!s.navigate(Face::Bottom, 0)?);
        assert!(s.navigate(Face::Right, 0)?);
        assert_eq!(s.focused_control(0), Some(cell(2, 1)?));

        s.set_nav_target(cell(0, 0)?, Face::Right, None)?;
        s.update_scene()?;
        assert_eq!(s.nav_target(cell(0, 0)?, Face::Right), Some(cell(1, 0)?));
        Ok(())
    }

    #[test]
    fn players_focus_independently() -> Result<()> {
        init_tracing();
        let (mut s, grid) = multi_player_scene(2)?;
        assert!(s.set_focus(grid.cells[0], 0)?);
        assert!(s.set_focus(grid.cells[5], 1)?);
        assert_eq!(s.focused_control(0), Some(grid.cells[0]));
        assert_eq!(s.focused_control(1), Some(grid.cells[5]));
        assert!(s.is_on_focus_path(grid.panel, 0));
        assert!(s.is_on_focus_path(grid.panel, 1));

        assert!(s.next_control(1)?);
        assert_eq!(s.focused_control(0), Some(grid.cells[0]));
        assert_eq!(s.focused_control(1), Some(grid.cells[0]));

        // Player 1 leaving the panel does not affect player 0.
        assert!(s.kill_focus(grid.panel, 1)?);
        assert!(s.is_on_focus_path(grid.panel, 0));
        assert!(s.is_focused(grid.cells[0], 0));
        assert!(!s.is_on_focus_path(grid.cells[0], 1));
        Ok(())
    }

    #[test]
    fn per_player_input_masks() -> Result<()> {
        let (mut s, grid) = multi_player_scene(2)?;
        s.set_accepts_input(grid.cells[0], 1, false)?;
        assert!(s.can_accept_focus(grid.cells[0], 0));
        assert!(!s.can_accept_focus(grid.cells[0], 1));
        assert!(s.focus_first_control(grid.panel, 1)?);
        assert_eq!(s.focused_control(1), Some(grid.cells[1]));
        assert!(s.focus_last_control(grid.panel, 0)?);
        assert_eq!(s.focused_control(0), Some(grid.cells[5]));
        Ok(())
    }

    #[test]
    fn invalid_players_are_rejected() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        assert!(matches!(s.set_focus(grid.cells[0], 3), Err(Error::InvalidPlayer(3))));
        assert!(!s.can_accept_focus(grid.cells[0], 3));
        assert!(matches!(s.next_control(7), Err(Error::InvalidPlayer(7))));
        Ok(())
    }

    #[test]
    fn removal_kills_focus() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        assert!(s.set_focus(grid.cells[3], 0)?);
        s.remove_subtree(grid.cells[3])?;
        assert_eq!(s.focused_control(0), Some(grid.panel));
        assert_eq!(s.focus_data(grid.panel, 0).focused_child, None);

        assert!(s.set_focus(grid.cells[4], 0)?);
        s.remove_subtree(grid.panel)?;
        // Focus collapses onto the nearest surviving ancestor.
        assert_eq!(s.focused_control(0), Some(s.root_id()));
        assert_eq!(s.focus_data(s.root_id(), 0).focused_child, None);
        s.update_scene()?;
        Ok(())
    }

    #[test]
    fn hiding_and_detaching_kill_focus() -> Result<()> {
        let (mut s, grid) = grid_scene()?;
        assert!(s.set_focus(grid.cells[1], 0)?);
        s.set_hidden(grid.panel, true)?;
        assert!(!s.is_on_focus_path(grid.cells[1], 0));
        assert!(!s.can_accept_focus(grid.cells[1], 0));
        s.set_hidden(grid.panel, false)?;

        assert!(s.set_focus(grid.cells[2], 0)?);
        s.detach(grid.cells[2])?;
        assert!(!s.is_on_focus_path(grid.cells[2], 0));
        assert_eq!(s.focused_control(0), Some(grid.panel));
        assert!(!s.set_focus(grid.cells[2], 0)?);
        Ok(())
    }
}
