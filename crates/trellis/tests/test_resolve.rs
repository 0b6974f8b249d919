//! Integration tests for position resolution, scale conversion and transforms.

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use trellis::{
        geom::approx_eq,
        prelude::*,
        testing::{Block, docked_row, fixed, init_tracing, scene},
    };

    #[test]
    fn resolution_is_idempotent() -> Result<()> {
        init_tracing();
        let mut s = scene(640.0, 480.0)?;
        let root = s.root_id();
        let row = docked_row(&mut s, root, 6, 40.0, 4.0)?;
        let tail = s.add_child(root, Block::container("tail"))?;
        s.set_dock_target(tail, Face::Left, DockTarget::Widget(row[5]), Face::Right, 0.0)?;
        s.update_scene()?;

        let first: Vec<Bounds> = row
            .iter()
            .chain([&tail])
            .map(|id| s.render_bounds(*id))
            .collect::<Result<_>>()?;
        s.resolve_scene_positions();
        let second: Vec<Bounds> = row
            .iter()
            .chain([&tail])
            .map(|id| s.render_bounds(*id))
            .collect::<Result<_>>()?;
        assert_eq!(first, second);
        assert_eq!(first[5], Bounds::new(220.0, 0.0, 260.0, 10.0));
        assert_eq!(first[6].get(Face::Left), 260.0);
        assert_eq!(first[6].get(Face::Right), 640.0);
        Ok(())
    }

    #[test]
    fn locked_width_follows_docked_face() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let a = fixed(&mut s, root, "a", [0.0, 0.0, 100.0, 50.0])?;
        let b = fixed(&mut s, root, "b", [0.0, 0.0, 30.0, 10.0])?;
        s.set_dock_target(b, Face::Left, DockTarget::Widget(a), Face::Right, 5.0)?;
        s.set_width_locked(b, true)?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?, Bounds::new(105.0, 0.0, 135.0, 10.0));

        s.set_edge(a, Face::Right, ScreenValue::pixels(150.0))?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?, Bounds::new(155.0, 0.0, 185.0, 10.0));

        // Unlocked, the right face keeps its own value.
        s.set_width_locked(b, false)?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?.get(Face::Right), 30.0);
        Ok(())
    }

    #[test]
    fn locked_height_follows_docked_bottom() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let a = fixed(&mut s, root, "a", [0.0, 0.0, 20.0, 20.0])?;
        s.set_dock_target(a, Face::Bottom, DockTarget::Scene, Face::Bottom, 0.0)?;
        s.set_height_locked(a, true)?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(a)?, Bounds::new(0.0, 280.0, 20.0, 300.0));
        Ok(())
    }

    #[test]
    fn viewport_resize_moves_relative_faces() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let a = s.add_child(root, Block::container("a"))?;
        s.set_edge(a, Face::Right, ScreenValue::percent(0.5))?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(a)?.get(Face::Right), 200.0);

        assert!(s.set_viewport_size(800.0, 600.0));
        assert!(s.pending().positions);
        assert!(!s.set_viewport_size(800.0, 600.0));
        s.update_scene()?;
        assert_eq!(s.render_bounds(a)?, Bounds::new(0.0, 0.0, 400.0, 600.0));
        Ok(())
    }

    #[test]
    fn viewport_scales() -> Result<()> {
        let mut s = scene(400.0, 200.0)?;
        let root = s.root_id();
        let outer = fixed(&mut s, root, "outer", [50.0, 50.0, 150.0, 150.0])?;
        let inner = s.add_child(outer, Block::container("inner"))?;
        s.set_edges(
            inner,
            [
                ScreenValue::new(10.0, ScaleType::PixelViewport),
                ScreenValue::new(0.25, ScaleType::PercentViewport),
                ScreenValue::new(0.5, ScaleType::PercentScene),
                ScreenValue::new(20.0, ScaleType::PixelScene),
            ],
        )?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(inner)?, Bounds::new(10.0, 50.0, 200.0, 20.0));
        Ok(())
    }

    #[test]
    fn padding_scales() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let a = fixed(&mut s, root, "a", [0.0, 0.0, 100.0, 50.0])?;
        let b = fixed(&mut s, root, "b", [0.0, 0.0, 10.0, 10.0])?;
        s.set_dock_target(b, Face::Left, DockTarget::Widget(a), Face::Right, 0.0)?;

        s.set_dock_padding(b, Face::Left, 0.1, PaddingScale::PercentTarget)?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?.get(Face::Left), 110.0);

        s.set_dock_padding(b, Face::Left, 0.25, PaddingScale::PercentViewport)?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?.get(Face::Left), 200.0);

        // Owner padding measures b itself, which is 10 wide.
        s.set_dock_padding(b, Face::Left, 0.5, PaddingScale::PercentOwner)?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?.get(Face::Left), 105.0);

        // Widening b moves its own padding.
        s.set_edge(b, Face::Right, ScreenValue::pixels(30.0))?;
        assert!(!s.edge(b, Face::Left)?.is_current());
        assert_eq!(s.pixel_value(b, Face::Left)?, 115.0);
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?.get(Face::Left), 115.0);

        // Target width changes move a target-relative padding.
        s.set_dock_padding(b, Face::Left, 0.1, PaddingScale::PercentTarget)?;
        s.set_edge(a, Face::Right, ScreenValue::pixels(200.0))?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?.get(Face::Left), 220.0);
        Ok(())
    }

    #[test]
    fn perpendicular_docking_ignores_padding() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let a = fixed(&mut s, root, "a", [0.0, 0.0, 100.0, 50.0])?;
        let b = fixed(&mut s, root, "b", [0.0, 0.0, 10.0, 200.0])?;
        s.set_dock_target(b, Face::Top, DockTarget::Widget(a), Face::Right, 15.0)?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?.get(Face::Top), 100.0);
        Ok(())
    }

    #[test]
    fn reads_between_passes_are_consistent() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let a = fixed(&mut s, root, "a", [0.0, 0.0, 100.0, 50.0])?;
        let b = fixed(&mut s, root, "b", [0.0, 0.0, 10.0, 10.0])?;
        s.set_dock_target(b, Face::Left, DockTarget::Widget(a), Face::Right, 10.0)?;
        s.update_scene()?;

        s.set_edge(a, Face::Right, ScreenValue::pixels(120.0))?;
        assert!(!s.edge(b, Face::Left)?.is_current());
        assert_eq!(s.pixel_value(b, Face::Left)?, 130.0);
        // Cached bounds wait for the next pass.
        assert_eq!(s.render_bounds(b)?.get(Face::Left), 110.0);
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?.get(Face::Left), 130.0);
        Ok(())
    }

    #[test]
    fn absolute_values_include_origin() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let a = fixed(&mut s, root, "a", [10.0, 20.0, 30.0, 40.0])?;
        assert!(s.set_viewport_origin(100.0, 50.0));
        s.update_scene()?;
        assert_eq!(s.pixel_value(a, Face::Left)?, 10.0);
        assert_eq!(s.pixel_value_absolute(a, Face::Left)?, 110.0);
        assert_eq!(s.pixel_value_absolute(a, Face::Bottom)?, 90.0);
        assert_eq!(s.quad(a)?.vertices[0], Point::new(110.0, 70.0));
        Ok(())
    }

    #[test]
    fn scale_conversion_preserves_position() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let a = fixed(&mut s, root, "a", [100.0, 0.0, 300.0, 50.0])?;
        let b = fixed(&mut s, a, "b", [0.0, 0.0, 50.0, 10.0])?;
        s.update_scene()?;
        assert_eq!(s.render_bounds(b)?.get(Face::Right), 150.0);

        s.set_scale_type(b, Face::Right, ScaleType::PercentOwner, true)?;
        let edge = s.edge(b, Face::Right)?;
        assert_eq!(edge.scale(), ScaleType::PercentOwner);
        assert!(approx_eq(edge.raw(), 0.25));
        s.update_scene()?;
        assert!(approx_eq(s.render_bounds(b)?.get(Face::Right), 150.0));

        // Without conversion the raw value is reinterpreted.
        s.set_scale_type(b, Face::Right, ScaleType::PixelOwner, false)?;
        s.update_scene()?;
        assert!(approx_eq(s.render_bounds(b)?.get(Face::Right), 100.25));
        Ok(())
    }

    #[test]
    fn degenerate_extent_is_an_error() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let flat = fixed(&mut s, root, "flat", [50.0, 0.0, 50.0, 10.0])?;
        let child = s.add_child(flat, Block::container("child"))?;
        s.update_scene()?;
        let err = s.set_raw_value(child, Face::Right, 10.0, ScaleType::PixelViewport);
        assert!(matches!(err, Err(Error::DegenerateExtent { face: Face::Right, .. })));
        Ok(())
    }

    #[test]
    fn rotation_turns_the_quad() -> Result<()> {
        let mut s = scene(400.0, 300.0)?;
        let root = s.root_id();
        let a = fixed(&mut s, root, "a", [0.0, 0.0, 20.0, 10.0])?;
        s.set_rotation(
            a,
            Rotation {
                radians: FRAC_PI_2,
                anchor: Point::new(0.0, 0.0),
            },
        )?;
        s.set_z_depth(a, 2.0)?;
        s.update_scene()?;
        let quad = s.quad(a)?;
        // The top-right corner swings down onto the y axis.
        assert!(approx_eq(quad.vertices[1].x, 0.0));
        assert!(approx_eq(quad.vertices[1].y, 20.0));
        let transform = s.screen_transform(a)?;
        assert_eq!(transform.z_depth, 2.0);
        assert_eq!(transform.anchor, Point::new(0.0, 0.0));
        Ok(())
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Move(usize, usize, f32),
        Dock(usize, usize, usize, usize, f32),
        Pad(usize, usize, f32, usize),
        Lock(usize, bool),
    }

    const PADDINGS: [PaddingScale; 5] = [
        PaddingScale::Pixels,
        PaddingScale::PercentTarget,
        PaddingScale::PercentOwner,
        PaddingScale::PercentScene,
        PaddingScale::PercentViewport,
    ];

    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (0usize..6, 0usize..4, 0.0f32..300.0).prop_map(|(w, f, v)| Edit::Move(w, f, v)),
            (0usize..6, 0usize..4, 0usize..6, 0usize..4, -10.0f32..10.0)
                .prop_map(|(w, f, t, tf, p)| Edit::Dock(w, f, t, tf, p)),
            (0usize..6, 0usize..4, -0.5f32..0.5, 0usize..5)
                .prop_map(|(w, f, p, k)| Edit::Pad(w, f, p, k)),
            (0usize..6, any::<bool>()).prop_map(|(w, l)| Edit::Lock(w, l)),
        ]
    }

    proptest! {
        /// A second pass over an unchanged scene reproduces the first exactly,
        /// whatever docking links (cycles included) the edits left behind.
        #[test]
        fn resolution_is_idempotent_after_edits(edits in prop::collection::vec(edit(), 1..24)) {
            let mut s = scene(640.0, 480.0)?;
            let root = s.root_id();
            let mut ids = Vec::new();
            for i in 0..5 {
                let offset = i as f32 * 40.0;
                ids.push(fixed(&mut s, root, &format!("w{i}"), [offset, offset, offset + 60.0, offset + 30.0])?);
            }
            ids.push(s.add_child(ids[1], Block::container("nested"))?);
            s.update_scene()?;

            for e in edits {
                match e {
                    Edit::Move(w, f, v) => s.set_edge(ids[w], Face::ALL[f], ScreenValue::pixels(v))?,
                    Edit::Dock(w, f, t, tf, p) => s.set_dock_target(ids[w], Face::ALL[f], DockTarget::Widget(ids[t]), Face::ALL[tf], p)?,
                    Edit::Pad(w, f, p, k) => s.set_dock_padding(ids[w], Face::ALL[f], p, PADDINGS[k])?,
                    Edit::Lock(w, l) => s.set_width_locked(ids[w], l)?,
                }
            }
            // Reads between passes terminate, cycles included.
            for id in &ids {
                for face in Face::ALL {
                    let v = s.pixel_value(*id, face)?;
                    prop_assert!(v.is_finite(), "{face}: {v}");
                }
            }
            s.update_scene()?;
            let first: Vec<Bounds> = ids.iter().map(|id| s.render_bounds(*id)).collect::<Result<_>>()?;
            s.resolve_scene_positions();
            let second: Vec<Bounds> = ids.iter().map(|id| s.render_bounds(*id)).collect::<Result<_>>()?;
            prop_assert_eq!(first, second);
        }

        #[test]
        fn raw_values_round_trip(px in 0.0f32..400.0) {
            let mut s = scene(400.0, 300.0)?;
            let root = s.root_id();
            let a = fixed(&mut s, root, "a", [50.0, 0.0, 250.0, 50.0])?;
            let b = s.add_child(a, Block::container("b"))?;
            s.update_scene()?;
            s.set_raw_value(b, Face::Right, px, ScaleType::PixelViewport)?;
            prop_assert_eq!(s.edge(b, Face::Right)?.scale(), ScaleType::PercentOwner);
            let back = s.pixel_value(b, Face::Right)?;
            prop_assert!(approx_eq(back, px), "{back} != {px}");
            s.update_scene()?;
            prop_assert!(approx_eq(s.render_bounds(b)?.get(Face::Right), px));
        }
    }
}
