use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use trellis::{
    prelude::*,
    testing::{ButtonGrid, docked_row, scene},
};

/// A scene of `rows` docked rows, each `cols` cells long.
fn docked_scene(rows: usize, cols: usize) -> Result<(Scene, Vec<Vec<WidgetId>>)> {
    let mut s = scene(1920.0, 1080.0)?;
    let root = s.root_id();
    let mut all = Vec::with_capacity(rows);
    for r in 0..rows {
        let row_panel = s.add_child(root, Panel::new())?;
        let top = r as f32 * 12.0;
        s.set_edges(
            row_panel,
            [
                ScreenValue::percent(0.0),
                ScreenValue::pixels(top),
                ScreenValue::percent(1.0),
                ScreenValue::pixels(top + 10.0),
            ],
        )?;
        all.push(docked_row(&mut s, row_panel, cols, 20.0, 2.0)?);
    }
    s.update_scene()?;
    Ok((s, all))
}

fn benchmark_resolve(c: &mut Criterion) {
    let Ok((mut s, rows)) = docked_scene(40, 40) else {
        return;
    };

    c.bench_function("resolve_docked_grid", |b| {
        b.iter(|| black_box(s.resolve_scene_positions()));
    });

    c.bench_function("rebuild_docking_stack", |b| {
        b.iter(|| black_box(s.rebuild_docking_stack()));
    });

    let head = rows[0][0];
    let mut width = 20.0;
    c.bench_function("edit_and_update", |b| {
        b.iter(|| {
            width = if width > 30.0 { 20.0 } else { width + 1.0 };
            if s.set_edge(head, Face::Right, ScreenValue::pixels(width)).is_ok() {
                black_box(s.update_scene().ok());
            }
        });
    });
}

fn benchmark_navigation(c: &mut Criterion) {
    let Ok(mut s) = scene(1920.0, 1080.0) else {
        return;
    };
    let root = s.root_id();
    if ButtonGrid::build(&mut s, root, 30, 30, 20.0, 2.0).is_err() || s.update_scene().is_err() {
        return;
    }

    c.bench_function("rebuild_navigation_links", |b| {
        b.iter(|| black_box(s.rebuild_navigation_links()));
    });

    c.bench_function("tab_cycle", |b| {
        b.iter(|| black_box(s.next_control(0).ok()));
    });
}

criterion_group!(benches, benchmark_resolve, benchmark_navigation);
criterion_main!(benches);
