//! Layout pass benchmarks.

use std::cell::RefCell;
use std::rc::Rc;

use bento_layout::{BoxContent, FlowBox, GridBox, GridPosition, Layout, LayoutOptions, Orientation};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn contents(count: usize) -> Vec<Rc<RefCell<BoxContent>>> {
    (0..count)
        .map(|i| {
            let width = 20.0 + (i % 7) as f64 * 5.0;
            let height = 10.0 + (i % 3) as f64 * 4.0;
            Rc::new(RefCell::new(BoxContent::resizable(width, height)))
        })
        .collect()
}

fn flow_wrap(c: &mut Criterion) {
    let items = contents(200);
    let mut flow = FlowBox::with_options(
        &LayoutOptions::new()
            .with_spacing(4.0)
            .with_line_spacing(4.0)
            .with_wrap(true)
            .with_grow(1.0),
    );
    flow.lock();
    flow.set_preferred_size(Orientation::Horizontal, Some(800.0));
    for item in &items {
        flow.add(item).unwrap();
    }
    flow.unlock();

    c.bench_function("flow_wrap_200", |b| {
        b.iter(|| {
            flow.relayout();
            black_box(flow.result().min_height)
        })
    });
}

fn grid_spans(c: &mut Criterion) {
    let items = contents(100);
    let mut grid = GridBox::with_options(&LayoutOptions::new().with_spacing(2.0).with_stretch(true));
    grid.lock();
    for (i, item) in items.iter().enumerate() {
        let position = if i % 5 == 0 {
            GridPosition::spanning(i % 10, i / 10, 3, 2)
        } else {
            GridPosition::cell(i % 10, i / 10)
        };
        grid.add(item, position).unwrap();
    }
    grid.unlock();

    c.bench_function("grid_spans_100", |b| {
        b.iter(|| {
            grid.relayout();
            black_box(grid.result().min_width)
        })
    });
}

criterion_group!(benches, flow_wrap, grid_spans);
criterion_main!(benches);
