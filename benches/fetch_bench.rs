use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use series_pipeline::api::{ChartState, ItemsSource, Series};
use series_pipeline::core::{
    MapperRegistry, PointCoordinate, SelectionMode, WeightedCoordinate, WeightedPoint,
};

fn bench_scalar_fetch_10k(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| (i as f64 * 0.01).sin() * 100.0).collect();
    let mut series: Series<f64, PointCoordinate> = Series::new(Rc::new(MapperRegistry::default()))
        .with_items_source(ItemsSource::from_vec(values));
    let mut chart = ChartState::default();

    c.bench_function("scalar_fetch_10k", |b| {
        b.iter(|| {
            chart.begin_update_pass();
            let points = series.fetch(&mut chart).expect("fetch should succeed");
            black_box(points.len());
        })
    });
}

fn bench_reference_fetch_reordered_10k(c: &mut Criterion) {
    let models: Vec<Rc<WeightedPoint>> = (0..10_000)
        .map(|i| Rc::new(WeightedPoint::new(i as f64, (i % 97) as f64, (i % 13) as f64)))
        .collect();
    let source = Rc::new(RefCell::new(models));
    let mut series: Series<Rc<WeightedPoint>, WeightedCoordinate> =
        Series::new(Rc::new(MapperRegistry::default()))
            .with_items_source(ItemsSource::indexed(Rc::clone(&source)));
    let mut chart = ChartState::default();
    chart.begin_update_pass();
    series.fetch(&mut chart).expect("warm-up fetch");

    c.bench_function("reference_fetch_reordered_10k", |b| {
        b.iter(|| {
            source.borrow_mut().reverse();
            chart.begin_update_pass();
            let points = series.fetch(&mut chart).expect("fetch should succeed");
            black_box(points.len());
        })
    });
}

fn bench_nearest_selection_10k(c: &mut Criterion) {
    let values: Vec<f64> = (0..10_000).map(|i| (i % 251) as f64).collect();
    let mut series: Series<f64, PointCoordinate> = Series::new(Rc::new(MapperRegistry::default()))
        .with_items_source(ItemsSource::from_vec(values));
    let mut chart = ChartState::default();
    chart.begin_update_pass();
    series.fetch(&mut chart).expect("fetch should succeed");

    c.bench_function("nearest_selection_10k", |b| {
        b.iter(|| {
            let hits = series
                .select_points_by_dimension(SelectionMode::Nearest, black_box(&[4_321.5, 120.0]))
                .expect("selection should succeed");
            black_box(hits.len());
        })
    });
}

criterion_group!(
    benches,
    bench_scalar_fetch_10k,
    bench_reference_fetch_reordered_10k,
    bench_nearest_selection_10k
);
criterion_main!(benches);
