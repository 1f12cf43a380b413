use std::cell::{Cell, RefCell};
use std::rc::Rc;

use series_pipeline::ChartError;
use series_pipeline::api::{ChartState, FetchState, ItemsSource, Series};
use series_pipeline::core::{
    Location, Mapper, MapperRegistry, PointBuilder, PointCoordinate, PointKey,
};

#[derive(Debug, PartialEq)]
struct Sample {
    x: f64,
    y: f64,
}

fn registry() -> Rc<MapperRegistry> {
    Rc::new(MapperRegistry::default())
}

fn sample_mapper() -> Mapper<Rc<Sample>, PointCoordinate> {
    Mapper::new(|sample: &Rc<Sample>, _| PointCoordinate::new(sample.x, sample.y))
}

#[test]
fn fetch_preserves_snapshot_order_and_length() {
    let values = vec![4.0, -2.0, 9.5, 0.0];
    let mut series: Series<f64, PointCoordinate> =
        Series::new(registry()).with_items_source(ItemsSource::from_vec(values.clone()));
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let points = series.fetch(&mut chart).expect("fetch");

    assert_eq!(points.len(), values.len());
    for (index, (point, value)) in points.iter().zip(&values).enumerate() {
        assert_eq!(point.index(), index);
        assert_eq!(point.model(), value);
        assert_eq!(point.coordinate().secondary, index as f64);
        assert_eq!(point.coordinate().primary, *value);
        assert_eq!(point.series(), series.id());
        assert_eq!(*point.view_model(), Location::new(index as f64, *value));
    }
}

#[test]
fn repeated_fetch_with_same_token_is_identity_equal() {
    let calls = Rc::new(Cell::new(0_usize));
    let counter = Rc::clone(&calls);
    let mut series: Series<f64, PointCoordinate> = Series::new(registry())
        .with_items_source(ItemsSource::from_vec(vec![1.0, 2.0, 3.0]))
        .with_mapper(Mapper::new(move |value: &f64, index| {
            counter.set(counter.get() + 1);
            PointCoordinate::new(index as f64, *value)
        }));
    let mut chart = ChartState::default();
    let token = chart.begin_update_pass();

    let first = series.fetch(&mut chart).expect("first fetch");
    let first_range = Rc::clone(series.data_range());
    let second = series.fetch(&mut chart).expect("second fetch");

    assert!(Rc::ptr_eq(&first, &second));
    assert!(Rc::ptr_eq(&first_range, series.data_range()));
    assert_eq!(calls.get(), 3);
    assert_eq!(series.fetch_state(), FetchState::Fetched(token));
}

#[test]
fn new_token_triggers_full_recompute() {
    let mut series: Series<f64, PointCoordinate> =
        Series::new(registry()).with_items_source(ItemsSource::from_vec(vec![1.0, 2.0]));
    let mut chart = ChartState::default();
    chart.begin_update_pass();
    let first = series.fetch(&mut chart).expect("first fetch");

    series.add(10.0).expect("add");
    let token = chart.begin_update_pass();
    let second = series.fetch(&mut chart).expect("second fetch");

    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 3);
    assert_eq!(series.data_range().primary().max, 10.0);
    assert_eq!(series.fetch_state(), FetchState::Fetched(token));
}

#[test]
fn unfetched_series_exposes_empty_state() {
    let series: Series<f64, PointCoordinate> = Series::new(registry());
    assert_eq!(series.fetch_state(), FetchState::Unfetched);
    assert!(series.points().is_empty());
    assert!(series.data_range().is_empty());
}

#[test]
fn empty_source_yields_no_points_and_empty_range() {
    let mut series: Series<f64, PointCoordinate> = Series::new(registry());
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let points = series.fetch(&mut chart).expect("fetch");

    assert!(points.is_empty());
    assert!(series.data_range().primary().is_empty());
    assert!(series.data_range().secondary().is_empty());
}

#[test]
fn mapper_error_propagates_and_keeps_last_good_state() {
    let mut series: Series<f64, PointCoordinate> = Series::new(registry())
        .with_items_source(ItemsSource::from_vec(vec![1.0, 2.0, 3.0]))
        .with_mapper(Mapper::try_new(|value: &f64, index| {
            if *value < 0.0 {
                return Err(ChartError::mapping(index, "negative values are not plotted"));
            }
            Ok(PointCoordinate::new(index as f64, *value))
        }));
    let mut chart = ChartState::default();
    let good_token = chart.begin_update_pass();
    let good_points = series.fetch(&mut chart).expect("good fetch");
    let good_range = Rc::clone(series.data_range());
    let good_slots = series.tracker().len();

    series.add(-1.0).expect("add");
    chart.begin_update_pass();
    let err = series.fetch(&mut chart).expect_err("mapper must fail");

    assert!(matches!(err, ChartError::Mapping { index: 3, .. }));
    assert!(Rc::ptr_eq(&good_points, series.points()));
    assert!(Rc::ptr_eq(&good_range, series.data_range()));
    assert_eq!(series.fetch_state(), FetchState::Fetched(good_token));
    assert_eq!(series.tracker().len(), good_slots);
    assert!(series.take_stale_points().is_empty());
}

#[test]
fn point_builder_error_aborts_fetch() {
    let mut series: Series<f64, PointCoordinate> = Series::new(registry())
        .with_items_source(ItemsSource::from_vec(vec![1.0, 2.0]))
        .with_point_builder(PointBuilder::try_new(
            |_: &f64, coordinate: &PointCoordinate, index| {
                if index == 1 {
                    return Err(ChartError::mapping(index, "no location"));
                }
                Ok(Location::new(coordinate.secondary, coordinate.primary))
            },
        ));
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let err = series.fetch(&mut chart).expect_err("builder must fail");

    assert!(matches!(err, ChartError::Mapping { index: 1, .. }));
    assert_eq!(series.fetch_state(), FetchState::Unfetched);
    assert!(series.points().is_empty());
}

#[test]
fn point_builder_supplies_view_models() {
    let mut series: Series<f64, PointCoordinate> = Series::new(registry())
        .with_items_source(ItemsSource::from_vec(vec![1.5, 2.5]))
        .with_point_builder(PointBuilder::new(
            |value: &f64, coordinate: &PointCoordinate, _| {
                Location::new(coordinate.secondary * 10.0, value * 2.0)
            },
        ));
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let points = series.fetch(&mut chart).expect("fetch");

    assert_eq!(*points[0].view_model(), Location::new(0.0, 3.0));
    assert_eq!(*points[1].view_model(), Location::new(10.0, 5.0));
}

#[test]
fn missing_mapper_is_reported_with_type_names() {
    let mut series: Series<Unregistered, PointCoordinate> = Series::new(registry())
        .with_items_source(ItemsSource::from_vec(vec![Unregistered(1)]));
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let err = series.fetch(&mut chart).expect_err("no mapper");
    match err {
        ChartError::MissingMapper { model, coordinate } => {
            assert!(model.ends_with("Unregistered"));
            assert!(coordinate.ends_with("PointCoordinate"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Unregistered(i32);

impl series_pipeline::core::SeriesModel for Unregistered {}

#[test]
fn reference_models_keep_their_views_across_reorders() {
    let a = Rc::new(Sample { x: 0.0, y: 1.0 });
    let b = Rc::new(Sample { x: 1.0, y: 2.0 });
    let c = Rc::new(Sample { x: 2.0, y: 3.0 });
    let source = Rc::new(RefCell::new(vec![Rc::clone(&a), Rc::clone(&b), Rc::clone(&c)]));
    let mut series: Series<Rc<Sample>, PointCoordinate, Location, String> =
        Series::new(registry())
            .with_items_source(ItemsSource::indexed(Rc::clone(&source)))
            .with_mapper(sample_mapper());
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let first = series.fetch(&mut chart).expect("first fetch");
    for (point, name) in first.iter().zip(["a", "b", "c"]) {
        point.attach_view(Rc::new(name.to_owned()));
    }
    let key_of_a = first[0].key();
    let key_of_c = first[2].key();
    assert!(matches!(key_of_a, PointKey::Model(_)));

    *source.borrow_mut() = vec![Rc::clone(&c), Rc::clone(&a)];
    chart.begin_update_pass();
    let second = series.fetch(&mut chart).expect("second fetch");

    assert_eq!(second[0].key(), key_of_c);
    assert_eq!(second[1].key(), key_of_a);
    assert_eq!(second[0].view().as_deref().map(String::as_str), Some("c"));
    assert_eq!(second[1].view().as_deref().map(String::as_str), Some("a"));

    let stale = series.take_stale_points();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].view().as_deref().map(String::as_str), Some("b"));
}

#[test]
fn value_models_reuse_views_by_position() {
    let mut series: Series<f64, PointCoordinate, Location, u32> =
        Series::new(registry()).with_items_source(ItemsSource::from_vec(vec![1.0, 2.0, 3.0]));
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let first = series.fetch(&mut chart).expect("first fetch");
    first[0].attach_view(Rc::new(7));
    first[2].attach_view(Rc::new(9));
    let first_keys: Vec<PointKey> = first.iter().map(|point| point.key()).collect();

    series.remove_at(2).expect("remove_at");
    series.remove_at(1).expect("remove_at");
    series.add(42.0).expect("add");
    chart.begin_update_pass();
    let second = series.fetch(&mut chart).expect("second fetch");

    assert_eq!(second.len(), 2);
    assert_eq!(second[0].key(), first_keys[0]);
    assert_eq!(second[1].key(), first_keys[1]);
    assert_eq!(second[0].view().as_deref(), Some(&7));
    let stale = series.take_stale_points();
    assert_eq!(stale.len(), 1);
    assert_eq!(stale[0].view().as_deref(), Some(&9));
}

#[test]
fn stale_points_without_views_are_not_retained() {
    let mut series: Series<f64, PointCoordinate, Location, u32> =
        Series::new(registry()).with_items_source(ItemsSource::from_vec(vec![1.0, 2.0, 3.0]));
    let mut chart = ChartState::default();

    for _ in 0..3 {
        chart.begin_update_pass();
        series.fetch(&mut chart).expect("fetch");
        series.add(0.5).expect("add");
        chart.begin_update_pass();
        series.fetch(&mut chart).expect("fetch");
        series.remove_at(3).expect("remove_at");
    }
    chart.begin_update_pass();
    series.fetch(&mut chart).expect("fetch");

    assert!(series.take_stale_points().is_empty());
}

#[test]
fn fetch_fails_cleanly_while_host_mutates_source() {
    let source = Rc::new(RefCell::new(vec![1.0_f64]));
    let mut series: Series<f64, PointCoordinate> =
        Series::new(registry()).with_items_source(ItemsSource::indexed(Rc::clone(&source)));
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let guard = source.borrow_mut();
    let err = series.fetch(&mut chart).expect_err("source busy");
    drop(guard);

    assert!(matches!(err, ChartError::InvalidData(_)));
    assert_eq!(series.fetch(&mut chart).expect("retry").len(), 1);
}
