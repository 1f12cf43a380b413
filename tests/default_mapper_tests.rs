use std::rc::Rc;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use series_pipeline::ChartError;
use series_pipeline::api::{ChartState, ItemsSource, Series};
use series_pipeline::core::{
    DateTimePoint, FinancialCoordinate, FinancialPoint, Mapper, MapperRegistry, ObservableValue,
    PointCoordinate, PointKey, WeightedCoordinate, WeightedPoint,
};

fn fetch_all<M, C>(registry: &Rc<MapperRegistry>, items: Vec<M>) -> Series<M, C>
where
    M: series_pipeline::core::SeriesModel + PartialEq,
    C: series_pipeline::core::Coordinate,
{
    let mut series =
        Series::new(Rc::clone(registry)).with_items_source(ItemsSource::from_vec(items));
    let mut chart = ChartState::default();
    chart.begin_update_pass();
    series.fetch(&mut chart).expect("fetch");
    series
}

#[test]
fn integer_scalars_plot_against_their_index() {
    let registry = Rc::new(MapperRegistry::default());
    let series: Series<i32, PointCoordinate> = fetch_all(&registry, vec![7, -2]);

    let range = series.data_range();
    assert_eq!((range.secondary().min, range.secondary().max), (0.0, 1.0));
    assert_eq!((range.primary().min, range.primary().max), (-2.0, 7.0));
}

#[test]
fn decimal_values_are_converted() {
    let registry = Rc::new(MapperRegistry::default());
    let series: Series<Decimal, PointCoordinate> =
        fetch_all(&registry, vec![Decimal::new(125, 2), Decimal::new(-5, 1)]);

    assert!((series.points()[0].coordinate().primary - 1.25).abs() <= 1e-12);
    assert!((series.points()[1].coordinate().primary + 0.5).abs() <= 1e-12);
}

#[test]
fn observable_value_gaps_are_kept_but_not_folded() {
    let registry = Rc::new(MapperRegistry::default());
    let series: Series<ObservableValue, PointCoordinate> = fetch_all(
        &registry,
        vec![
            ObservableValue::new(3.0),
            ObservableValue::new(None),
            ObservableValue::new(9.0),
        ],
    );

    assert_eq!(series.points().len(), 3);
    assert!(series.points()[1].coordinate().primary.is_nan());
    let primary = series.data_range().primary();
    assert_eq!((primary.min, primary.max), (3.0, 9.0));
    assert_eq!(series.data_range().secondary().max, 2.0);
}

#[test]
fn weighted_points_fill_the_tertiary_dimension() {
    let registry = Rc::new(MapperRegistry::default());
    let series: Series<WeightedPoint, WeightedCoordinate> = fetch_all(
        &registry,
        vec![WeightedPoint::new(1.0, 2.0, 10.0), WeightedPoint::new(3.0, 4.0, 0.5)],
    );

    let tertiary = series.data_range().tertiary();
    assert_eq!((tertiary.min, tertiary.max), (0.5, 10.0));
}

#[test]
fn date_time_points_use_unix_seconds() {
    let registry = Rc::new(MapperRegistry::default());
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date");
    let series: Series<DateTimePoint, PointCoordinate> = fetch_all(
        &registry,
        vec![
            DateTimePoint::new(start, 1.0),
            DateTimePoint::new(start + chrono::Duration::hours(1), 2.0),
        ],
    );

    let secondary = series.data_range().secondary();
    assert_eq!(secondary.min, start.timestamp() as f64);
    assert_eq!(secondary.max - secondary.min, 3_600.0);
}

#[test]
fn financial_points_fold_every_price_into_the_primary_range() {
    let registry = Rc::new(MapperRegistry::default());
    let time = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single().expect("valid date");
    let series: Series<FinancialPoint, FinancialCoordinate> = fetch_all(
        &registry,
        vec![
            FinancialPoint::new(time, 10.0, 14.0, 9.0, 12.0),
            FinancialPoint::new(time + chrono::Duration::minutes(1), 12.0, 13.0, 7.5, 8.0),
        ],
    );

    let primary = series.data_range().primary();
    assert_eq!((primary.min, primary.max), (7.5, 14.0));
    assert_eq!(series.points()[1].coordinate().close, 8.0);
}

#[test]
fn shared_models_resolve_the_inner_mapper_and_keep_identity() {
    let registry = Rc::new(MapperRegistry::default());
    let first = Rc::new(WeightedPoint::new(0.0, 1.0, 2.0));
    let series: Series<Rc<WeightedPoint>, WeightedCoordinate> =
        fetch_all(&registry, vec![Rc::clone(&first)]);
    assert!(matches!(series.points()[0].key(), PointKey::Model(_)));

    let arc_series: Series<Arc<f64>, PointCoordinate> =
        fetch_all(&registry, vec![Arc::new(4.0), Arc::new(6.0)]);
    assert_eq!(arc_series.data_range().primary().max, 6.0);
}

#[test]
fn explicit_mapper_overrides_the_registry() {
    let registry = Rc::new(MapperRegistry::default());
    let mut series: Series<f64, PointCoordinate> = Series::new(Rc::clone(&registry))
        .with_items_source(ItemsSource::from_vec(vec![2.0]))
        .with_mapper(Mapper::new(|value: &f64, _| PointCoordinate::new(*value, value * 10.0)));
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let points = series.fetch(&mut chart).expect("fetch");
    assert_eq!(*points[0].coordinate(), PointCoordinate::new(2.0, 20.0));
}

#[test]
fn custom_registry_without_defaults_reports_missing_mapper() {
    let registry = Rc::new(MapperRegistry::empty());
    let mut series: Series<f64, PointCoordinate> =
        Series::new(registry).with_items_source(ItemsSource::from_vec(vec![1.0]));
    let mut chart = ChartState::default();
    chart.begin_update_pass();

    let err = series.fetch(&mut chart).expect_err("no mapper");
    assert!(matches!(err, ChartError::MissingMapper { .. }));
}

#[test]
fn builder_registrations_extend_the_defaults() {
    #[derive(Debug, Clone, PartialEq)]
    struct Reading {
        at: f64,
        celsius: f64,
    }
    impl series_pipeline::core::SeriesModel for Reading {}

    let registry = Rc::new(
        MapperRegistry::builder()
            .with_defaults()
            .register(Mapper::new(|reading: &Reading, _| {
                PointCoordinate::new(reading.at, reading.celsius)
            }))
            .build(),
    );
    let series: Series<Reading, PointCoordinate> = fetch_all(
        &registry,
        vec![Reading {
            at: 5.0,
            celsius: 21.5,
        }],
    );

    assert_eq!(*series.points()[0].coordinate(), PointCoordinate::new(5.0, 21.5));
    assert!(registry.contains::<f64, PointCoordinate>());
}
