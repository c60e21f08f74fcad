use approx::assert_relative_eq;
use chart_marks::core::{
    AttrValue, AxisSpec, ContinuousKind, DataPoint, PointKey, Scale, ValueField, derive_scale,
    extent, nice_ticks,
};

fn years(values: &[i64]) -> Vec<DataPoint> {
    values
        .iter()
        .enumerate()
        .map(|(index, year)| {
            DataPoint::new(PointKey(index), *year as f64 * 0.5)
                .with_attribute("year", AttrValue::Integer(*year))
        })
        .collect()
}

#[test]
fn linear_scale_maps_extent_to_range() {
    let points = years(&[1990, 2000, 2010]);
    let scale = derive_scale(
        &points,
        &AxisSpec::linear(ValueField::attribute("year"), (50.0, 750.0)),
    )
    .expect("linear scale");

    assert_relative_eq!(scale.position(1990.0).expect("x"), 50.0);
    assert_relative_eq!(scale.position(2010.0).expect("x"), 750.0);
    assert_relative_eq!(scale.position(2000.0).expect("x"), 400.0);
}

#[test]
fn domain_padding_extends_both_ends() {
    let points = years(&[1994, 2015]);
    let scale = derive_scale(
        &points,
        &AxisSpec::linear(ValueField::attribute("year"), (0.0, 100.0))
            .with_domain_padding(1.0, 1.0),
    )
    .expect("padded scale");

    let continuous = scale.as_continuous().expect("continuous");
    assert_eq!(continuous.domain(), (1993.0, 2016.0));
}

#[test]
fn include_zero_anchors_domain_at_zero() {
    let points = years(&[2000, 2002]);
    let scale = derive_scale(
        &points,
        &AxisSpec::linear(ValueField::Metric, (450.0, 50.0)).with_zero(),
    )
    .expect("zero-anchored scale");

    let continuous = scale.as_continuous().expect("continuous");
    assert_eq!(continuous.domain(), (0.0, 1001.0));
    assert_relative_eq!(continuous.apply(0.0), 450.0);
}

#[test]
fn single_valued_field_yields_flat_scale() {
    let points = years(&[1900, 1900]);
    let scale = derive_scale(
        &points,
        &AxisSpec::linear(ValueField::attribute("year"), (50.0, 750.0)),
    )
    .expect("flat scale is not an error");

    let continuous = scale.as_continuous().expect("continuous");
    assert!(continuous.is_flat());
    assert_eq!(continuous.normalize(1900.0), 0.0);
    assert_eq!(continuous.apply(1900.0), 50.0);
    assert_eq!(continuous.apply(1901.0), 50.0);
}

#[test]
fn empty_dataset_yields_zero_domain() {
    let scale = derive_scale(&[], &AxisSpec::time(ValueField::attribute("date"), (0.0, 10.0)))
        .expect("empty dataset is not an error");

    let continuous = scale.as_continuous().expect("continuous");
    assert_eq!(continuous.kind(), ContinuousKind::Time);
    assert_eq!(continuous.domain(), (0.0, 0.0));
    assert_eq!(continuous.apply(123.0), 0.0);
}

#[test]
fn negative_padding_is_rejected() {
    let points = years(&[2000]);
    let result = derive_scale(
        &points,
        &AxisSpec::linear(ValueField::Metric, (0.0, 1.0)).with_domain_padding(-1.0, 0.0),
    );
    assert!(result.is_err());
}

#[test]
fn month_band_subdivides_range_evenly() {
    let scale = derive_scale(&[], &AxisSpec::band((1..=12).collect(), (30.0, 400.0)))
        .expect("band scale");

    let band = scale.as_band().expect("band");
    assert_relative_eq!(band.step(), 370.0 / 12.0, epsilon = 1e-9);
    assert_relative_eq!(band.bandwidth(), band.step());
    assert_relative_eq!(band.apply(1).expect("jan"), 30.0);
    assert_relative_eq!(band.apply(12).expect("dec") + band.bandwidth(), 400.0, epsilon = 1e-9);
    assert_eq!(band.apply(13), None);
}

#[test]
fn band_padding_shrinks_bandwidth() {
    let scale = derive_scale(
        &[],
        &AxisSpec::band(vec![1, 2, 3, 4], (0.0, 100.0)).with_band_padding(0.2, 0.1),
    )
    .expect("padded band scale");

    let band = scale.as_band().expect("band");
    assert!(band.bandwidth() < band.step());
    assert!(band.apply(1).expect("first") > 0.0);
}

#[test]
fn band_position_rejects_fractional_values() {
    let scale = derive_scale(&[], &AxisSpec::band(vec![1, 2, 3], (0.0, 90.0))).expect("band");

    assert!(scale.position(2.0).is_some());
    assert!(scale.position(2.5).is_none());
}

#[test]
fn extent_skips_points_without_field() {
    let points = vec![
        DataPoint::new(PointKey(0), 1.0).with_attribute("year", AttrValue::Integer(2001)),
        DataPoint::new(PointKey(1), 2.0),
        DataPoint::new(PointKey(2), 3.0).with_attribute("year", AttrValue::Integer(1999)),
    ];

    assert_eq!(
        extent(&points, &ValueField::attribute("year")),
        Some((1999.0, 2001.0))
    );
    assert_eq!(extent(&points, &ValueField::Metric), Some((1.0, 3.0)));
    assert_eq!(extent(&[], &ValueField::Metric), None);
}

#[test]
fn nice_ticks_cover_domain_in_round_steps() {
    let ticks = nice_ticks(0.0, 18_000.0, 10);

    assert_eq!(ticks.first().copied(), Some(0.0));
    assert_eq!(ticks.last().copied(), Some(18_000.0));
    assert!(ticks.windows(2).all(|pair| pair[1] > pair[0]));
}

#[test]
fn scale_ticks_for_band_are_domain_keys() {
    let scale = derive_scale(&[], &AxisSpec::band(vec![3, 1, 2], (0.0, 30.0))).expect("band");
    match &scale {
        Scale::Band(_) => assert_eq!(scale.ticks(10), vec![3.0, 1.0, 2.0]),
        Scale::Continuous(_) => panic!("expected band scale"),
    }
}
